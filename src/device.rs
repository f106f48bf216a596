//! Client-side model of a managed light as reported by the vendor cloud.

use serde::{Deserialize, Serialize};

define_labeled_enum! {
    /// Near realtime indicator of the device's link to the service.
    pub enum ConnectionStatus {
        Online => "Online",
        Offline => "Offline",
    }
}

/// A device in the vendor's device list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightDevice {
    /// Unique device serial number
    pub dsn: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub oem_model: Option<String>,
    #[serde(default)]
    pub connection_status: Option<ConnectionStatus>,
    #[serde(default)]
    pub lan_ip: Option<String>,
    #[serde(default)]
    pub sw_version: Option<String>,
    #[serde(default)]
    pub has_properties: bool,
}

impl LightDevice {
    pub fn new<S: Into<String>>(dsn: S) -> Self {
        Self {
            dsn: dsn.into(),
            product_name: None,
            model: None,
            oem_model: None,
            connection_status: None,
            lan_ip: None,
            sw_version: None,
            has_properties: false,
        }
    }

    pub fn with_product_name<S: Into<String>>(mut self, name: S) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn with_oem_model<S: Into<String>>(mut self, oem_model: S) -> Self {
        self.oem_model = Some(oem_model.into());
        self
    }

    pub fn with_status(mut self, status: ConnectionStatus) -> Self {
        self.connection_status = Some(status);
        self
    }

    pub fn is_online(&self) -> bool {
        self.connection_status == Some(ConnectionStatus::Online)
    }

    /// Property names this client manages for the device's OEM model.
    pub fn managed_properties(&self) -> &'static [&'static str] {
        managed_property_names(self)
    }
}

const PROPS_SWITCH: &[&str] = &["Switch", "ClientTimer", "Power"];
const PROPS_DIMMER: &[&str] = &["Switch", "Level", "ClientTimer", "Power"];

const OEM_FAMILIES: &[(&str, &[&str])] = &[
    ("SQR621U1XXW", PROPS_SWITCH),
    ("SQR226U1XXW", PROPS_DIMMER),
    ("SQR141U1XXW", PROPS_SWITCH),
    ("SQR441U1XXW", PROPS_SWITCH),
];

/// Maps a device's OEM model family to the properties the client tracks.
/// Unknown or missing models manage nothing.
pub fn managed_property_names(device: &LightDevice) -> &'static [&'static str] {
    let Some(oem) = device.oem_model.as_deref() else {
        return &[];
    };
    OEM_FAMILIES
        .iter()
        .find(|(family, _)| oem.contains(*family))
        .map(|(_, props)| *props)
        .unwrap_or(&[])
}
