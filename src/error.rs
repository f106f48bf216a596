//! Error types and result definitions for the cloudlights crate.
//! Covers the vendor SDK boundary, the repository layer, the normalized taxonomy
//! surfaced to presenters, and configuration loading.

use thiserror::Error;

/// Errors reported by the vendor cloud SDK.
///
/// These never travel past the repository adapters; see [`CloudError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    /// Credentials rejected or session invalid
    #[error("auth error: {}", .detail.as_deref().unwrap_or("no detail"))]
    Auth { detail: Option<String> },

    /// Service not reachable
    #[error("network error: {}", .detail.as_deref().unwrap_or("no detail"))]
    Network { detail: Option<String> },

    /// Request timed out before the service answered
    #[error("timeout: {}", .detail.as_deref().unwrap_or("no detail"))]
    Timeout { detail: Option<String> },

    /// The service answered with a failure status
    #[error("server error {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("app permission missing: {0}")]
    AppPermission(String),

    #[error("SDK internal error: {0}")]
    Internal(String),
}

impl SdkError {
    pub fn auth<S: Into<String>>(detail: S) -> Self {
        SdkError::Auth {
            detail: Some(detail.into()),
        }
    }

    pub fn network<S: Into<String>>(detail: S) -> Self {
        SdkError::Network {
            detail: Some(detail.into()),
        }
    }

    pub fn server<S: Into<String>>(status: u16, detail: S) -> Self {
        SdkError::Server {
            status,
            detail: Some(detail.into()),
        }
    }

    /// The vendor-supplied diagnostic, if any.
    pub fn detail_message(&self) -> Option<&str> {
        match self {
            SdkError::Auth { detail }
            | SdkError::Network { detail }
            | SdkError::Timeout { detail }
            | SdkError::Server { detail, .. } => detail.as_deref(),
            SdkError::Json(msg)
            | SdkError::InvalidArgument(msg)
            | SdkError::Precondition(msg)
            | SdkError::AppPermission(msg)
            | SdkError::Internal(msg) => Some(msg.as_str()),
        }
    }
}

define_labeled_enum! {
    /// Closed failure taxonomy surfaced by the use cases.
    pub enum ErrorKind {
        /// Transport or connectivity failure
        NetworkUnavailable => "NetworkUnavailable",
        /// The remote call completed but reported a failure
        RemoteOperationFailed => "RemoteOperationFailed",
        /// Credential rejection or missing/invalid session
        AuthenticationFailed => "AuthenticationFailed",
        /// Anything not covered above
        Unknown => "Unknown",
    }
}

/// Failures returned by the repository adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloudError {
    #[error("network unavailable: {0}")]
    Network(String),

    #[error("remote operation failed: {}", .message.as_deref().unwrap_or("no diagnostic"))]
    Remote {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("authentication failed: {}", .detail.as_deref().unwrap_or("no detail"))]
    Auth { detail: Option<String> },

    /// Device operations require a prior successful sign-in
    #[error("no active session")]
    NoSession,

    /// The vendor dropped both completion callbacks without resolving
    #[error("callback bridge failed: {0}")]
    Bridge(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// A specialized Result type for repository operations.
pub type Result<T> = std::result::Result<T, CloudError>;

impl From<SdkError> for CloudError {
    fn from(err: SdkError) -> Self {
        match err {
            SdkError::Network { detail } => {
                CloudError::Network(detail.unwrap_or_else(|| "unreachable".to_string()))
            }
            SdkError::Timeout { detail } => {
                CloudError::Network(detail.unwrap_or_else(|| "timed out".to_string()))
            }
            SdkError::Server { status, detail } => CloudError::Remote {
                status: Some(status),
                message: detail,
            },
            SdkError::Auth { detail } => CloudError::Auth { detail },
            other => CloudError::Unexpected(other.to_string()),
        }
    }
}

impl CloudError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CloudError::Network(_) => ErrorKind::NetworkUnavailable,
            CloudError::Remote { .. } => ErrorKind::RemoteOperationFailed,
            CloudError::Auth { .. } | CloudError::NoSession => ErrorKind::AuthenticationFailed,
            CloudError::Bridge(_) | CloudError::Unexpected(_) => ErrorKind::Unknown,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            CloudError::Network(_) => ERR_NETWORK,
            CloudError::Remote { .. } => ERR_REMOTE,
            CloudError::Auth { .. } => ERR_AUTH,
            CloudError::NoSession => ERR_NO_SESSION,
            CloudError::Bridge(_) | CloudError::Unexpected(_) => ERR_UNKNOWN,
        }
    }

    /// The normalized message handed to consumers in place of the raw error.
    pub fn user_message(&self) -> String {
        match self {
            CloudError::Remote {
                message: Some(msg), ..
            } if !msg.is_empty() => msg.clone(),
            CloudError::Auth { detail: Some(d) } => d.clone(),
            other => get_error_message(other.code()).to_string(),
        }
    }
}

define_error_codes! {
    ERR_NETWORK = 901 => "Couldn't reach server. Check your internet connection.",
    ERR_REMOTE = 910 => "An unexpected error occurred",
    ERR_AUTH = 911 => "",
    ERR_NO_SESSION = 912 => "No active session",
    ERR_UNKNOWN = 999 => "An unexpected error occurred",
}

/// A string did not match any label of a labeled enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("missing or empty field: {0}")]
    MissingField(&'static str),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}
