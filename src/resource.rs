//! Progress states of one asynchronous operation and their UI projection.

define_labeled_enum! {
    /// Simplified status shown to a screen.
    pub enum Status {
        Loading => "Loading",
        Success => "Success",
        Error => "Error",
    }
}

/// Progress of one asynchronous operation.
///
/// An invocation yields at most one `Loading` (always first) followed by exactly
/// one terminal `Success` or `Error`. `T` may be an `Option` when the call can
/// legitimately succeed without a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T> {
    Loading,
    Success(T),
    /// Normalized, human-readable diagnostic. Never a raw error object.
    Error(String),
}

impl<T> Resource<T> {
    pub fn loading() -> Self {
        Resource::Loading
    }

    pub fn success(data: T) -> Self {
        Resource::Success(data)
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Resource::Error(message.into())
    }

    /// `Success` and `Error` end an invocation.
    pub fn is_terminal(&self) -> bool {
        match self {
            Resource::Loading => false,
            Resource::Success(_) | Resource::Error(_) => true,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Resource::Loading => Status::Loading,
            Resource::Success(_) => Status::Success,
            Resource::Error(_) => Status::Error,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            Resource::Loading | Resource::Error(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Resource::Error(msg) => Some(msg.as_str()),
            Resource::Loading | Resource::Success(_) => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> Resource<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Resource::Loading => Resource::Loading,
            Resource::Success(data) => Resource::Success(f(data)),
            Resource::Error(msg) => Resource::Error(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_projection() {
        assert_eq!(Resource::<u8>::loading().status(), Status::Loading);
        assert_eq!(Resource::success(1u8).status(), Status::Success);
        assert_eq!(Resource::<u8>::error("x").status(), Status::Error);
    }

    #[test]
    fn only_success_and_error_are_terminal() {
        assert!(!Resource::<()>::loading().is_terminal());
        assert!(Resource::success(()).is_terminal());
        assert!(Resource::<()>::error("").is_terminal());
    }

    #[test]
    fn absent_payload_is_representable() {
        let res: Resource<Option<String>> = Resource::success(None);
        assert_eq!(res.data(), Some(&None));
        assert_eq!(res.status(), Status::Success);
    }

    #[test]
    fn map_keeps_error_message() {
        let res: Resource<u32> = Resource::error("offline");
        let mapped = res.map(|n| n * 2);
        assert_eq!(mapped.message(), Some("offline"));
        assert_eq!(Resource::success(21u32).map(|n| n * 2), Resource::Success(42));
    }

    #[test]
    fn status_labels() {
        assert_eq!(Status::Success.as_str(), "Success");
        assert_eq!("loading".parse::<Status>(), Ok(Status::Loading));
        assert_eq!(
            serde_json::to_string(&Status::Error).unwrap(),
            "\"Error\""
        );
        let parsed: Status = serde_json::from_str("\"Success\"").unwrap();
        assert_eq!(parsed, Status::Success);
    }
}
