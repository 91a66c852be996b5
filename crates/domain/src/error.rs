//! Common error types used across the workspace.
//!
//! Each failure kind is a typed source error converted into the layer's
//! enum via `#[from]`.

/// Failure of a call to the VM control API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// The response decoded but its `status` was not `"success"`.
    #[error("control API rejected the request")]
    Rejected(#[from] RejectedError),

    /// The request could not be completed or its body could not be decoded.
    #[error("control API unreachable")]
    Transport(#[from] TransportError),
}

impl ControlError {
    /// Server-supplied explanation, when the API returned one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected(err) => err.message.as_deref(),
            Self::Transport(_) => None,
        }
    }
}

/// Application-level failure: the API answered with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status was not success{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct RejectedError {
    /// Optional `message` field of the response body.
    pub message: Option<String>,
}

/// Transport-level failure: connection refused, timeout, undecodable body, …
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport failure: {reason}")]
pub struct TransportError {
    pub reason: String,
}

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Misuse of the dashboard controller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("dashboard is already running")]
    AlreadyStarted,
    #[error("dashboard has been torn down")]
    TornDown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expose_server_message_when_rejected() {
        let err: ControlError = RejectedError {
            message: Some("quota exceeded".to_string()),
        }
        .into();
        assert_eq!(err.server_message(), Some("quota exceeded"));
    }

    #[test]
    fn should_have_no_server_message_on_transport_failure() {
        let err: ControlError = TransportError::new("connection refused").into();
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn should_include_server_message_in_rejected_display() {
        let err = RejectedError {
            message: Some("VM is locked".to_string()),
        };
        assert_eq!(err.to_string(), "status was not success: VM is locked");
    }

    #[test]
    fn should_omit_suffix_when_rejected_without_message() {
        let err = RejectedError { message: None };
        assert_eq!(err.to_string(), "status was not success");
    }
}
