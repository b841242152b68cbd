// ABOUTME: Error type for calls to the remote orchestration service.
// ABOUTME: Carries the service's machine-readable code plus its human message.

/// Message the service returns when an update would change nothing.
pub const NO_UPDATES_MESSAGE: &str = "No updates are to be performed.";

/// Broad category of a remote error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Request rejected by the service's validation.
    Validation,
    /// The addressed stack does not exist.
    NotFound,
    /// Anything else, including transport failures.
    Other,
}

/// An error reported by (or while talking to) the orchestration service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub code: String,
    pub message: String,
}

impl RemoteError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Validation,
            code: "ValidationError".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::NotFound,
            code: "StackNotFound".to_string(),
            message: message.into(),
        }
    }

    pub fn other(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Other,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build an error from a service code, classifying the known ones.
    pub fn from_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        let kind = match code.as_str() {
            "ValidationError" => RemoteErrorKind::Validation,
            "StackNotFound" | "StackNotFoundException" | "NotFound" => RemoteErrorKind::NotFound,
            _ => RemoteErrorKind::Other,
        };
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::other("TransportError", message)
    }

    /// The stack addressed by a lookup does not exist.
    ///
    /// The service reports this either with a dedicated code or as a
    /// validation error ending in "does not exist".
    pub fn is_stack_missing(&self) -> bool {
        match self.kind {
            RemoteErrorKind::NotFound => true,
            RemoteErrorKind::Validation => self.message.ends_with("does not exist"),
            RemoteErrorKind::Other => false,
        }
    }

    /// An update was rejected because nothing would change.
    pub fn is_no_updates(&self) -> bool {
        self.kind == RemoteErrorKind::Validation && self.message == NO_UPDATES_MESSAGE
    }
}
