use thiserror::Error;

/// Everything that can end a batch upload.
///
/// The pipeline forwards these unchanged; only the notification text is
/// derived from them.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Missing config for '{backend}': {detail}")]
    MissingConfig { backend: String, detail: String },

    #[error("Cannot determine content type of '{0}'")]
    UnsupportedMediaType(String),

    #[error("Invalid payload for '{file_name}': {reason}")]
    InvalidPayload { file_name: String, reason: String },

    #[error("Failed to build credentials for '{file_name}': {reason}")]
    AuthConstructionFailed { file_name: String, reason: String },

    #[error("Upload of '{file_name}' rejected (status {status}): {reason}")]
    UploadRejected {
        file_name: String,
        status: u16,
        reason: String,
    },

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Picture bed '{0}' is not registered")]
    PluginNotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadErrorKind {
    MissingConfig,
    UnsupportedMediaType,
    InvalidPayload,
    AuthConstructionFailed,
    UploadRejected,
    TransportError,
    PluginNotFound,
}

impl UploadError {
    pub fn kind(&self) -> UploadErrorKind {
        match self {
            UploadError::MissingConfig { .. } => UploadErrorKind::MissingConfig,
            UploadError::UnsupportedMediaType(_) => UploadErrorKind::UnsupportedMediaType,
            UploadError::InvalidPayload { .. } => UploadErrorKind::InvalidPayload,
            UploadError::AuthConstructionFailed { .. } => UploadErrorKind::AuthConstructionFailed,
            UploadError::UploadRejected { .. } => UploadErrorKind::UploadRejected,
            UploadError::TransportError(_) => UploadErrorKind::TransportError,
            UploadError::PluginNotFound(_) => UploadErrorKind::PluginNotFound,
        }
    }

    /// True when the failure points at the network rather than the settings.
    pub fn is_connectivity(&self) -> bool {
        self.kind() == UploadErrorKind::TransportError
    }

    pub(crate) fn missing_config(backend: &str, detail: impl Into<String>) -> Self {
        UploadError::MissingConfig {
            backend: backend.to_string(),
            detail: detail.into(),
        }
    }
}

// Convert reqwest errors to UploadError
impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::TransportError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_errors_are_connectivity() {
        assert!(UploadError::TransportError("reset".into()).is_connectivity());
        assert!(!UploadError::PluginNotFound("x".into()).is_connectivity());
        assert!(!UploadError::UploadRejected {
            file_name: "a.png".into(),
            status: 403,
            reason: "SignatureDoesNotMatch".into(),
        }
        .is_connectivity());
    }

    #[test]
    fn messages_name_the_file() {
        let err = UploadError::UploadRejected {
            file_name: "a.png".into(),
            status: 500,
            reason: "boom".into(),
        };
        assert_eq!(err.to_string(), "Upload of 'a.png' rejected (status 500): boom");
        assert_eq!(err.kind(), UploadErrorKind::UploadRejected);
    }
}
