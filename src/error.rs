//! Error types for the NetBox provider.

use thiserror::Error;

/// Errors that can occur in the provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested object was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An internal provider error occurred.
    #[error("Provider error: {0}")]
    Internal(String),

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A gRPC transport error occurred.
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// An HTTP request to the NetBox API failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The NetBox API returned a non-success status. The body is included
    /// verbatim so field-level API messages reach the operator.
    #[error("NetBox API error ({status}): {body}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Authentication with the NetBox API failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid request sent to the provider.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Build an error from a NetBox API response status and body.
    ///
    /// 401 and 403 map to [`ProviderError::Authentication`], 404 to
    /// [`ProviderError::NotFound`], everything else to [`ProviderError::Api`].
    pub fn from_api_response(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Authentication(body),
            404 => Self::NotFound(body),
            _ => Self::Api { status, body },
        }
    }

    /// True when the error represents a missing object on the API side.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<ProviderError> for tonic::Status {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(msg) => tonic::Status::not_found(msg),
            ProviderError::Validation(msg) => tonic::Status::invalid_argument(msg),
            ProviderError::Configuration(msg) => tonic::Status::failed_precondition(msg),
            ProviderError::UnknownResource(msg) => tonic::Status::not_found(msg),
            ProviderError::Internal(msg) => tonic::Status::internal(msg),
            ProviderError::Serialization(err) => {
                tonic::Status::invalid_argument(format!("Serialization error: {}", err))
            }
            ProviderError::Transport(err) => {
                tonic::Status::unavailable(format!("Transport error: {}", err))
            }
            ProviderError::Http(err) => tonic::Status::unavailable(format!("HTTP error: {}", err)),
            ProviderError::Api { status, body } => {
                tonic::Status::internal(format!("NetBox API error ({}): {}", status, body))
            }
            ProviderError::Authentication(msg) => tonic::Status::permission_denied(msg),
            ProviderError::InvalidRequest(msg) => tonic::Status::invalid_argument(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::NotFound("dcim/sites/42".to_string());
        assert_eq!(format!("{}", err), "Resource not found: dcim/sites/42");

        let err = ProviderError::Validation("invalid slug".to_string());
        assert_eq!(format!("{}", err), "Validation error: invalid slug");

        let err = ProviderError::UnknownResource("netbox_widget".to_string());
        assert_eq!(format!("{}", err), "Unknown resource type: netbox_widget");

        let err = ProviderError::Api {
            status: 400,
            body: r#"{"slug":["This field is required."]}"#.to_string(),
        };
        assert_eq!(
            format!("{}", err),
            r#"NetBox API error (400): {"slug":["This field is required."]}"#
        );
    }

    #[test]
    fn test_from_api_response() {
        assert!(matches!(
            ProviderError::from_api_response(401, "bad token".into()),
            ProviderError::Authentication(_)
        ));
        assert!(matches!(
            ProviderError::from_api_response(403, "forbidden".into()),
            ProviderError::Authentication(_)
        ));
        assert!(ProviderError::from_api_response(404, "gone".into()).is_not_found());
        assert!(matches!(
            ProviderError::from_api_response(500, "boom".into()),
            ProviderError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_error_to_status() {
        let err = ProviderError::NotFound("test".to_string());
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::NotFound);

        let err = ProviderError::Validation("test".to_string());
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let err = ProviderError::Configuration("test".to_string());
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::FailedPrecondition);

        let err = ProviderError::Authentication("test".to_string());
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::PermissionDenied);

        let err = ProviderError::Api {
            status: 500,
            body: "test".to_string(),
        };
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::Internal);
    }
}
