//! Relay error taxonomy

use aws_sdk_codecommit::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Every failure the pipeline can surface. Nothing is retried locally; the
/// invoking platform decides what to do with a failed invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("Resource not found. {0}")]
    NotFound(String),
    #[error("Access denied. {0}")]
    Permission(String),
    #[error("Service call failed. {0}")]
    Service(String),
    #[error("Unknown change type code '{0}'")]
    UnknownChangeKind(String),
    #[error("Missing configuration. {0}")]
    Configuration(String),
}

/// Convenience alias for results that bubble `RelayError`.
pub type RelayResult<T> = Result<T, RelayError>;

impl RelayError {
    /// Classify a service error code (e.g. `BranchDoesNotExistException`)
    pub fn from_service_code(code: Option<&str>, message: String) -> Self {
        let Some(code) = code else {
            return RelayError::Service(message);
        };

        if code.contains("DoesNotExist") || code == "NotFound" || code.ends_with("NotFoundException") {
            RelayError::NotFound(message)
        } else if code.contains("AccessDenied")
            || code == "AuthorizationError"
            || code.starts_with("Unauthorized")
            || code.starts_with("Forbidden")
        {
            RelayError::Permission(message)
        } else if code.ends_with("NameRequiredException") || code.ends_with("ArnRequiredException") {
            RelayError::Configuration(message)
        } else {
            RelayError::Service(message)
        }
    }

    /// Short name of the variant, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::NotFound(_) => "not_found",
            RelayError::Permission(_) => "permission",
            RelayError::Service(_) => "service",
            RelayError::UnknownChangeKind(_) => "unknown_change_kind",
            RelayError::Configuration(_) => "configuration",
        }
    }
}

/// Map an AWS SDK error from either client into the relay taxonomy.
/// CodeCommit and SNS share the same smithy error types.
pub fn from_sdk_error<E, R>(operation: &str, err: SdkError<E, R>) -> RelayError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_string);
    let message = format!("{}: {}", operation, DisplayErrorContext(&err));
    RelayError::from_service_code(code.as_deref(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_resources_are_not_found() {
        for code in [
            "RepositoryDoesNotExistException",
            "BranchDoesNotExistException",
            "CommitIdDoesNotExistException",
            "NotFound",
        ] {
            let err = RelayError::from_service_code(Some(code), code.to_string());
            assert_eq!(err, RelayError::NotFound(code.to_string()));
        }
    }

    #[test]
    fn test_access_errors_are_permission() {
        let err = RelayError::from_service_code(Some("AuthorizationError"), "denied".to_string());
        assert_eq!(err.kind(), "permission");

        let err = RelayError::from_service_code(
            Some("EncryptionKeyAccessDeniedException"),
            "kms".to_string(),
        );
        assert_eq!(err.kind(), "permission");
    }

    #[test]
    fn test_missing_names_are_configuration() {
        let err = RelayError::from_service_code(
            Some("RepositoryNameRequiredException"),
            "GetBranch".to_string(),
        );
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_throttling_and_unknown_codes_are_service() {
        let err = RelayError::from_service_code(Some("Throttled"), "slow down".to_string());
        assert_eq!(err, RelayError::Service("slow down".to_string()));

        let err = RelayError::from_service_code(None, "dispatch failure".to_string());
        assert_eq!(err.kind(), "service");
    }
}
