use crate::{
    config::ConfigError, db::StoreError, form::FormError, session::SessionError,
    status::TransitionError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable classification.
/// Every module error converts into this at the `Admin` boundary.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self.class, ErrorClass::Validation)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Store(StoreError),

    #[error("{0}")]
    Form(FormError),

    #[error("{0}")]
    Status(TransitionError),
}

impl From<StoreError> for InternalError {
    fn from(err: StoreError) -> Self {
        let class = match err {
            StoreError::NotFound { .. } => ErrorClass::NotFound,
            StoreError::DuplicateId { .. } => ErrorClass::Conflict,
            StoreError::IdSpaceExhausted { .. } => ErrorClass::Internal,
        };

        Self {
            class,
            origin: ErrorOrigin::Store,
            message: err.to_string(),
            detail: Some(ErrorDetail::Store(err)),
        }
    }
}

impl From<FormError> for InternalError {
    fn from(err: FormError) -> Self {
        let class = match &err {
            FormError::ValidationFailed(_) => ErrorClass::Validation,
            FormError::UnknownField { .. } | FormError::Upload(_) => ErrorClass::Unsupported,
            FormError::Store(StoreError::NotFound { .. }) => ErrorClass::NotFound,
            FormError::Store(StoreError::DuplicateId { .. }) => ErrorClass::Conflict,
            FormError::Store(StoreError::IdSpaceExhausted { .. }) => ErrorClass::Internal,
        };

        Self {
            class,
            origin: ErrorOrigin::Form,
            message: err.to_string(),
            detail: Some(ErrorDetail::Form(err)),
        }
    }
}

impl From<TransitionError> for InternalError {
    fn from(err: TransitionError) -> Self {
        let class = match err {
            TransitionError::InvalidTransition { .. } => ErrorClass::InvalidTransition,
            TransitionError::Store(StoreError::NotFound { .. }) => ErrorClass::NotFound,
            TransitionError::Store(StoreError::DuplicateId { .. }) => ErrorClass::Conflict,
            TransitionError::Store(StoreError::IdSpaceExhausted { .. }) => ErrorClass::Internal,
        };

        Self {
            class,
            origin: ErrorOrigin::Status,
            message: err.to_string(),
            detail: Some(ErrorDetail::Status(err)),
        }
    }
}

impl From<SessionError> for InternalError {
    fn from(err: SessionError) -> Self {
        let class = match err {
            SessionError::Io(_) | SessionError::Decode(_) => ErrorClass::Internal,
            SessionError::NotLoggedIn => ErrorClass::NotFound,
            SessionError::MissingPasswordFields
            | SessionError::PasswordMismatch
            | SessionError::PasswordRejected => ErrorClass::Validation,
        };

        Self::new(class, ErrorOrigin::Session, err.to_string())
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    Conflict,
    Validation,
    InvalidTransition,
    Unsupported,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Validation => "validation",
            Self::InvalidTransition => "invalid_transition",
            Self::Unsupported => "unsupported",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Store,
    Form,
    Status,
    Session,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Store => "store",
            Self::Form => "form",
            Self::Status => "status",
            Self::Session => "session",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{form::ValidationIssues, types::EntityId};

    #[test]
    fn store_not_found_maps_to_not_found_class() {
        let err: InternalError = StoreError::NotFound {
            entity: "Product",
            id: EntityId::MIN,
        }
        .into();

        assert!(err.is_not_found());
        assert_eq!(err.origin, ErrorOrigin::Store);
        assert_eq!(
            err.display_with_class(),
            "store:not_found: Product not found: 1"
        );
    }

    #[test]
    fn validation_failure_keeps_form_detail() {
        let mut issues = ValidationIssues::default();
        issues.add("images", "at least one image is required");

        let err: InternalError = FormError::ValidationFailed(issues).into();

        assert!(err.is_validation());
        assert!(matches!(
            err.detail,
            Some(ErrorDetail::Form(FormError::ValidationFailed(ref issues))) if issues.contains("images")
        ));
    }
}
