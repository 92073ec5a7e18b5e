//! Error taxonomy shared by the session core and its callers.
//!
//! # Design
//! - `Unauthorized` means the backend explicitly rejected the credential; it
//!   is the only kind that may end a session.
//! - `Transient` means "could not check" and never clears a credential.
//! - `Validation` carries the backend's `{ error }` message verbatim for the
//!   form that submitted it.

use thiserror::Error;

use crate::credential::Credential;
use crate::gate::AccessDenied;
use crate::transport::{ApiResponse, TransportError};

/// Failures surfaced by resolvers, auth calls and resource clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No credential is stored; nothing was sent.
    #[error("not signed in")]
    NoCredential,
    /// The backend rejected the credential (401/403).
    #[error("{message}")]
    Unauthorized {
        /// HTTP status.
        status: u16,
        /// Backend message or a default.
        message: String,
        /// Credential the rejected request carried.
        credential: Option<Credential>,
    },
    /// Backend-reported domain error on a submission.
    #[error("{message}")]
    Validation {
        /// HTTP status.
        status: u16,
        /// Backend message, verbatim.
        message: String,
    },
    /// Network, decode or non-domain server failure.
    #[error("{detail}")]
    Transient {
        /// Diagnostic detail.
        detail: String,
    },
    /// The current capabilities do not allow the action.
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    /// A logout superseded the operation before it could take effect.
    #[error("superseded by a newer session operation")]
    Superseded,
}

impl ApiError {
    /// Classify a non-2xx response.
    #[must_use]
    pub fn from_response(response: &ApiResponse) -> Self {
        let status = response.status;
        let message = response.error_message();
        match status {
            401 | 403 => Self::Unauthorized {
                status,
                message: message.unwrap_or_else(|| "Unauthorized".to_string()),
                credential: None,
            },
            502..=504 => Self::Transient {
                detail: format!("server unavailable (status {status})"),
            },
            _ => message.map_or_else(
                || Self::Transient {
                    detail: format!("request failed with status {status}"),
                },
                |message| Self::Validation { status, message },
            ),
        }
    }

    /// Record the credential a rejected request was sent with.
    #[must_use]
    pub fn sent_with(self, bearer: Option<Credential>) -> Self {
        match self {
            Self::Unauthorized {
                status, message, ..
            } => Self::Unauthorized {
                status,
                message,
                credential: bearer,
            },
            other => other,
        }
    }

    /// Whether this error means the credential was rejected.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        Self::Transient {
            detail: err.to_string(),
        }
    }
}

/// Kinds of session-level failure recorded in session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Credential rejected; it has been cleared.
    Unauthorized,
    /// Could not verify; credential kept.
    Transient,
}

/// Session-level failure with a user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SessionFailure {
    /// Failure kind.
    pub kind: FailureKind,
    /// User-visible message.
    pub message: String,
}

impl SessionFailure {
    /// Credential-rejected failure.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Unauthorized,
            message: message.into(),
        }
    }

    /// Could-not-check failure.
    #[must_use]
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transient,
            message: message.into(),
        }
    }
}
