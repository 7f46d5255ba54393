//! Error types shared by the API contract, the form model and the pages.

use thiserror::Error;

/// Failure of a single backend call.
///
/// The display form is what a page shows in its error notification, so it
/// reads as a sentence: `Failed to fetch policies: Not Found`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("Failed to {action}: {reason}")]
    Status {
        action: String,
        status: u16,
        reason: String,
    },

    /// The request never produced a response.
    #[error("Failed to {action}: {message}")]
    Transport { action: String, message: String },

    /// The response body was not the expected JSON.
    #[error("Failed to {action}: invalid response body ({message})")]
    Decode { action: String, message: String },
}

impl ApiError {
    pub fn status(action: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        Self::Status {
            action: action.into(),
            status,
            reason: reason.into(),
        }
    }

    pub fn transport(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            action: action.into(),
            message: message.into(),
        }
    }

    pub fn decode(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            action: action.into(),
            message: message.into(),
        }
    }

    /// HTTP status, when the backend answered at all.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Local validation failure raised by the policy form before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all required fields")]
    MissingRequiredFields,

    #[error("Please provide a valid number of days for fixed access")]
    InvalidFixedDuration,

    #[error("Please provide a valid day range for user requested access")]
    InvalidRequestedRange,

    #[error("Form is read-only")]
    ReadOnly,
}

/// Outcome of handing a validated payload to the caller's submit callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] FormError),

    #[error(transparent)]
    Rejected(#[from] ApiError),
}

pub type ApiResult<T> = Result<T, ApiError>;
