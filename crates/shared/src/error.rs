use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of a user action forwarded to the auction state.
///
/// Every variant except `Success` carries the text shown in the view's error
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ActionOutcome {
    Success,
    ValidationError(String),
    Unauthorized(String),
    AlreadyClosed(String),
    NotFound(String),
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success)
    }

    pub fn error_text(&self) -> &str {
        match self {
            ActionOutcome::Success => "",
            ActionOutcome::ValidationError(message)
            | ActionOutcome::Unauthorized(message)
            | ActionOutcome::AlreadyClosed(message)
            | ActionOutcome::NotFound(message) => message,
        }
    }

    /// Deleting an auction that has already closed still lets the moderator
    /// leave the view.
    pub fn allows_leaving_after_delete(&self) -> bool {
        matches!(
            self,
            ActionOutcome::Success | ActionOutcome::AlreadyClosed(_)
        )
    }
}

impl From<Result<(), AuctionError>> for ActionOutcome {
    fn from(value: Result<(), AuctionError>) -> Self {
        match value {
            Ok(()) => ActionOutcome::Success,
            Err(err) => err.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    AlreadyClosed(String),
    #[error("{0}")]
    NotFound(String),
}

impl AuctionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn already_closed(message: impl Into<String>) -> Self {
        Self::AlreadyClosed(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<AuctionError> for ActionOutcome {
    fn from(value: AuctionError) -> Self {
        match value {
            AuctionError::Validation(message) => ActionOutcome::ValidationError(message),
            AuctionError::Unauthorized(message) => ActionOutcome::Unauthorized(message),
            AuctionError::AlreadyClosed(message) => ActionOutcome::AlreadyClosed(message),
            AuctionError::NotFound(message) => ActionOutcome::NotFound(message),
        }
    }
}
