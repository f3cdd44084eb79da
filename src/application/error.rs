use thiserror::Error;

use crate::domain::{AccountNumberError, ParseProviderError};

use super::SessionId;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not signed in: a user is required to access service accounts")]
    NotAuthenticated,

    #[error("Session is not open: {0}")]
    SessionNotOpen(SessionId),

    #[error("Service account not found: {0}")]
    AccountNotFound(String),

    #[error(transparent)]
    InvalidAccountNumber(#[from] AccountNumberError),

    #[error(transparent)]
    InvalidProvider(#[from] ParseProviderError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
