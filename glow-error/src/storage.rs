use sea_orm::{DbErr, TransactionError};
use thiserror::Error;

#[derive(Error, Debug, Default)]
pub enum StorageError {
    #[error("database unavailable")]
    #[default]
    StorageUnavailable,

    #[error("database error: `{0}`")]
    DBError(#[from] DbErr),

    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// Uploaded file could not be written to or removed from the media root
    #[error("media storage error: {0}")]
    Media(#[from] std::io::Error),
}

impl From<TransactionError<DbErr>> for StorageError {
    fn from(e: TransactionError<DbErr>) -> Self {
        match e {
            TransactionError::Connection(e) | TransactionError::Transaction(e) => {
                StorageError::DBError(e)
            }
        }
    }
}
