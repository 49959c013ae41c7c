pub mod init;
pub mod storage;
pub mod validation;
pub mod web;

use anyhow::Error as AnyhowError;
use config::ConfigError;
use init::InitContextError;
use sea_orm::{DbErr, TransactionError};
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use storage::StorageError;
use thiserror::Error;
use tokio::task::JoinError;
use web::WebError;

pub type GlowResult<T, E = GlowError> = anyhow::Result<T, E>;
pub type WebResult<T, E = WebError> = anyhow::Result<T, E>;
pub type StorageResult<T, E = StorageError> = Result<T, E>;

#[derive(Error, Debug, Default)]
pub enum GlowError {
    #[error("service unavailable")]
    #[default]
    ServiceUnavailable,
    #[error("{0}")]
    JoinError(#[from] JoinError),
    #[error("{0}")]
    IoError(#[from] IoError),
    #[error("{0}")]
    Msg(String),
    #[error("{0}")]
    Anyhow(#[from] AnyhowError),
    #[error("{0}")]
    Json(#[from] SerdeJsonError),
    #[error("{0}")]
    ConfigError(#[from] ConfigError),
    #[error("{0}")]
    StorageError(#[from] StorageError),
    #[error("{0}")]
    InitContextError(#[from] InitContextError),
    #[error("{0}")]
    WebError(#[from] WebError),
    #[error("Shutdown error: {0}")]
    ShutdownError(String),
}

impl From<String> for GlowError {
    #[inline]
    fn from(e: String) -> Self {
        GlowError::Msg(e)
    }
}

impl From<&str> for GlowError {
    #[inline]
    fn from(e: &str) -> Self {
        GlowError::Msg(e.to_string())
    }
}

impl From<DbErr> for GlowError {
    #[inline]
    fn from(e: DbErr) -> Self {
        GlowError::StorageError(StorageError::DBError(e))
    }
}

impl From<TransactionError<DbErr>> for GlowError {
    #[inline]
    fn from(e: TransactionError<DbErr>) -> Self {
        GlowError::StorageError(e.into())
    }
}
