use std::path::PathBuf;

use mo_i18n_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog not found: {0}")]
    NotFound(PathBuf),
    #[error("malformed catalog: {0}")]
    Catalog(#[from] CoreError),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
