use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop the content directory from loading at all.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("cannot walk content directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0} is outside the content root")]
    OutsideRoot(PathBuf),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not signed in")]
    Unauthorized,

    #[error("template: {0}")]
    Template(#[from] tera::Error),

    #[error("database: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
