use domain::LocaleError;
use serve::{RepositoryError, ResolveError};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EdgeError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Locale error: {0}")]
    Locale(#[from] LocaleError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
