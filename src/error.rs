use thiserror::Error;

use crate::storage::StorageError;

/// The errors that may occur across the application.
#[derive(Debug, Error)]
pub enum Error {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("amount {0:?} is not a number")]
    InvalidAmount(String),

    #[error("description cannot be empty")]
    EmptyDescription,

    #[error("no database backend configured; run the configuration command first")]
    MissingConfiguration,

    #[error("file {0} does not exist")]
    FileNotFound(String),

    #[error("CSV file has no {0} column")]
    MissingColumn(&'static str),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("could not read CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not write settings: {0}")]
    Settings(#[from] toml::ser::Error),
}

impl Error {
    /// True for the per-row failures the CSV importer recovers from.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::NonPositiveAmount | Error::InvalidAmount(_) | Error::EmptyDescription
        )
    }
}
