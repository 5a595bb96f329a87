mod birds;

pub use birds::*;
use birdle_core::{FilterError, FormErrors};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] FormErrors),
    #[error("problem querying db: {0}")]
    DbError(#[from] sqlx::Error),
}

impl From<FilterError> for Error {
    fn from(error: FilterError) -> Self {
        Error::Validation(error.into())
    }
}
