//! Error type for `kudos-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored row failed to decode back into a domain value.
  #[error("corrupt row: {0}")]
  Corrupt(String),
}

impl From<Error> for kudos_core::Error {
  fn from(e: Error) -> Self {
    kudos_core::Error::Storage(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
