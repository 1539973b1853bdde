//! Error taxonomy shared by the service and the client.

use std::path::PathBuf;

use thiserror::Error;

/// A required field was missing or empty in an add request.
///
/// Raised at the HTTP boundary (and by the add form) before anything
/// reaches storage or the cache controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} is required")]
pub struct ValidationError {
  pub field: &'static str,
}

/// Adapter-level failure: the database could not be opened or a statement
/// failed.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("failed to open database at {}: {source}", path.display())]
  Open {
    path: PathBuf,
    source: rusqlite::Error,
  },
  #[error("failed to create database directory {}: {source}", path.display())]
  CreateDir {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("query failed: {0}")]
  Query(#[from] rusqlite::Error),
}

/// Client-to-server call failure: network error, non-2xx status, or a body
/// that did not decode.
#[derive(Debug, Error)]
pub enum TransportError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("server responded {status}: {message}")]
  Status { status: u16, message: String },
}
