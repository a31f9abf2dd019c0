#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for connection and bucket operations.
///
/// Use this target for logging connection setup, bucket resolution, and
/// object transfers.
pub const TRACING_TARGET_CONNECTION: &str = "nvisy_s3io::connection";

/// Tracing target for object file operations.
///
/// Use this target for logging file open, commit and discard events.
pub const TRACING_TARGET_FILE: &str = "nvisy_s3io::file";

/// Async object-store client.
pub mod client;
/// Connection configuration and credentials.
pub mod config;
/// Blocking connection and bucket handles.
pub mod connection;
mod error;
/// File-like access to remote objects.
pub mod file;
/// Provider trait and object storage providers.
pub mod providers;
/// Object url and open mode types.
pub mod types;

#[doc(hidden)]
pub mod prelude;

pub use config::{Credentials, S3Config};
pub use connection::{Bucket, Connection};
pub use error::{Error, Result};
pub use file::{ObjectFile, OpenOptions};
pub use types::{ObjectUrl, OpenMode};

/// Opens the object at `url` for reading, using ambient configuration.
///
/// See [`OpenOptions`] to supply a connection or credentials.
pub fn open(url: &str) -> Result<ObjectFile> {
    OpenOptions::new().read().open(url)
}

/// Opens the object at `url` for writing, using ambient configuration.
///
/// The object is replaced when the returned file is closed.
pub fn create(url: &str) -> Result<ObjectFile> {
    OpenOptions::new().write().open(url)
}
