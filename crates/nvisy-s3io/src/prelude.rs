//! Convenience re-exports.

pub use crate::client::ObjectStoreClient;
pub use crate::config::{Credentials, S3Config};
pub use crate::connection::{Bucket, Connection};
pub use crate::error::{Error, Result};
pub use crate::file::{ObjectFile, OpenOptions};
pub use crate::providers::{MemoryProvider, Provider, S3Provider};
pub use crate::types::{ObjectUrl, OpenMode};
