//! Provider trait and object storage providers.

mod memory;
mod provider;
mod s3;

pub use memory::MemoryProvider;
pub use provider::Provider;
pub use s3::S3Provider;
