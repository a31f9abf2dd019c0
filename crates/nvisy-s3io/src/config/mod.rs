//! Connection configuration and credentials.

mod credentials;
mod s3_config;

pub use credentials::Credentials;
pub use s3_config::S3Config;
