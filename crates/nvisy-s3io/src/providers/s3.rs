//! S3-compatible provider using [`object_store::aws::AmazonS3Builder`].
//!
//! Works with AWS S3, MinIO, and any S3-compatible service.

use object_store::aws::AmazonS3Builder;

use super::Provider;
use crate::TRACING_TARGET_CONNECTION;
use crate::client::ObjectStoreClient;
use crate::config::S3Config;
use crate::{Error, Result};

/// S3-backed provider building one client per bucket from a shared config.
#[derive(Debug, Clone)]
pub struct S3Provider {
    config: S3Config,
}

impl S3Provider {
    /// Creates a provider from configuration.
    pub fn new(config: S3Config) -> Self {
        Self { config }
    }

    /// Returns the configuration for this provider.
    pub fn config(&self) -> &S3Config {
        &self.config
    }

    fn builder(&self, bucket: &str) -> AmazonS3Builder {
        let config = &self.config;
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(bucket)
            .with_region(&config.region)
            .with_allow_http(config.allow_http);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        if let Some(creds) = &config.credentials {
            builder = builder
                .with_access_key_id(&creds.access_key_id)
                .with_secret_access_key(&creds.secret_access_key);

            if let Some(token) = creds.session_token() {
                builder = builder.with_token(token);
            }
        }

        builder
    }
}

impl Provider for S3Provider {
    fn id(&self) -> &'static str {
        "s3"
    }

    fn bucket(&self, bucket: &str) -> Result<ObjectStoreClient> {
        let store = self
            .builder(bucket)
            .build()
            .map_err(|e| Error::config(e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET_CONNECTION,
            bucket,
            region = %self.config.region,
            endpoint = ?self.config.endpoint,
            "S3 bucket client created"
        );

        Ok(ObjectStoreClient::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;

    #[test]
    fn builds_client_without_network() {
        let config = S3Config::new("eu-central-1")
            .with_endpoint("http://localhost:9000")
            .with_credentials(Credentials::new("id", "secret").with_session_token("token"));
        let provider = S3Provider::new(config);

        assert_eq!(provider.id(), "s3");
        assert!(provider.bucket("some-bucket").is_ok());
    }

    #[test]
    fn keeps_config() {
        let provider = S3Provider::new(S3Config::new("us-west-2"));
        assert_eq!(provider.config().region, "us-west-2");
    }
}
