//! Blocking connection to an object storage service.
//!
//! A [`Connection`] pairs a [`Provider`] with a single-threaded tokio runtime
//! and drives every async [`ObjectStoreClient`](crate::client::ObjectStoreClient)
//! call to completion on the calling thread. Connections are cheap to clone;
//! clones share the provider and the runtime.
//!
//! The blocking methods must not be called from inside an async runtime.

mod bucket;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

pub use self::bucket::Bucket;
use crate::config::S3Config;
use crate::providers::{Provider, S3Provider};
use crate::{Error, Result, TRACING_TARGET_CONNECTION};

/// Shared, blocking session with an object storage service.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

struct ConnectionInner {
    provider: Box<dyn Provider>,
    config: Option<S3Config>,
    runtime: Runtime,
}

impl Connection {
    /// Connects to S3 with the given configuration.
    ///
    /// No request is made until a bucket is used.
    pub fn connect(config: S3Config) -> Result<Self> {
        if let Some(creds) = config.credentials() {
            tracing::debug!(
                target: TRACING_TARGET_CONNECTION,
                access_key_id = %creds.access_key_id_masked(),
                "Using static credentials"
            );
        }

        let provider = S3Provider::new(config.clone());
        Self::build(Box::new(provider), Some(config))
    }

    /// Connects to S3 with configuration resolved from the environment.
    pub fn from_env() -> Result<Self> {
        Self::connect(S3Config::from_env())
    }

    /// Creates a connection over any [`Provider`].
    pub fn with_provider(provider: impl Provider) -> Result<Self> {
        Self::build(Box::new(provider), None)
    }

    fn build(provider: Box<dyn Provider>, config: Option<S3Config>) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;

        tracing::info!(
            target: TRACING_TARGET_CONNECTION,
            provider = provider.id(),
            "Connection established"
        );

        Ok(Self {
            inner: Arc::new(ConnectionInner {
                provider,
                config,
                runtime,
            }),
        })
    }

    /// Returns the identifier of the underlying provider.
    #[inline]
    pub fn provider_id(&self) -> &'static str {
        self.inner.provider.id()
    }

    /// Returns the S3 configuration this connection was built from.
    ///
    /// `None` for connections created with [`with_provider`](Self::with_provider).
    #[inline]
    pub fn config(&self) -> Option<&S3Config> {
        self.inner.config.as_ref()
    }

    /// Resolves a bucket by name.
    ///
    /// Remote buckets are not checked here; a missing remote bucket surfaces
    /// as [`Error::BucketNotFound`] from the first request that touches it.
    pub fn bucket(&self, name: &str) -> Result<Bucket> {
        let client = self.inner.provider.bucket(name)?;
        Ok(Bucket::new(name, client, self.clone()))
    }

    /// Verifies that `bucket` exists and is reachable with this connection.
    pub fn verify(&self, bucket: &str) -> Result<()> {
        if self.bucket(bucket)?.exists()? {
            tracing::debug!(target: TRACING_TARGET_CONNECTION, bucket, "Bucket verified");
            Ok(())
        } else {
            Err(Error::bucket_not_found(bucket))
        }
    }

    /// Returns `true` if both handles share the same session.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Runs `future` to completion on the connection runtime.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.inner.runtime.block_on(future)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("provider", &self.provider_id())
            .finish_non_exhaustive()
    }
}
