//! Async object-store client backed by [`object_store::ObjectStore`].
//!
//! [`ObjectStoreClient`] is a thin, cloneable wrapper around
//! `Arc<dyn ObjectStore>` scoped to a single bucket. Every public method is
//! instrumented with [`tracing`] for observability.

use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use object_store::path::Path;
use object_store::{ObjectMeta, ObjectStore, PutMode, PutOptions, PutPayload};

use crate::{Error, Result};

/// Cloneable handle to an [`ObjectStore`] rooted at one bucket.
///
/// All methods accept string keys and convert them to
/// [`object_store::path::Path`] internally.
#[derive(Clone, Debug)]
pub struct ObjectStoreClient(pub Arc<dyn ObjectStore>);

impl ObjectStoreClient {
    /// Wrap a concrete [`ObjectStore`] implementation.
    pub fn new(store: impl ObjectStore) -> Self {
        Self(Arc::new(store))
    }

    /// Check whether the bucket behind this store exists.
    ///
    /// Requests the first page of a listing: an empty or non-empty page means
    /// the bucket is there, a not-found or `NoSuchBucket` response means it
    /// is not, any other error is propagated.
    #[tracing::instrument(name = "object.bucket_exists", skip(self))]
    pub async fn bucket_exists(&self) -> Result<bool> {
        let mut listing = self.0.list(None);
        match listing.next().await {
            None | Some(Ok(_)) => Ok(true),
            Some(Err(err)) => {
                let err = Error::from(err);
                if err.is_not_found() || err.is_missing_bucket() {
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Retrieve the full contents stored at `key`.
    #[tracing::instrument(name = "object.get", skip(self), fields(size))]
    pub async fn get(&self, key: &str) -> Result<Bytes> {
        let path = object_path(key)?;
        let result = self.0.get(&path).await?;
        let data = result.bytes().await?;
        tracing::Span::current().record("size", data.len());
        Ok(data)
    }

    /// Upload `data` to `key`, replacing any existing object.
    pub async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        self.put_opts(key, data, PutMode::Overwrite).await
    }

    /// Upload `data` to `key` with the specified [`PutMode`].
    #[tracing::instrument(name = "object.put_opts", skip(self, data), fields(size = data.len()))]
    pub async fn put_opts(&self, key: &str, data: Bytes, mode: PutMode) -> Result<()> {
        let path = object_path(key)?;
        let opts = PutOptions {
            mode,
            ..Default::default()
        };
        self.0.put_opts(&path, PutPayload::from(data), opts).await?;
        Ok(())
    }

    /// Get object metadata without downloading the body.
    #[tracing::instrument(name = "object.head", skip(self))]
    pub async fn head(&self, key: &str) -> Result<ObjectMeta> {
        let path = object_path(key)?;
        Ok(self.0.head(&path).await?)
    }

    /// Delete the object at `key`.
    #[tracing::instrument(name = "object.delete", skip(self))]
    pub async fn delete(&self, key: &str) -> Result<()> {
        let path = object_path(key)?;
        Ok(self.0.delete(&path).await?)
    }
}

/// Converts a key into a store path without rewriting it.
///
/// Unlike `Path::from`, which drops empty segments and percent-encodes
/// reserved characters, `Path::parse` keeps the key as the object name and
/// rejects what it cannot represent.
fn object_path(key: &str) -> Result<Path> {
    Ok(Path::parse(key).map_err(object_store::Error::from)?)
}
