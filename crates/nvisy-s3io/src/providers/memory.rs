//! In-process provider using [`object_store::memory::InMemory`].

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use object_store::ObjectStore;
use object_store::memory::InMemory;

use super::Provider;
use crate::client::ObjectStoreClient;
use crate::{Error, Result};

/// Provider keeping a set of named in-memory buckets.
///
/// Buckets must be created with [`create_bucket`](Self::create_bucket)
/// before use; resolving an unknown name fails with
/// [`Error::BucketNotFound`]. Objects live as long as the provider.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    buckets: RwLock<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl MemoryProvider {
    /// Creates a provider without buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider with the given empty buckets.
    pub fn with_buckets<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new();
        for name in names {
            provider.create_bucket(name);
        }
        provider
    }

    /// Creates an empty bucket. Returns `false` if it already existed.
    pub fn create_bucket(&self, name: impl Into<String>) -> bool {
        let mut buckets = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        let name = name.into();
        if buckets.contains_key(&name) {
            return false;
        }
        buckets.insert(name, Arc::new(InMemory::new()));
        true
    }

    /// Removes a bucket and all its objects. Returns `false` if it did not
    /// exist.
    pub fn remove_bucket(&self, name: &str) -> bool {
        let mut buckets = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        buckets.remove(name).is_some()
    }
}

impl Provider for MemoryProvider {
    fn id(&self) -> &'static str {
        "memory"
    }

    fn bucket(&self, bucket: &str) -> Result<ObjectStoreClient> {
        let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
        buckets
            .get(bucket)
            .map(|store| ObjectStoreClient(Arc::clone(store)))
            .ok_or_else(|| Error::bucket_not_found(bucket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_bucket_is_not_found() {
        let provider = MemoryProvider::new();
        let err = provider.bucket("nope").unwrap_err();
        assert!(matches!(err, Error::BucketNotFound { ref bucket } if bucket == "nope"));
    }

    #[test]
    fn create_and_remove() {
        let provider = MemoryProvider::new();
        assert!(provider.create_bucket("b"));
        assert!(!provider.create_bucket("b"));
        assert!(provider.bucket("b").is_ok());

        assert!(provider.remove_bucket("b"));
        assert!(!provider.remove_bucket("b"));
        assert!(provider.bucket("b").is_err());
    }

    #[tokio::test]
    async fn clients_share_bucket_state() {
        let provider = MemoryProvider::with_buckets(["shared"]);
        let a = provider.bucket("shared").unwrap();
        let b = provider.bucket("shared").unwrap();

        a.put("k", bytes::Bytes::from("v")).await.unwrap();
        assert_eq!(b.get("k").await.unwrap(), bytes::Bytes::from("v"));
    }
}
