//! Provider trait for resolving buckets to object-store clients.

use std::sync::Arc;

use crate::Result;
use crate::client::ObjectStoreClient;

/// Factory for bucket-scoped clients of one storage service.
///
/// Implementations hold whatever a session needs (credentials, endpoint,
/// in-memory state) and hand out an [`ObjectStoreClient`] per bucket.
/// Resolving a bucket must not perform network I/O: existence of remote
/// buckets is only known once a request is made through the client.
pub trait Provider: Send + Sync + 'static {
    /// Unique identifier (e.g. "s3", "memory").
    fn id(&self) -> &'static str;

    /// Returns a client rooted at `bucket`.
    ///
    /// Providers that know their buckets locally return
    /// [`Error::BucketNotFound`](crate::Error::BucketNotFound) for unknown
    /// names.
    fn bucket(&self, bucket: &str) -> Result<ObjectStoreClient>;
}

impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn id(&self) -> &'static str {
        (**self).id()
    }

    fn bucket(&self, bucket: &str) -> Result<ObjectStoreClient> {
        (**self).bucket(bucket)
    }
}
