//! Blocking handle to one bucket.

use bytes::Bytes;

use super::Connection;
use crate::client::ObjectStoreClient;
use crate::{Error, Result, TRACING_TARGET_CONNECTION};

/// A bucket resolved through a [`Connection`].
///
/// Every method blocks until the backend answers and translates not-found
/// responses into [`Error::BucketNotFound`] or [`Error::KeyNotFound`].
#[derive(Clone, Debug)]
pub struct Bucket {
    name: String,
    client: ObjectStoreClient,
    connection: Connection,
}

impl Bucket {
    pub(super) fn new(name: &str, client: ObjectStoreClient, connection: Connection) -> Self {
        Self {
            name: name.to_owned(),
            client,
            connection,
        }
    }

    /// Returns the bucket name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the async client for this bucket.
    #[inline]
    pub fn client(&self) -> &ObjectStoreClient {
        &self.client
    }

    /// Checks whether the bucket exists.
    pub fn exists(&self) -> Result<bool> {
        self.connection.block_on(self.client.bucket_exists())
    }

    /// Fetches the whole object stored under `key`.
    pub fn get_object(&self, key: &str) -> Result<Bytes> {
        match self.connection.block_on(self.client.get(key)) {
            Ok(data) => Ok(data),
            Err(err) if err.is_missing_bucket() => Err(Error::bucket_not_found(&self.name)),
            Err(err) if err.is_not_found() => {
                // S3 answers 404 for both; ask the bucket to tell them apart.
                if self.exists()? {
                    Err(Error::key_not_found(&self.name, key))
                } else {
                    Err(Error::bucket_not_found(&self.name))
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Stores `data` under `key`, replacing any existing object.
    pub fn put_object(&self, key: &str, data: impl Into<Bytes>) -> Result<()> {
        let data = data.into();
        let size = data.len();

        match self.connection.block_on(self.client.put(key, data)) {
            Ok(()) => {
                tracing::debug!(
                    target: TRACING_TARGET_CONNECTION,
                    bucket = %self.name,
                    key,
                    size,
                    "Object stored"
                );
                Ok(())
            }
            Err(err) if err.is_missing_bucket() || err.is_not_found() => {
                Err(Error::bucket_not_found(&self.name))
            }
            Err(err) => Err(err),
        }
    }

    /// Deletes the object under `key`. Deleting a missing key succeeds.
    pub fn delete_object(&self, key: &str) -> Result<()> {
        match self.connection.block_on(self.client.delete(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.is_missing_bucket() => Err(Error::bucket_not_found(&self.name)),
            Err(err) if err.is_not_found() => {
                if self.exists()? {
                    Ok(())
                } else {
                    Err(Error::bucket_not_found(&self.name))
                }
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;
    use std::sync::Arc;

    use futures::StreamExt;
    use futures::stream::{self, BoxStream};
    use object_store::path::Path;
    use object_store::{
        GetOptions, GetResult, ListResult, MultipartUpload, ObjectMeta, ObjectStore,
        PutMultipartOptions, PutOptions, PutPayload, PutResult,
    };

    use super::*;
    use crate::providers::MemoryProvider;

    fn test_bucket() -> Bucket {
        let conn = Connection::with_provider(MemoryProvider::with_buckets(["test"])).unwrap();
        conn.bucket("test").unwrap()
    }

    /// Answers every object request with a bare 404, the way S3 does when
    /// the response carries no `NoSuchBucket` code.
    #[derive(Debug)]
    struct NotFoundStore {
        bucket_exists: bool,
    }

    fn not_found(path: &Path) -> object_store::Error {
        object_store::Error::NotFound {
            path: path.to_string(),
            source: "404 Not Found".into(),
        }
    }

    impl fmt::Display for NotFoundStore {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("NotFoundStore")
        }
    }

    #[async_trait::async_trait]
    impl ObjectStore for NotFoundStore {
        async fn put_opts(
            &self,
            location: &Path,
            _payload: PutPayload,
            _opts: PutOptions,
        ) -> object_store::Result<PutResult> {
            Err(not_found(location))
        }

        async fn put_multipart_opts(
            &self,
            location: &Path,
            _opts: PutMultipartOptions,
        ) -> object_store::Result<Box<dyn MultipartUpload>> {
            Err(not_found(location))
        }

        async fn get_opts(
            &self,
            location: &Path,
            _options: GetOptions,
        ) -> object_store::Result<GetResult> {
            Err(not_found(location))
        }

        async fn delete(&self, location: &Path) -> object_store::Result<()> {
            Err(not_found(location))
        }

        fn list(
            &self,
            _prefix: Option<&Path>,
        ) -> BoxStream<'static, object_store::Result<ObjectMeta>> {
            if self.bucket_exists {
                stream::empty().boxed()
            } else {
                stream::iter([Err(not_found(&Path::default()))]).boxed()
            }
        }

        async fn list_with_delimiter(
            &self,
            prefix: Option<&Path>,
        ) -> object_store::Result<ListResult> {
            Err(not_found(&prefix.cloned().unwrap_or_default()))
        }

        async fn copy(&self, from: &Path, _to: &Path) -> object_store::Result<()> {
            Err(not_found(from))
        }

        async fn copy_if_not_exists(&self, from: &Path, _to: &Path) -> object_store::Result<()> {
            Err(not_found(from))
        }
    }

    fn not_found_bucket(bucket_exists: bool) -> Bucket {
        let conn = Connection::with_provider(MemoryProvider::new()).unwrap();
        let client = ObjectStoreClient::new(NotFoundStore { bucket_exists });
        Bucket::new("plain-404", client, conn)
    }

    #[test]
    fn put_get_delete() {
        let bucket = test_bucket();
        assert_eq!(bucket.name(), "test");

        bucket.put_object("a/b.txt", "payload").unwrap();
        assert_eq!(bucket.get_object("a/b.txt").unwrap(), Bytes::from("payload"));

        bucket.delete_object("a/b.txt").unwrap();
        let err = bucket.get_object("a/b.txt").unwrap_err();
        assert!(matches!(err, Error::KeyNotFound { ref key, .. } if key == "a/b.txt"));
    }

    #[test]
    fn missing_key() {
        let bucket = test_bucket();
        let err = bucket.get_object("not_existent_key").unwrap_err();
        assert!(matches!(
            err,
            Error::KeyNotFound { ref bucket, ref key } if bucket == "test" && key == "not_existent_key"
        ));
    }

    #[test]
    fn delete_missing_key() {
        test_bucket().delete_object("never-written").unwrap();
        not_found_bucket(true).delete_object("never-written").unwrap();
    }

    #[test]
    fn plain_not_found_falls_back_to_existence_check() {
        let missing = not_found_bucket(false);
        assert!(!missing.exists().unwrap());
        for err in [
            missing.get_object("k").unwrap_err(),
            missing.put_object("k", "x").unwrap_err(),
            missing.delete_object("k").unwrap_err(),
        ] {
            assert!(matches!(err, Error::BucketNotFound { ref bucket } if bucket == "plain-404"));
        }

        let present = not_found_bucket(true);
        assert!(matches!(
            present.get_object("k").unwrap_err(),
            Error::KeyNotFound { .. }
        ));
    }

    #[test]
    fn bucket_removed_after_resolution() {
        let provider = Arc::new(MemoryProvider::with_buckets(["gone"]));
        let conn = Connection::with_provider(Arc::clone(&provider)).unwrap();
        let bucket = conn.bucket("gone").unwrap();
        assert!(bucket.exists().unwrap());

        provider.remove_bucket("gone");
        assert!(matches!(
            conn.bucket("gone").unwrap_err(),
            Error::BucketNotFound { .. }
        ));
    }
}
