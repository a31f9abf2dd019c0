//! Error types for object file operations.

/// Result type for all operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// S3 error code returned when the addressed bucket does not exist.
///
/// `object_store` has no typed variant for it; the code is only visible in
/// the error display, which embeds the S3 response body. Callers that see a
/// plain not-found fall back to [`Bucket::exists`](crate::connection::Bucket::exists).
const NO_SUCH_BUCKET: &str = "NoSuchBucket";

/// Errors that can occur while opening, reading, writing or committing
/// an object file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input does not have the `s3://bucket/key` shape.
    #[error("invalid object url '{url}': {reason}")]
    UrlParse { url: String, reason: &'static str },

    /// The bucket does not exist or is not accessible.
    #[error("bucket '{bucket}' not found")]
    BucketNotFound { bucket: String },

    /// The bucket exists but holds no object under the key.
    #[error("key '{key}' not found in bucket '{bucket}'")]
    KeyNotFound { bucket: String, key: String },

    /// The object file was already closed.
    #[error("object file is closed")]
    Closed,

    /// The object file was opened for writing.
    #[error("object file is not open for reading")]
    NotReadable,

    /// The object file was opened for reading.
    #[error("object file is not open for writing")]
    NotWritable,

    /// Unrecognized open mode string.
    #[error("invalid open mode '{0}'")]
    InvalidMode(String),

    /// The storage backend could not be configured.
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    /// The connection runtime could not be started.
    #[error("connection runtime error: {0}")]
    Runtime(#[from] std::io::Error),

    /// Untranslated error from the storage backend.
    #[error("object store error: {0}")]
    Backend(#[from] object_store::Error),
}

impl Error {
    /// Creates a new url parse error.
    pub fn url_parse(url: impl Into<String>, reason: &'static str) -> Self {
        Self::UrlParse {
            url: url.into(),
            reason,
        }
    }

    /// Creates a new bucket not found error.
    pub fn bucket_not_found(bucket: impl Into<String>) -> Self {
        Self::BucketNotFound {
            bucket: bucket.into(),
        }
    }

    /// Creates a new key not found error.
    pub fn key_not_found(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::KeyNotFound {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Whether the error means some addressed resource is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BucketNotFound { .. }
                | Self::KeyNotFound { .. }
                | Self::Backend(object_store::Error::NotFound { .. })
        )
    }

    /// Whether the backend reported that the bucket itself is missing.
    ///
    /// S3 answers both a missing bucket and a missing key with a 404, so the
    /// error code in the response body is the only reliable signal.
    pub fn is_missing_bucket(&self) -> bool {
        match self {
            Self::BucketNotFound { .. } => true,
            Self::Backend(err) => err.to_string().contains(NO_SUCH_BUCKET),
            _ => false,
        }
    }

    /// Whether the caller should retry this operation.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Backend(err) => !matches!(
                err,
                object_store::Error::NotFound { .. }
                    | object_store::Error::PermissionDenied { .. }
                    | object_store::Error::Unauthenticated { .. }
                    | object_store::Error::AlreadyExists { .. }
                    | object_store::Error::Precondition { .. }
            ) && !self.is_missing_bucket(),
            _ => false,
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;

        let kind = match &err {
            Error::BucketNotFound { .. } | Error::KeyNotFound { .. } => ErrorKind::NotFound,
            Error::UrlParse { .. } | Error::InvalidMode(_) => ErrorKind::InvalidInput,
            Error::Closed | Error::NotReadable | Error::NotWritable => ErrorKind::Unsupported,
            Error::Runtime(io) => io.kind(),
            _ => ErrorKind::Other,
        };

        std::io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> object_store::Error {
        object_store::Error::NotFound {
            path: "missing".to_string(),
            source: "404".into(),
        }
    }

    #[test]
    fn not_found_kinds() {
        assert!(Error::bucket_not_found("b").is_not_found());
        assert!(Error::key_not_found("b", "k").is_not_found());
        assert!(Error::Backend(not_found()).is_not_found());
        assert!(!Error::Closed.is_not_found());
    }

    #[test]
    fn missing_bucket_detected_from_error_code() {
        let err = Error::Backend(object_store::Error::Generic {
            store: "S3",
            source: "Client error with status 404 Not Found: <Code>NoSuchBucket</Code>".into(),
        });
        assert!(err.is_missing_bucket());
        assert!(!err.is_retryable());

        assert!(!Error::Backend(not_found()).is_missing_bucket());
    }

    #[test]
    fn retryable_only_for_transient_backend_errors() {
        let transient = Error::Backend(object_store::Error::Generic {
            store: "S3",
            source: "connection reset".into(),
        });
        assert!(transient.is_retryable());
        assert!(!Error::Backend(not_found()).is_retryable());
        assert!(!Error::url_parse("x", "missing scheme").is_retryable());
    }

    #[test]
    fn converts_to_io_error_kind() {
        let io: std::io::Error = Error::key_not_found("b", "k").into();
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);

        let io: std::io::Error = Error::Closed.into();
        assert_eq!(io.kind(), std::io::ErrorKind::Unsupported);
    }

    #[test]
    fn display_names_the_resource() {
        let err = Error::key_not_found("bucket", "a/b.txt");
        assert_eq!(err.to_string(), "key 'a/b.txt' not found in bucket 'bucket'");
    }
}
