//! Object url structures for S3 storage.
//!
//! Object urls follow the format: `s3://{bucket}/{key}`, where the key may
//! itself contain `/` separators. The key is used as the object name as
//! written: nothing is percent-decoded or encoded. Keys that the store
//! cannot name without rewriting them (leading or trailing `/`, empty
//! segments, `.` or `..` segments, control characters) are rejected.

use std::fmt;
use std::str::FromStr;

use object_store::path::Path;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Url scheme for S3 objects.
pub const SCHEME: &str = "s3";

/// A validated `s3://bucket/key` address.
///
/// Both components are guaranteed to be non-empty, and the bucket never
/// contains a `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl {
    bucket: String,
    key: String,
}

impl ObjectUrl {
    /// Creates a url from its components.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let bucket = bucket.into();
        let key = key.into();
        let display = format!("{SCHEME}://{bucket}/{key}");

        if bucket.is_empty() {
            return Err(Error::url_parse(display, "missing bucket"));
        }
        if bucket.contains('/') {
            return Err(Error::url_parse(display, "bucket must not contain '/'"));
        }
        if key.is_empty() {
            return Err(Error::url_parse(display, "missing key"));
        }
        if let Err(reason) = validate_key(&key) {
            return Err(Error::url_parse(display, reason));
        }

        Ok(Self { bucket, key })
    }

    /// Parses a `s3://bucket/key` string.
    pub fn parse(url: &str) -> Result<Self> {
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| Error::url_parse(url, "missing scheme"))?;

        if !scheme.eq_ignore_ascii_case(SCHEME) {
            return Err(Error::url_parse(url, "unsupported scheme"));
        }

        let (bucket, key) = rest
            .split_once('/')
            .ok_or_else(|| Error::url_parse(url, "missing key"))?;

        if bucket.is_empty() {
            return Err(Error::url_parse(url, "missing bucket"));
        }
        if key.is_empty() {
            return Err(Error::url_parse(url, "missing key"));
        }
        validate_key(key).map_err(|reason| Error::url_parse(url, reason))?;

        Ok(Self {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        })
    }

    /// Returns the bucket name.
    #[inline]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Returns the object key within the bucket.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Splits the url into `(bucket, key)`.
    pub fn into_parts(self) -> (String, String) {
        (self.bucket, self.key)
    }
}

/// Checks that `key` maps onto a store path unchanged.
fn validate_key(key: &str) -> std::result::Result<(), &'static str> {
    if key.starts_with('/') || key.ends_with('/') {
        return Err("key must not start or end with '/'");
    }

    match Path::parse(key) {
        Ok(path) if path.as_ref() == key => Ok(()),
        Ok(_) => Err("key is not a valid object path"),
        Err(object_store::path::Error::EmptySegment { .. }) => Err("key has an empty segment"),
        Err(_) => Err("key is not a valid object path"),
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}://{}/{}", self.bucket, self.key)
    }
}

impl FromStr for ObjectUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ObjectUrl {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<String> for ObjectUrl {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl Serialize for ObjectUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
