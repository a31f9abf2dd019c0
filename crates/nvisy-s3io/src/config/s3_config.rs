//! S3 connection configuration.

use serde::{Deserialize, Serialize};

use super::Credentials;

// Default values
const DEFAULT_REGION: &str = "us-east-1";

// Environment variables consulted by `S3Config::from_env`
const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
const ENV_REGION: &str = "AWS_REGION";
const ENV_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
const ENV_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";
const ENV_ENDPOINT: &str = "AWS_ENDPOINT";
const ENV_ALLOW_HTTP: &str = "AWS_ALLOW_HTTP";

/// Configuration used to build an S3 connection.
///
/// The bucket is not part of the configuration: it comes from each object
/// url, so one connection serves every bucket the credentials can reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Config {
    /// AWS region (defaults to `us-east-1`).
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint URL (for S3-compatible storage like MinIO, R2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Allow plain `http://` endpoints.
    #[serde(default)]
    pub allow_http: bool,
    /// Static credentials. When absent the S3 client falls back to its own
    /// credential chain (instance metadata, web identity, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            allow_http: false,
            credentials: None,
        }
    }
}

impl S3Config {
    /// Creates a configuration for the given region.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    /// Resolves the ambient configuration from the process environment.
    ///
    /// The environment is read once, here; the returned value does not track
    /// later changes.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves the ambient configuration through `lookup`, which maps an
    /// environment variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let region = var(ENV_REGION)
            .or_else(|| var(ENV_DEFAULT_REGION))
            .unwrap_or_else(default_region);

        let credentials = match (var(ENV_ACCESS_KEY_ID), var(ENV_SECRET_ACCESS_KEY)) {
            (Some(id), Some(secret)) => {
                let creds = Credentials::new(id, secret);
                Some(match var(ENV_SESSION_TOKEN) {
                    Some(token) => creds.with_session_token(token),
                    None => creds,
                })
            }
            _ => None,
        };

        let allow_http = var(ENV_ALLOW_HTTP)
            .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            region,
            endpoint: var(ENV_ENDPOINT_URL).or_else(|| var(ENV_ENDPOINT)),
            allow_http,
            credentials,
        }
    }

    /// Sets the custom endpoint (for S3-compatible storage).
    ///
    /// Plain `http://` endpoints also enable [`allow_http`](Self::allow_http).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        if endpoint.starts_with("http://") {
            self.allow_http = true;
        }
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Sets the access credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Returns the credentials if configured.
    #[inline]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}
