//! Options and resolution logic for opening object files.

use super::ObjectFile;
use crate::config::{Credentials, S3Config};
use crate::connection::Connection;
use crate::types::{ObjectUrl, OpenMode};
use crate::{Error, Result, TRACING_TARGET_FILE};

/// Options for opening an [`ObjectFile`].
///
/// The connection used is, in order of precedence: the one passed to
/// [`connection`](Self::connection); a new S3 connection built from
/// [`credentials`](Self::credentials) on top of [`config`](Self::config)
/// (or the environment when no config is given); a new S3 connection built
/// from [`S3Config::from_env`].
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    mode: OpenMode,
    connection: Option<Connection>,
    credentials: Option<Credentials>,
    config: Option<S3Config>,
}

impl OpenOptions {
    /// Creates options for reading with ambient configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the open mode.
    #[must_use]
    pub fn mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    /// Opens for reading.
    #[must_use]
    pub fn read(self) -> Self {
        self.mode(OpenMode::Read)
    }

    /// Opens for writing.
    #[must_use]
    pub fn write(self) -> Self {
        self.mode(OpenMode::Write)
    }

    /// Reuses an existing connection. The connection is shared, never closed.
    #[must_use]
    pub fn connection(mut self, connection: &Connection) -> Self {
        self.connection = Some(connection.clone());
        self
    }

    /// Builds a new connection with these credentials.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets region and endpoint used when a new connection is built.
    #[must_use]
    pub fn config(mut self, config: S3Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Opens the object at `url`.
    ///
    /// The url is validated before any connection is made. In read mode the
    /// whole object is fetched before this returns; in write mode no request
    /// is made.
    pub fn open(&self, url: &str) -> Result<ObjectFile> {
        self.open_url(ObjectUrl::parse(url)?)
    }

    /// Opens the object at an already parsed `url`.
    pub fn open_url(&self, url: ObjectUrl) -> Result<ObjectFile> {
        let connection = self.resolve_connection()?;

        match self.mode {
            OpenMode::Read => {
                let data = connection.bucket(url.bucket())?.get_object(url.key())?;
                tracing::debug!(
                    target: TRACING_TARGET_FILE,
                    url = %url,
                    size = data.len(),
                    "Object opened for reading"
                );
                Ok(ObjectFile::reader(url, connection, data))
            }
            OpenMode::Write => {
                tracing::debug!(
                    target: TRACING_TARGET_FILE,
                    url = %url,
                    "Object opened for writing"
                );
                Ok(ObjectFile::writer(url, connection))
            }
        }
    }

    /// Opens the object at `url` for the duration of `scope`.
    ///
    /// When `scope` returns `Ok` the file is closed, committing buffered
    /// writes; a commit failure is returned. When `scope` returns `Err` the
    /// file is discarded without committing, so a failed write never
    /// replaces the remote object with partial content.
    pub fn open_with<T, E, F>(&self, url: &str, scope: F) -> Result<T, E>
    where
        F: FnOnce(&mut ObjectFile) -> Result<T, E>,
        E: From<Error>,
    {
        let mut file = self.open(url)?;
        match scope(&mut file) {
            Ok(value) => {
                file.close()?;
                Ok(value)
            }
            Err(err) => {
                file.discard();
                Err(err)
            }
        }
    }

    /// Returns the connection these options resolve to.
    pub fn resolve_connection(&self) -> Result<Connection> {
        if let Some(connection) = &self.connection {
            return Ok(connection.clone());
        }

        let config = self.config.clone().unwrap_or_else(S3Config::from_env);
        let config = match &self.credentials {
            Some(credentials) => config.with_credentials(credentials.clone()),
            None => config,
        };

        Connection::connect(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MemoryProvider;

    fn offline_config() -> S3Config {
        S3Config::new("us-east-1").with_endpoint("http://127.0.0.1:1")
    }

    #[test]
    fn supplied_connection_takes_precedence() {
        let conn = Connection::with_provider(MemoryProvider::new()).unwrap();
        let resolved = OpenOptions::new()
            .credentials(Credentials::new("id", "secret"))
            .connection(&conn)
            .resolve_connection()
            .unwrap();
        assert!(resolved.ptr_eq(&conn));
    }

    #[test]
    fn credentials_build_s3_connection() {
        let resolved = OpenOptions::new()
            .config(offline_config())
            .credentials(Credentials::new("id", "secret"))
            .resolve_connection()
            .unwrap();
        assert_eq!(resolved.provider_id(), "s3");
    }

    #[test]
    fn credentials_match_supplied_connection() {
        let credentials = Credentials::new("id", "secret");
        let supplied =
            Connection::connect(offline_config().with_credentials(credentials.clone())).unwrap();

        let resolved = OpenOptions::new()
            .config(offline_config())
            .credentials(credentials)
            .resolve_connection()
            .unwrap();

        assert!(!resolved.ptr_eq(&supplied));
        assert_eq!(resolved.provider_id(), supplied.provider_id());
        assert_eq!(resolved.config(), supplied.config());
        assert_eq!(
            resolved.config().and_then(S3Config::credentials),
            Some(&Credentials::new("id", "secret"))
        );

        let via_connection = OpenOptions::new()
            .connection(&supplied)
            .resolve_connection()
            .unwrap();
        assert_eq!(via_connection.config(), resolved.config());
    }

    #[test]
    fn invalid_url_fails_before_connecting() {
        let err = OpenOptions::new()
            .credentials(Credentials::new("id", "secret"))
            .open("s3://something")
            .unwrap_err();
        assert!(matches!(err, Error::UrlParse { .. }));
    }

    #[test]
    fn write_open_makes_no_request() {
        // Nothing listens on the endpoint, so any request would fail.
        let file = OpenOptions::new()
            .write()
            .config(offline_config())
            .credentials(Credentials::new("id", "secret"))
            .open("s3://bucket/key.txt")
            .unwrap();
        assert!(file.mode().is_write());
        assert!(file.is_empty());
        file.discard();
    }
}
