//! File-like handle to one remote object.

use std::{fmt, io};

use bytes::{Bytes, BytesMut};

use crate::connection::Connection;
use crate::types::{ObjectUrl, OpenMode};
use crate::{Error, Result, TRACING_TARGET_FILE};

/// An open remote object with whole-object semantics.
///
/// In read mode the full content was fetched when the file was opened and
/// reads are served from memory. In write mode every write is buffered and
/// the whole buffer replaces the remote object when the file is closed.
///
/// A write-mode file that is dropped while still open commits its buffer,
/// unless the thread is panicking. Errors from such a drop-time commit can
/// only be logged; call [`close`](Self::close) to observe them.
pub struct ObjectFile {
    url: ObjectUrl,
    connection: Connection,
    buffer: Buffer,
    closed: bool,
}

enum Buffer {
    Read { data: Bytes, position: usize },
    Write(BytesMut),
}

impl ObjectFile {
    pub(crate) fn reader(url: ObjectUrl, connection: Connection, data: Bytes) -> Self {
        Self {
            url,
            connection,
            buffer: Buffer::Read { data, position: 0 },
            closed: false,
        }
    }

    pub(crate) fn writer(url: ObjectUrl, connection: Connection) -> Self {
        Self {
            url,
            connection,
            buffer: Buffer::Write(BytesMut::new()),
            closed: false,
        }
    }

    /// Returns the address of the object.
    #[inline]
    pub fn url(&self) -> &ObjectUrl {
        &self.url
    }

    /// Returns the mode the file was opened with.
    pub fn mode(&self) -> OpenMode {
        match self.buffer {
            Buffer::Read { .. } => OpenMode::Read,
            Buffer::Write(_) => OpenMode::Write,
        }
    }

    /// Returns the connection the file operates through.
    #[inline]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Number of buffered bytes: the object size in read mode, the bytes
    /// written so far in write mode.
    pub fn len(&self) -> usize {
        match &self.buffer {
            Buffer::Read { data, .. } => data.len(),
            Buffer::Write(buf) => buf.len(),
        }
    }

    /// Returns `true` if no bytes are buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once the file has been closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the whole content of the object.
    pub fn read_bytes(&self) -> Result<Bytes> {
        self.ensure_open()?;
        match &self.buffer {
            Buffer::Read { data, .. } => Ok(data.clone()),
            Buffer::Write(_) => Err(Error::NotReadable),
        }
    }

    /// Appends `data` to the write buffer. Nothing is sent until the file is
    /// closed.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_open()?;
        match &mut self.buffer {
            Buffer::Write(buf) => {
                buf.extend_from_slice(data);
                Ok(())
            }
            Buffer::Read { .. } => Err(Error::NotWritable),
        }
    }

    /// Closes the file.
    ///
    /// In write mode the buffered content is uploaded, replacing the object.
    /// The file is closed afterwards even if the upload fails. Closing an
    /// already closed file does nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        let result = if self.mode().is_write() {
            self.commit()
        } else {
            Ok(())
        };

        self.release();
        result
    }

    /// Closes the file without uploading anything.
    pub fn discard(mut self) {
        if !self.closed && self.mode().is_write() {
            tracing::debug!(
                target: TRACING_TARGET_FILE,
                url = %self.url,
                size = self.len(),
                "Write buffer discarded"
            );
        }
        self.release();
    }

    fn commit(&mut self) -> Result<()> {
        let Buffer::Write(buf) = &mut self.buffer else {
            return Err(Error::NotWritable);
        };
        let data = buf.split().freeze();
        let size = data.len();

        let bucket = self.connection.bucket(self.url.bucket())?;
        bucket.put_object(self.url.key(), data)?;

        tracing::info!(
            target: TRACING_TARGET_FILE,
            url = %self.url,
            size,
            "Object committed"
        );
        Ok(())
    }

    fn release(&mut self) {
        self.closed = true;
        self.buffer = match self.buffer {
            Buffer::Read { .. } => Buffer::Read {
                data: Bytes::new(),
                position: 0,
            },
            Buffer::Write(_) => Buffer::Write(BytesMut::new()),
        };
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }
}

impl io::Read for ObjectFile {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        self.ensure_open()?;
        match &mut self.buffer {
            Buffer::Read { data, position } => {
                let remaining = &data[(*position).min(data.len())..];
                let n = remaining.len().min(out.len());
                out[..n].copy_from_slice(&remaining[..n]);
                *position += n;
                Ok(n)
            }
            Buffer::Write(_) => Err(Error::NotReadable.into()),
        }
    }
}

impl io::Write for ObjectFile {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.write_bytes(data)?;
        Ok(data.len())
    }

    /// Whole-object semantics: flushing never uploads, only closing does.
    fn flush(&mut self) -> io::Result<()> {
        self.ensure_open()?;
        match self.buffer {
            Buffer::Write(_) => Ok(()),
            Buffer::Read { .. } => Err(Error::NotWritable.into()),
        }
    }
}

impl Drop for ObjectFile {
    fn drop(&mut self) {
        if self.closed || self.mode().is_read() {
            return;
        }

        if std::thread::panicking() {
            tracing::warn!(
                target: TRACING_TARGET_FILE,
                url = %self.url,
                size = self.len(),
                "Panic while writing, buffered content not committed"
            );
            return;
        }

        if let Err(err) = self.close() {
            tracing::error!(
                target: TRACING_TARGET_FILE,
                url = %self.url,
                error = %err,
                "Failed to commit object on drop"
            );
        }
    }
}

impl fmt::Debug for ObjectFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectFile")
            .field("url", &self.url)
            .field("mode", &self.mode())
            .field("len", &self.len())
            .field("closed", &self.closed)
            .finish()
    }
}
