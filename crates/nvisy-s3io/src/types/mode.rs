//! Open mode for object files.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether an object file is opened for reading or writing.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    /// Fetch the whole object on open.
    #[default]
    #[display("read")]
    Read,
    /// Buffer writes and upload the whole object on close.
    #[display("write")]
    Write,
}

impl OpenMode {
    /// Returns `true` for [`OpenMode::Read`].
    #[inline]
    pub fn is_read(self) -> bool {
        matches!(self, Self::Read)
    }

    /// Returns `true` for [`OpenMode::Write`].
    #[inline]
    pub fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl FromStr for OpenMode {
    type Err = Error;

    /// Accepts `r`, `rb`, `read`, `w`, `wb` and `write`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" | "rb" | "read" => Ok(Self::Read),
            "w" | "wb" | "write" => Ok(Self::Write),
            other => Err(Error::InvalidMode(other.to_owned())),
        }
    }
}
