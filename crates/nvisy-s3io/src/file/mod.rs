//! File-like access to remote objects.

mod object_file;
mod options;

pub use object_file::ObjectFile;
pub use options::OpenOptions;
