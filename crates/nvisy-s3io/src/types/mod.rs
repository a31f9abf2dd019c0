//! Object addressing and open mode types.

mod mode;
mod url;

pub use mode::OpenMode;
pub use url::{ObjectUrl, SCHEME};
