pub mod error;
pub mod hash;
pub mod inspect;
pub mod preview;
pub mod render;
pub mod repair;
pub mod types;

pub use error::{EditError, ParseError, StorageCorrupt};
pub use hash::{digest, Digest};
pub use render::{compress, format, process, Mode};
pub use repair::parse;
pub use types::*;
