pub mod document;
pub mod hash;

pub use document::{DocumentError, ParsedDocument, RawFragment, Vertex};
pub use hash::{sha256_bytes, to_hex};
