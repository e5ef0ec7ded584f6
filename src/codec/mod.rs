//! The GT1Z codec: optimal-parsing compressor, token emitter, and the
//! streaming decoder.

pub mod chart;
pub mod compress;
pub mod decompress;
pub mod emit;
pub mod types;

pub use compress::{compress, compress_image};
pub use decompress::{decode, decompress, verify};
pub use types::GT1Z_MAGIC;
