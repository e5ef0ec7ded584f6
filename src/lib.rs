//! gt1z — codec for the Gigatron GT1 program-image format.
//!
//! GT1 files are sparse memory loads: address-bounded records, each filling
//! part of one 256-byte page, plus a 16-bit execution entry point.  The
//! GT1Z container compresses such images with a match/literal token stream
//! whose offsets exploit the short distances typical within and between
//! pages, chosen by a per-segment optimal parser.  Decompression restores
//! every cell and the entry point exactly.

pub mod cli;
pub mod codec;
pub mod error;
pub mod image;
pub mod io;
mod reader;
pub mod tokenize;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level convenience re-exports for the most common API entry points.
// ─────────────────────────────────────────────────────────────────────────────

/// One-shot compression: GT1 bytes in, GT1Z bytes plus relocatable flag out.
pub use codec::compress::compress;
/// Compress an already-loaded [`Image`].
pub use codec::compress::compress_image;
/// Decode a GT1Z stream into an [`Image`].
pub use codec::decompress::decode;
/// One-shot decompression: GT1Z bytes in, GT1 bytes plus relocatable flag out.
pub use codec::decompress::decompress;
/// Decode a GT1Z stream and compare it against a reference GT1.
pub use codec::decompress::verify;
/// Error type shared by the loader and the codec.
pub use error::Gt1zError;
/// Sparse 64 KiB memory image with entry point.
pub use image::{Image, Segment};

// ─────────────────────────────────────────────────────────────────────────────
// Version API
// ─────────────────────────────────────────────────────────────────────────────

pub const GT1Z_VERSION_MAJOR: i32 = 1;
pub const GT1Z_VERSION_MINOR: i32 = 0;
pub const GT1Z_VERSION_RELEASE: i32 = 0;
pub const GT1Z_VERSION_STRING: &str = "1.0.0";

/// Returns the library version string (e.g. `"1.0.0"`).
pub fn version_string() -> &'static str {
    GT1Z_VERSION_STRING
}
