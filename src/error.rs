//! Error type shared by the GT1 loader and the GT1Z codec.

use std::fmt;
use std::io;

/// Errors produced while reading, writing, or verifying GT1/GT1Z data.
///
/// Corruption and I/O errors are fatal at the point of detection: the
/// operation that raised them aborts and any partial output is invalid.
#[derive(Debug)]
pub enum Gt1zError {
    /// Malformed GT1 or GT1Z input.  The payload names the violated
    /// constraint (e.g. a record overrunning its page, a truncated token
    /// stream, a match source crossing a page boundary).
    Corrupt(&'static str),
    /// Underlying read or write failure.
    Io(io::Error),
    /// A decoded image differs from its reference (verify mode only).
    Mismatch,
}

impl fmt::Display for Gt1zError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gt1zError::Corrupt(what) => write!(f, "corrupted data: {}", what),
            Gt1zError::Io(e) => write!(f, "{}", e),
            Gt1zError::Mismatch => write!(f, "decompressed image does not match reference"),
        }
    }
}

impl std::error::Error for Gt1zError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Gt1zError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Gt1zError {
    fn from(e: io::Error) -> Self {
        Gt1zError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_display_names_the_constraint() {
        let e = Gt1zError::Corrupt("record overruns its page");
        assert_eq!(e.to_string(), "corrupted data: record overruns its page");
    }

    #[test]
    fn io_error_converts_and_chains() {
        let e: Gt1zError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(e, Gt1zError::Io(_)));
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn mismatch_display() {
        assert_eq!(
            Gt1zError::Mismatch.to_string(),
            "decompressed image does not match reference"
        );
    }
}
