//! File-level operations consumed by the CLI.
//!
//! Each operation reads its whole input, runs the buffer-level codec, and
//! writes the result in one step, so a failed run never leaves a truncated
//! output file behind (a partially written file is removed).  All three
//! return the relocatable flag so the CLI can honor `-r`.

use std::fs;

use crate::codec::{compress, decode, decompress};
use crate::displaylevel;
use crate::error::Gt1zError;
use crate::image::Image;

fn write_whole_file(path: &str, bytes: &[u8]) -> Result<(), Gt1zError> {
    if let Err(e) = fs::write(path, bytes) {
        let _ = fs::remove_file(path);
        return Err(Gt1zError::Io(e));
    }
    Ok(())
}

/// Compress the GT1 file `input` into the GT1Z file `output`.
pub fn compress_file(input: &str, output: &str) -> Result<bool, Gt1zError> {
    displaylevel!(2, "gt1z: info: compress('{}','{}')\n", input, output);
    let data = fs::read(input)?;
    let (out, relocatable) = compress(&data)?;
    write_whole_file(output, &out)?;
    Ok(relocatable)
}

/// Decompress the GT1Z file `input` into the GT1 file `output`.
pub fn decompress_file(input: &str, output: &str) -> Result<bool, Gt1zError> {
    displaylevel!(2, "gt1z: info: decompress('{}','{}')\n", input, output);
    let data = fs::read(input)?;
    let (out, relocatable) = decompress(&data)?;
    write_whole_file(output, &out)?;
    Ok(relocatable)
}

/// Verify the GT1Z file `input` against the GT1 file `reference`.
///
/// Fails with [`Gt1zError::Mismatch`] when the decoded image differs from
/// the reference in any cell or in the entry point.
pub fn verify_file(input: &str, reference: &str) -> Result<bool, Gt1zError> {
    displaylevel!(2, "gt1z: info: verify('{}','{}')\n", input, reference);
    let gt1z = fs::read(input)?;
    let gt1 = fs::read(reference)?;
    let (decoded, relocatable) = decode(&gt1z)?;
    let reference_image = Image::from_gt1(&gt1, true)?;
    if decoded != reference_image {
        return Err(Gt1zError::Mismatch);
    }
    displaylevel!(2, "gt1z: info: decompressing '{}' matches '{}'\n", input, reference);
    Ok(relocatable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_gt1() -> Vec<u8> {
        let mut v = vec![0x02, 0x00, 0x08];
        v.extend_from_slice(&[0xaa; 8]);
        v.extend_from_slice(&[0x00, 0x02, 0x00]);
        v
    }

    #[test]
    fn compress_decompress_verify_through_files() {
        let dir = TempDir::new().unwrap();
        let gt1 = dir.path().join("prog.gt1");
        let gt1z = dir.path().join("prog.gt1z");
        let back = dir.path().join("back.gt1");
        fs::write(&gt1, sample_gt1()).unwrap();

        let relocatable =
            compress_file(gt1.to_str().unwrap(), gt1z.to_str().unwrap()).unwrap();
        assert!(relocatable);

        decompress_file(gt1z.to_str().unwrap(), back.to_str().unwrap()).unwrap();
        assert_eq!(fs::read(&back).unwrap(), sample_gt1());

        verify_file(gt1z.to_str().unwrap(), gt1.to_str().unwrap()).unwrap();
    }

    #[test]
    fn verify_detects_a_mismatch() {
        let dir = TempDir::new().unwrap();
        let gt1 = dir.path().join("prog.gt1");
        let gt1z = dir.path().join("prog.gt1z");
        let other = dir.path().join("other.gt1");
        fs::write(&gt1, sample_gt1()).unwrap();
        let mut changed = sample_gt1();
        changed[3] ^= 1;
        fs::write(&other, changed).unwrap();

        compress_file(gt1.to_str().unwrap(), gt1z.to_str().unwrap()).unwrap();
        assert!(matches!(
            verify_file(gt1z.to_str().unwrap(), other.to_str().unwrap()),
            Err(Gt1zError::Mismatch)
        ));
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.gt1");
        let out = dir.path().join("out.gt1z");
        assert!(matches!(
            compress_file(missing.to_str().unwrap(), out.to_str().unwrap()),
            Err(Gt1zError::Io(_))
        ));
    }
}
