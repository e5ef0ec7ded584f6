//! GT1Z decoding and verification.
//!
//! A single-pass state machine over the token stream.  Every read is bounds
//! checked and every structural violation surfaces as
//! [`Gt1zError::Corrupt`]; malformed input never panics.  Match copies run
//! in ascending order so overlapping source and destination behave as byte
//! replication (an offset of 1 repeats the byte before the write address).

use crate::codec::types::{decode_short_offset, minus, GT1Z_MAGIC};
use crate::displaylevel;
use crate::error::Gt1zError;
use crate::image::{Image, RAM_SIZE};
use crate::reader::ByteReader;

/// Decode a GT1Z stream into a sparse image.
///
/// Returns the image and the relocatable flag: true iff every segment
/// control after the initial address was the skip-to-next-page form.
pub fn decode(gt1z: &[u8]) -> Result<(Image, bool), Gt1zError> {
    let mut r = ByteReader::new(gt1z);
    if r.take(2)? != GT1Z_MAGIC {
        return Err(Gt1zError::Corrupt("missing gt1z magic number"));
    }
    let first = r.take(2)?;
    let mut addr = i32::from(first[0]) << 8 | i32::from(first[1]);
    let mut segaddr = addr;
    let mut prev_off = 1;
    let mut relocatable = true;
    let mut image = Image::new();
    displaylevel!(3, "gt1z: -- {:#06x}\n", addr);

    let entry = loop {
        let token = i32::from(r.byte()?);

        // Literals.
        let mut nlits = (token >> 4) & 7;
        if nlits == 7 {
            nlits = i32::from(r.byte()?);
            if nlits == 0 {
                nlits = 256;
            }
        }
        if nlits > 0 {
            let lits = r.take(nlits as usize)?;
            if addr as usize + lits.len() > RAM_SIZE {
                return Err(Gt1zError::Corrupt("literal run leaves the address space"));
            }
            for (i, &b) in lits.iter().enumerate() {
                image.poke(addr as usize + i, i16::from(b));
            }
            addr = (addr & 0xff00) + ((addr + nlits) & 0xff);
        }

        // Match count.
        let mut mcnt = token & 0xf;
        if mcnt == 15 {
            mcnt = i32::from(r.byte()?);
            if mcnt == 0 {
                mcnt = 256;
            }
        } else if mcnt != 0 {
            mcnt += 1;
        }

        // Match copy.
        if mcnt > 0 {
            if token & 0x80 != 0 {
                let b0 = r.byte()?;
                if b0 & 0x80 != 0 {
                    prev_off = decode_short_offset(b0, addr - segaddr);
                } else {
                    // Long form.  Offsets with bit 15 set are reserved; the
                    // input is untrusted, so reject rather than assume.
                    let b1 = r.byte()?;
                    let off = i32::from(b0) << 8 | i32::from(b1);
                    if off & 0x8000 != 0 {
                        return Err(Gt1zError::Corrupt("long-form offset has high bit set"));
                    }
                    prev_off = off;
                }
            }
            let madr = minus(addr, prev_off);
            if madr + mcnt - 1 > (madr | 0xff) {
                return Err(Gt1zError::Corrupt("match source crosses a page boundary"));
            }
            if addr as usize + mcnt as usize > RAM_SIZE {
                return Err(Gt1zError::Corrupt("match run leaves the address space"));
            }
            for k in 0..mcnt {
                let v = image.cell((madr + k) as usize);
                image.poke((addr + k) as usize, v);
            }
        }
        displaylevel!(
            3,
            "gt1z:   T={:02x} L{} {}{}:{:#06x}\n",
            token,
            nlits,
            if token & 0x80 != 0 { 'D' } else { 'M' },
            mcnt,
            minus(addr, prev_off)
        );
        addr = (addr & 0xff00) + ((addr + mcnt) & 0xff);

        // Segment control.
        if mcnt == 0 {
            if token & 0x80 != 0 {
                segaddr = (segaddr + 0x100) & 0xffff;
                addr = segaddr;
            } else {
                let field = r.take(2)?;
                if field[0] == 0 {
                    let lo = r.byte()?;
                    break u16::from(field[1]) << 8 | u16::from(lo);
                }
                segaddr = i32::from(field[0]) << 8 | i32::from(field[1]);
                addr = segaddr;
                relocatable = false;
            }
            displaylevel!(3, "gt1z: -- {:#06x}\n", addr);
        }
    };
    image.set_entry(entry);
    displaylevel!(3, "gt1z: -- EXEC {:#06x}\n", entry);
    if !r.is_empty() {
        displaylevel!(1, "gt1z: warning: excess bytes found at end of gt1z input\n");
    }
    Ok((image, relocatable))
}

/// Decompress a GT1Z stream back to GT1 bytes, with the relocatable flag.
pub fn decompress(gt1z: &[u8]) -> Result<(Vec<u8>, bool), Gt1zError> {
    let (image, relocatable) = decode(gt1z)?;
    Ok((image.to_gt1(), relocatable))
}

/// Decode `gt1z` and compare the result against the reference `gt1` image,
/// pointwise over all 65,536 cells and the entry point.
pub fn verify(gt1z: &[u8], gt1: &[u8]) -> Result<(), Gt1zError> {
    let (decoded, _) = decode(gt1z)?;
    let reference = Image::from_gt1(gt1, true)?;
    if decoded == reference {
        Ok(())
    } else {
        Err(Gt1zError::Mismatch)
    }
}
