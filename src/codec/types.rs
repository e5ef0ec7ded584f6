//! Token-format primitives shared by the emitter, the chart cost model, and
//! the decoder.
//!
//! A GT1Z token starts with a header byte `DLLLMMMM`: `D` set means an
//! explicit offset follows the literals, `LLL` is the literal count (7 =
//! extended count byte, where 0 encodes 256), and `MMMM` is the match count
//! minus one (15 = extended count byte, 0 = no match, i.e. a segment
//! control).  Offsets are encoded in one byte (short form) when the segment
//! position permits, otherwise two.

/// Magic bytes opening every GT1Z stream.
pub const GT1Z_MAGIC: [u8; 2] = [0x00, 0xff];

/// Subtract two 16-bit values byte-wise, without borrow between the bytes.
///
/// Offsets are a composite of a byte-position delta within a page (low byte)
/// and a page-count delta (high byte); the two halves subtract independently,
/// so an offset of 1 applied at a page start wraps to the end of the same
/// page rather than into the previous one.  Bit 15 of the result flags a
/// page-count delta of 0x80 or more, which no offset encoding can represent.
#[inline]
pub fn minus(addr: i32, offset: i32) -> i32 {
    ((addr - offset) & 0xff) + (((addr & 0xff00) - (offset & 0xff00)) & 0xff00)
}

/// Encode `offset` in short (single-byte) form, if the form is available.
///
/// `t` is the write position within the segment (`addr - segaddr`) at the
/// point the offset byte is decoded, i.e. after the token's literals.  The
/// short form covers offsets 1..t within the current page (high byte 0) and
/// a band of offsets reaching exactly one page back (high byte 1); the two
/// ranges share the 7 payload bits without overlap because the decoder
/// splits them at `t`.
#[inline]
pub fn encode_short_offset(offset: i32, t: i32) -> Option<u8> {
    let ohi = (offset >> 8) & 0xff;
    let olo = (offset - 1) & 0xff;
    let t = t.min(0x7f);
    if (ohi == 0 && olo < t) || (ohi == 1 && olo >= (t | 0x80)) {
        Some((olo | 0x80) as u8)
    } else {
        None
    }
}

/// Decode a short-form offset byte (`raw` has bit 7 set).
///
/// `t` is the same segment position the encoder used.  Inverse of
/// [`encode_short_offset`] for every byte that function produces.
#[inline]
pub fn decode_short_offset(raw: u8, t: i32) -> i32 {
    let threshold = if t <= 0x7f { t | 0x80 } else { 0xff };
    let raw = i32::from(raw);
    if raw < threshold {
        (raw + 1) & 0x7f
    } else {
        256 + ((raw + 1) & 0xff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minus_subtracts_bytes_independently() {
        assert_eq!(minus(0x0205, 1), 0x0204);
        // Low byte wraps within the page; the high byte is untouched.
        assert_eq!(minus(0x0200, 1), 0x02ff);
        // Page delta lives in the high byte only.
        assert_eq!(minus(0x0300, 0x100), 0x0200);
        assert_eq!(minus(0x0310, 0x0220), 0x01f0);
    }

    #[test]
    fn minus_flags_unrepresentable_page_deltas() {
        // 0x80 pages apart sets bit 15.
        assert_eq!(minus(0x0000, 0x8000) & 0x8000, 0x8000);
        assert_eq!(minus(0x8100, 0x0100) & 0x8000, 0);
    }

    #[test]
    fn offset_walk_recovers_the_candidate_address() {
        // The compressor derives off = minus(addr, madr) and the decoder
        // computes madr = minus(addr, off); the pair must round-trip.
        for &(addr, madr) in &[(0x0310, 0x0208), (0x0200, 0x01ff), (0x0480, 0x0480 - 5)] {
            let off = minus(addr, madr);
            assert_eq!(minus(addr, off), madr);
        }
    }

    #[test]
    fn short_form_round_trips_for_every_encodable_pair() {
        for t in 0..=0x1ff {
            for offset in 1..=0x1ff {
                if let Some(raw) = encode_short_offset(offset, t) {
                    assert!(raw & 0x80 != 0);
                    assert_eq!(
                        decode_short_offset(raw, t),
                        offset,
                        "offset {:#x} at t {:#x}",
                        offset,
                        t
                    );
                }
            }
        }
    }

    #[test]
    fn short_form_availability_matches_the_band_structure() {
        // At t = 0 nothing in the current page is reachable, but the top of
        // the previous-page band is.
        assert_eq!(encode_short_offset(1, 0), None);
        assert_eq!(encode_short_offset(0x100, 0), Some(0xff));
        // Mid-segment: offsets up to t are short, t + 1 is not.
        assert!(encode_short_offset(0x21, 0x21).is_some());
        assert_eq!(encode_short_offset(0x22, 0x21), None);
        // Two pages back is never short.
        assert_eq!(encode_short_offset(0x210, 0x7f), None);
    }
}
