//! Buffer-level GT1 → GT1Z compression.

use crate::codec::chart::Chart;
use crate::codec::emit::Emitter;
use crate::codec::types::minus;
use crate::error::Gt1zError;
use crate::image::Image;
use crate::tokenize::SeqIndex;

/// Compress a GT1 byte stream into a GT1Z stream.
///
/// Returns the compressed bytes and the relocatable flag (true iff every
/// segment transition in the stream is an advance-by-one-page control).
/// A ROMv1 loader patch in the input is stripped before compression.
pub fn compress(gt1: &[u8]) -> Result<(Vec<u8>, bool), Gt1zError> {
    let image = Image::from_gt1(gt1, true)?;
    Ok(compress_image(&image))
}

/// Compress an already-loaded image.
///
/// Runs the optimal parser over each segment in address order, threading the
/// emitter's previous-offset state through so a segment can open with a free
/// offset reuse.
pub fn compress_image(image: &Image) -> (Vec<u8>, bool) {
    let segments = image.segments();
    let index = SeqIndex::build(image, &segments, 2); // catalog 2-byte sequences
    let mut out = Emitter::new();
    for segment in &segments {
        let addr = segment.addr as i32;
        let len = segment.len as i32;
        let mut chart = Chart::new(image, addr, len, out.prev_off());
        out.segment(addr);
        for i in 0..segment.len {
            chart.add_literal(i);
            let mut madr = index.nextpos[segment.addr + i];
            while madr >= 0 {
                // Earlier occurrence of the same 2-byte sequence; stop once
                // the page delta leaves the representable range.
                let off = minus(addr + i as i32, madr);
                if off & 0x8000 != 0 {
                    break;
                }
                chart.add_match(i, off);
                madr = index.nextpos[madr as usize];
            }
        }
        out.predict(chart.cost_to_end());
        chart.emit(&mut out);
    }
    out.finish(image.entry())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decompress::decode;

    fn gt1(records: &[(u16, &[u8])], entry: u16) -> Vec<u8> {
        let mut v = Vec::new();
        for &(addr, payload) in records {
            v.push((addr >> 8) as u8);
            v.push((addr & 0xff) as u8);
            v.push((payload.len() & 0xff) as u8);
            v.extend_from_slice(payload);
        }
        v.extend_from_slice(&[0, (entry >> 8) as u8, (entry & 0xff) as u8]);
        v
    }

    #[test]
    fn single_cell_compresses_to_the_minimal_stream() {
        let input = gt1(&[(0x0200, &[0x42])], 0x0200);
        let (out, relocatable) = compress(&input).unwrap();
        assert_eq!(out, vec![0x00, 0xff, 0x02, 0x00, 0x10, 0x42, 0x00, 0x02, 0x00]);
        assert!(relocatable);
    }

    #[test]
    fn repeated_bytes_become_one_literal_plus_match() {
        let input = gt1(&[(0x0200, &[0xaa; 8])], 0x0200);
        let (out, _) = compress(&input).unwrap();
        assert_eq!(
            out,
            vec![0x00, 0xff, 0x02, 0x00, 0x16, 0xaa, 0x00, 0x00, 0x02, 0x00]
        );
    }

    #[test]
    fn compressed_never_much_larger_and_decodes_back() {
        // Incompressible data: cost is bounded by literal overhead.
        let payload: Vec<u8> = (0..=255).collect();
        let input = gt1(&[(0x0800, &payload)], 0x0800);
        let (out, _) = compress(&input).unwrap();
        assert!(out.len() <= payload.len() + 16);
        let (image, _) = decode(&out).unwrap();
        assert_eq!(image.to_gt1(), input);
    }

    #[test]
    fn offset_state_threads_across_segments() {
        // Both segments repeat one byte: the second match reuses offset 1
        // without re-encoding it, so the two segment bodies cost the same.
        let input = gt1(&[(0x0200, &[0x11; 16]), (0x0300, &[0x22; 16])], 0x0200);
        let (out, relocatable) = compress(&input).unwrap();
        assert!(relocatable);
        assert_eq!(
            out,
            vec![
                0x00, 0xff, 0x02, 0x00, // magic, first segment
                0x1e, 0x11, // literal 0x11, match 15 at offset 1 (initial)
                0x80, // skip to next page
                0x1e, 0x22, // literal 0x22, match 15 at offset 1 (reused)
                0x00, 0x00, 0x02, 0x00, // terminator, entry 0x0200
            ]
        );
    }
}
