// e2e/roundtrip.rs — buffer-level format fixtures and round-trip suites.
//
// Exercises the public codec API end to end: exact byte streams for small
// canonical inputs, the container edge cases (extended counts, page skips,
// absolute segment controls, ROMv1 stripping), and round-trip identity over
// synthetic program images.

use gt1z::{compress, decompress, verify, Gt1zError, Image};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Assemble a GT1 byte stream from records and an entry point.
fn gt1(records: &[(u16, Vec<u8>)], entry: u16) -> Vec<u8> {
    let mut v = Vec::new();
    for (addr, payload) in records {
        assert!(!payload.is_empty() && payload.len() <= 256);
        v.push((addr >> 8) as u8);
        v.push((addr & 0xff) as u8);
        v.push((payload.len() & 0xff) as u8);
        v.extend_from_slice(payload);
    }
    v.extend_from_slice(&[0, (entry >> 8) as u8, (entry & 0xff) as u8]);
    v
}

fn round_trip(input: &[u8]) -> Vec<u8> {
    let (packed, _) = compress(input).unwrap();
    let (unpacked, _) = decompress(&packed).unwrap();
    unpacked
}

/// Deterministic pseudo-random byte generator (no external seed).
struct Lcg(u32);

impl Lcg {
    fn next_byte(&mut self) -> u8 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (self.0 >> 24) as u8
    }
}

// ── 1. Single data byte ──────────────────────────────────────────────────────

#[test]
fn single_byte_image_has_a_canonical_stream() {
    let input = gt1(&[(0x0200, vec![0x42])], 0x0200);
    let (packed, relocatable) = compress(&input).unwrap();
    // The lone literal rides in the terminator control token.
    assert_eq!(
        packed,
        vec![0x00, 0xff, 0x02, 0x00, 0x10, 0x42, 0x00, 0x02, 0x00]
    );
    assert!(relocatable);
    assert_eq!(round_trip(&input), input);
}

// ── 2. Repeated byte ─────────────────────────────────────────────────────────

#[test]
fn repeated_byte_uses_offset_one_match() {
    let input = gt1(&[(0x0200, vec![0xaa; 8])], 0x0200);
    let (packed, _) = compress(&input).unwrap();
    // One literal 0xAA, then a match of 7 reusing the initial offset 1.
    assert_eq!(
        packed,
        vec![0x00, 0xff, 0x02, 0x00, 0x16, 0xaa, 0x00, 0x00, 0x02, 0x00]
    );
    assert_eq!(round_trip(&input), input);
}

// ── 3. Two sequential pages ──────────────────────────────────────────────────

#[test]
fn sequential_pages_stay_relocatable() {
    let page: Vec<u8> = (0..=255).collect();
    let input = gt1(&[(0x0200, page.clone()), (0x0300, page.clone())], 0x0200);
    let (packed, relocatable) = compress(&input).unwrap();
    assert!(relocatable);
    // First page as one extended literal run flushed by the skip control,
    // second page as one 256-byte match at offset 0x100 (short form).
    let mut expected = vec![0x00, 0xff, 0x02, 0x00, 0xf0, 0x00];
    expected.extend_from_slice(&page);
    expected.extend_from_slice(&[0x8f, 0x00, 0xff, 0x00, 0x00, 0x02, 0x00]);
    assert_eq!(packed, expected);
    assert_eq!(round_trip(&input), input);
}

// ── 4. Non-contiguous pages ──────────────────────────────────────────────────

#[test]
fn gap_between_pages_clears_relocatable() {
    let body: Vec<u8> = (1..=8).collect();
    let input = gt1(&[(0x0200, body.clone()), (0x0500, body.clone())], 0x0200);
    let (packed, relocatable) = compress(&input).unwrap();
    assert!(!relocatable);
    // The long-form control between the segments carries the absolute
    // address 0x0500; the second body is a match three pages back.
    let mut expected = vec![0x00, 0xff, 0x02, 0x00, 0x70, 0x08];
    expected.extend_from_slice(&body);
    expected.extend_from_slice(&[0x05, 0x00, 0x87, 0x03, 0x00, 0x00, 0x00, 0x02, 0x00]);
    assert_eq!(packed, expected);
    assert_eq!(round_trip(&input), input);
}

// ── 5. Extended literal count ────────────────────────────────────────────────

#[test]
fn distinct_bytes_force_an_extended_literal_token() {
    let body: Vec<u8> = (0..32).collect();
    let input = gt1(&[(0x0200, body.clone())], 0x0200);
    let (packed, _) = compress(&input).unwrap();
    let mut expected = vec![0x00, 0xff, 0x02, 0x00, 0x70, 0x20];
    expected.extend_from_slice(&body);
    expected.extend_from_slice(&[0x00, 0x02, 0x00]);
    assert_eq!(packed, expected);
    assert_eq!(round_trip(&input), input);
}

// ── 6. ROMv1 loader patch ────────────────────────────────────────────────────

#[test]
fn romv1_patch_is_stripped_before_compression() {
    let input = gt1(
        &[
            (0x0200, vec![0x42]),
            (0x5b80, vec![0x11, 0x00, 0x02, 0x2b, 0x1a, 0xff]),
        ],
        0x5b80,
    );
    let image = Image::from_gt1(&input, true).unwrap();
    assert_eq!(image.entry(), 0x0200);
    for a in 0x5b80..0x5b86 {
        assert_eq!(image.get(a), None);
    }

    // The compressed stream carries neither the patch nor its entry point.
    let (packed, _) = compress(&input).unwrap();
    let (unpacked, _) = decompress(&packed).unwrap();
    let stripped = gt1(&[(0x0200, vec![0x42])], 0x0200);
    assert_eq!(unpacked, stripped);
}

// ── Universal properties ─────────────────────────────────────────────────────

#[test]
fn round_trip_over_synthetic_programs() {
    // A few texture classes: compressible repeats, cross-page echoes, noise.
    let mut rng = Lcg(0x1234_5678);

    // Page of decaying runs.
    let mut runs = Vec::new();
    while runs.len() < 256 {
        let b = rng.next_byte();
        let n = (rng.next_byte() as usize % 19 + 1).min(256 - runs.len());
        runs.extend(std::iter::repeat(b).take(n));
    }
    // Echo of the same page two pages up, slightly damaged.
    let mut echo = runs.clone();
    echo[40] ^= 0xff;
    echo[200] ^= 0x0f;

    // Records in ascending address order, as a saved GT1 enumerates them.
    let records: Vec<(u16, Vec<u8>)> = vec![
        (0x0455, vec![7]),
        (0x04fe, vec![1, 2]),
        (0x0800, runs),
        (0x0a00, echo),
        (0x30a0, (0..96).map(|_| rng.next_byte()).collect()),
    ];

    let input = gt1(&records, 0x0800);
    let (packed, _) = compress(&input).unwrap();
    assert!(packed.len() < input.len());
    let (unpacked, _) = decompress(&packed).unwrap();
    assert_eq!(unpacked, input);
    verify(&packed, &input).unwrap();
}

#[test]
fn verify_rejects_a_stream_for_a_different_image() {
    let a = gt1(&[(0x0200, vec![1, 2, 3, 4])], 0x0200);
    let b = gt1(&[(0x0200, vec![1, 2, 3, 5])], 0x0200);
    let (packed, _) = compress(&a).unwrap();
    verify(&packed, &a).unwrap();
    assert!(matches!(verify(&packed, &b), Err(Gt1zError::Mismatch)));
}

#[test]
fn gt1_save_is_idempotent_for_maximal_segments() {
    let input = gt1(
        &[
            (0x0200, (0..=255).collect()),
            (0x0480, vec![9; 16]),
            (0x0500, vec![1]),
        ],
        0x0200,
    );
    let image = Image::from_gt1(&input, true).unwrap();
    assert_eq!(image.to_gt1(), input);
}

#[test]
fn relocatable_single_page_zero_segment() {
    // The canonical relocatable shape: one segment at address 0.
    let input = gt1(&[(0x0000, vec![0x55; 64])], 0x0000);
    let (packed, relocatable) = compress(&input).unwrap();
    assert!(relocatable);
    assert_eq!(round_trip(&input), input);
    // The stream's initial address is 0x0000.
    assert_eq!(&packed[2..4], &[0x00, 0x00]);
}

#[test]
fn entry_point_survives_all_values() {
    for &entry in &[0x0000u16, 0x0200, 0x7fff, 0xffff] {
        let input = gt1(&[(0x0300, vec![0x10, 0x20, 0x30])], entry);
        let (packed, _) = compress(&input).unwrap();
        let (unpacked, _) = decompress(&packed).unwrap();
        assert_eq!(unpacked, input, "entry {:#06x}", entry);
    }
}
