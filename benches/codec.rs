//! Criterion benchmarks for the GT1Z codec.
//!
//! Run with:
//!   cargo bench --bench codec
//!
//! Uses a synthetic multi-page program image mixing repeated runs, cross-page
//! echoes, and incompressible noise.

use criterion::{criterion_group, criterion_main, Criterion, Throughput};

/// Deterministic byte generator for reproducible inputs.
struct Lcg(u32);

impl Lcg {
    fn next_byte(&mut self) -> u8 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (self.0 >> 24) as u8
    }
}

/// Build a GT1 image of `pages` full pages starting at 0x0800.
fn synthetic_gt1(pages: usize) -> Vec<u8> {
    let mut rng = Lcg(0xbeef_cafe);
    let mut gt1 = Vec::new();
    let mut previous: Vec<u8> = Vec::new();
    for p in 0..pages {
        let addr = 0x0800 + p * 256;
        let body: Vec<u8> = if p % 3 == 2 && !previous.is_empty() {
            // Echo the previous page with a couple of changes.
            let mut b = previous.clone();
            b[17] ^= 0x55;
            b[190] ^= 0xaa;
            b
        } else if p % 3 == 1 {
            (0..256).map(|_| rng.next_byte()).collect()
        } else {
            let mut b = Vec::new();
            while b.len() < 256 {
                let v = rng.next_byte();
                let n = (rng.next_byte() as usize % 23 + 1).min(256 - b.len());
                b.extend(std::iter::repeat(v).take(n));
            }
            b
        };
        gt1.push((addr >> 8) as u8);
        gt1.push((addr & 0xff) as u8);
        gt1.push(0); // full page
        gt1.extend_from_slice(&body);
        previous = body;
    }
    gt1.extend_from_slice(&[0x00, 0x08, 0x00]);
    gt1
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("gt1z");

    for &pages in &[4usize, 16] {
        let gt1 = synthetic_gt1(pages);
        let (packed, _) = gt1z::compress(&gt1).unwrap();

        group.throughput(Throughput::Bytes(gt1.len() as u64));
        group.bench_function(format!("compress_{}p", pages), |b| {
            b.iter(|| gt1z::compress(&gt1).unwrap())
        });
        group.bench_function(format!("decompress_{}p", pages), |b| {
            b.iter(|| gt1z::decompress(&packed).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
