//! Benchmark suite for sprite and frame decoding
//!
//! Measures the LZ77 decompressor and the packed RLE sprite decoder, the two
//! hot paths of video playback and animation drawing.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gob_benches::{generate_literal_stream, generate_packed_sprite, generate_repeating_stream};
use gob_types::{
	codec::{decompress, lz77::decompressed_size},
	graphics::{Surface, draw_packed_sprite},
};
use std::hint::black_box;

/// Benchmark LZ77 decompression of frame-sized streams
fn bench_lz77(c: &mut Criterion) {
	let mut group = c.benchmark_group("lz77_decompress");

	for size in [4_000usize, 64_000] {
		let streams = [("literals", generate_literal_stream(size)), ("matches", generate_repeating_stream(size))];

		for (name, data) in streams {
			let Ok(real_size) = decompressed_size(&data) else {
				continue;
			};
			let mut dest = vec![0u8; real_size];

			group.throughput(Throughput::Bytes(real_size as u64));
			group.bench_with_input(BenchmarkId::new(name, size), &data, |b, data| {
				b.iter(|| {
					let result = decompress(black_box(data), &mut dest);
					black_box(result)
				});
			});
		}
	}

	group.finish();
}

/// Benchmark packed sprite drawing with short and long runs
fn bench_packed_sprite(c: &mut Criterion) {
	let mut group = c.benchmark_group("packed_sprite");
	let (width, height) = (320u16, 200u16);

	for bands in [2u16, 40, 320] {
		let data = generate_packed_sprite(width, height, bands);
		let mut dest = Surface::indexed(width, height);

		group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
		group.bench_with_input(BenchmarkId::new("draw", bands), &data, |b, data| {
			b.iter(|| {
				draw_packed_sprite(black_box(data), width, height, 0, 0, true, &mut dest);
				black_box(dest.pixels()[0])
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_lz77, bench_packed_sprite);
criterion_main!(benches);
