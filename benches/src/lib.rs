//! Benchmark helper utilities for gob-rs
//!
//! Generates synthetic LZ77 streams and packed sprites so the decoders can be
//! measured without shipping game data.

use gob_types::graphics::encode_packed_sprite;

/// Window position the first classic-mode literal lands on.
const CLASSIC_START: u16 = 4078;

/// Generates a classic-mode LZ77 stream of literals only.
///
/// This is the worst case for the decoder: one control byte per eight output bytes.
pub fn generate_literal_stream(size: usize) -> Vec<u8> {
	let mut data = (size as u32).to_le_bytes().to_vec();

	for (i, chunk) in (0..size).collect::<Vec<_>>().chunks(8).enumerate() {
		// Control byte, one set bit per literal
		data.push(((1u16 << chunk.len()) - 1) as u8);
		for &n in chunk {
			data.push(((n * 31 + i) & 0xFF) as u8);
		}
	}

	data
}

/// Generates a classic-mode LZ77 stream repeating an 8-byte pattern.
///
/// After the first eight literals every token is an 8-byte match back to the
/// start of the window, so `size` is rounded up to a multiple of 64.
pub fn generate_repeating_stream(size: usize) -> Vec<u8> {
	let groups = size.div_ceil(64).max(1);
	let real_size = 8 + groups * 64;
	let mut data = (real_size as u32).to_le_bytes().to_vec();

	data.push(0xFF);
	data.extend_from_slice(b"GOBSPRIT");

	let low = (CLASSIC_START & 0xFF) as u8;
	let high = ((CLASSIC_START >> 4) & 0xF0) as u8 | (8 - 3);
	for _ in 0..groups {
		data.push(0x00);
		for _ in 0..8 {
			data.extend_from_slice(&[low, high]);
		}
	}

	data
}

/// Generates a packed sprite of horizontal color bands.
///
/// Each row is split into `bands` runs, so a higher count means shorter runs.
pub fn generate_packed_sprite(width: u16, height: u16, bands: u16) -> Vec<u8> {
	let band_width = (width / bands.max(1)).max(1);
	let pixels: Vec<u8> = (0..height)
		.flat_map(|y| (0..width).map(move |x| ((x / band_width + y) % 16) as u8))
		.collect();
	encode_packed_sprite(&pixels)
}

#[cfg(test)]
mod tests {
	use super::*;
	use gob_types::codec::{decompress, lz77::decompressed_size};

	#[test]
	fn test_literal_stream_decodes() {
		let data = generate_literal_stream(100);
		let mut dest = vec![0u8; 100];
		assert_eq!(decompress(&data, &mut dest).unwrap(), 100);
		assert_eq!(dest[0], 0);
		assert_eq!(dest[1], 31);
	}

	#[test]
	fn test_repeating_stream_decodes() {
		let data = generate_repeating_stream(128);
		let size = decompressed_size(&data).unwrap();
		assert_eq!(size, 136);

		let mut dest = vec![0u8; size];
		decompress(&data, &mut dest).unwrap();
		assert!(dest.chunks(8).all(|c| c == b"GOBSPRIT"));
	}
}
