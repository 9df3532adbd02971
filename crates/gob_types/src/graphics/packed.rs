//! 4-bit run-length packed sprites.
//!
//! ## Encoding
//!
//! Each run starts with one byte:
//!
//! | Bits | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 7-4  | pixel value (`0..=15`)                               |
//! | 3    | short run flag                                       |
//! | 2-0  | run length minus one (high bits if bit 3 is clear)   |
//!
//! If bit 3 is clear, a second byte holds the low 8 bits of the run length,
//! giving runs of up to 2048 pixels. Runs continue across rows; the decoder
//! wraps to the next row of the target rectangle when a row is full and stops
//! once the last row is done.

use super::surface::Surface;

/// Longest run a single code can express.
pub const MAX_RUN: usize = 0x800;

/// Decodes a packed sprite of `width`×`height` pixels into `dest` at `(x, y)`.
///
/// Pixels outside `dest` are skipped, as are zero pixels when `transparent`
/// is set. Running out of input ends the decode early without error.
#[allow(clippy::too_many_arguments)]
pub fn draw_packed_sprite(
	data: &[u8],
	width: u16,
	height: u16,
	x: i16,
	y: i16,
	transparent: bool,
	dest: &mut Surface,
) {
	if width == 0 || height == 0 {
		return;
	}

	let dest_right = i32::from(x) + i32::from(width);
	let dest_bottom = i32::from(y) + i32::from(height);
	let (mut cur_x, mut cur_y) = (i32::from(x), i32::from(y));
	let mut src = data.iter().copied();

	while let Some(code) = src.next() {
		let mut repeat = usize::from(code & 7);
		let value = code & 0xF8;
		if value & 8 == 0 {
			let Some(low) = src.next() else {
				return;
			};
			repeat = (repeat << 8) | usize::from(low);
		}
		repeat += 1;
		let value = value >> 4;

		for _ in 0..repeat {
			if !transparent || value != 0 {
				dest.put_pixel(cur_x as i16, cur_y as i16, u32::from(value));
			}
			cur_x += 1;
			if cur_x == dest_right {
				cur_x = i32::from(x);
				cur_y += 1;
				if cur_y == dest_bottom {
					return;
				}
			}
		}
	}
}

/// Encodes 4-bit pixels into the packed run-length format.
///
/// Only the low nibble of each pixel is kept. Runs of up to eight pixels use
/// the one-byte form, longer ones the two-byte form.
pub fn encode_packed_sprite(pixels: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(pixels.len() / 2);
	let mut i = 0;

	while i < pixels.len() {
		let value = pixels[i] & 0x0F;
		let run = pixels[i..]
			.iter()
			.take(MAX_RUN)
			.take_while(|&&p| p & 0x0F == value)
			.count();

		let repeat = run - 1;
		if repeat < 8 {
			out.push((value << 4) | 0x08 | repeat as u8);
		} else {
			out.push((value << 4) | ((repeat >> 8) & 7) as u8);
			out.push((repeat & 0xFF) as u8);
		}
		i += run;
	}

	out
}
