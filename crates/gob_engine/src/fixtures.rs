//! In-memory IMD videos for unit tests

use gob_types::graphics::PALETTE_SIZE;

/// Offset of the first frame in [`imd`] output
const FIRST_FRAME: usize = 792;

/// Builds a version 4 IMD of `width`×`height` at `(x, y)`.
///
/// Entry 1 of the header palette is `[10, 20, 30]`.
pub fn imd(x: i16, y: i16, width: i16, height: i16, frames: &[Vec<u8>], with_index: bool) -> Vec<u8> {
	let mut data = Vec::new();
	for v in [0, 4, frames.len() as i16, x, y, width, height, 0, FIRST_FRAME as i16] {
		data.extend_from_slice(&v.to_le_bytes());
	}

	let mut palette = vec![0u8; PALETTE_SIZE];
	palette[3..6].copy_from_slice(&[10, 20, 30]);
	data.extend_from_slice(&palette);

	data.extend_from_slice(&0u16.to_le_bytes());
	data.extend_from_slice(&[0; 4]);

	let mut positions = Vec::new();
	for frame in frames {
		positions.push(data.len() as u32);
		data.extend_from_slice(frame);
	}

	if with_index {
		let offset = data.len() as u32;
		for pos in positions {
			data.extend_from_slice(&pos.to_le_bytes());
		}
		data[788..792].copy_from_slice(&offset.to_le_bytes());
	}

	data
}

/// A frame filling the whole video with one color
pub fn solid(color: u8, pixels: usize) -> Vec<u8> {
	let mut frame = (pixels as u16 - 1).to_le_bytes().to_vec();
	frame.push(2);
	frame.extend(std::iter::repeat_n(color, pixels));
	frame
}

/// A palette chunk with entry 1 set to `rgb`, followed by `frame`
pub fn with_palette(rgb: [u8; 3], frame: Vec<u8>) -> Vec<u8> {
	let mut data = 0xFFF4u16.to_le_bytes().to_vec();
	data.extend_from_slice(&[0, 0]);
	let mut palette = vec![0u8; PALETTE_SIZE];
	palette[3..6].copy_from_slice(&rgb);
	data.extend_from_slice(&palette);
	data.extend(frame);
	data
}
