//! In-memory game files

use gob_rs::gob_types::graphics::PALETTE_SIZE;

const NAME_LENGTH: usize = 13;

/// Writes 16-bit words in either byte order, padding byte fields and names
/// the way big-endian files do.
pub(crate) struct Writer {
	data: Vec<u8>,
	big_endian: bool,
}

impl Writer {
	pub(crate) fn little() -> Self {
		Self {
			data: Vec::new(),
			big_endian: false,
		}
	}

	pub(crate) fn big() -> Self {
		Self {
			data: Vec::new(),
			big_endian: true,
		}
	}

	pub(crate) fn word(mut self, value: i16) -> Self {
		let bytes = if self.big_endian {
			value.to_be_bytes()
		} else {
			value.to_le_bytes()
		};
		self.data.extend_from_slice(&bytes);
		self
	}

	pub(crate) fn bytes(mut self, bytes: &[u8]) -> Self {
		self.data.extend_from_slice(bytes);
		self
	}

	pub(crate) fn padded(mut self, bytes: &[u8]) -> Self {
		self.data.extend_from_slice(bytes);
		if self.big_endian {
			self.data.push(0);
		}
		self
	}

	pub(crate) fn name(self, name: &str) -> Self {
		let mut field = name.as_bytes().to_vec();
		field.resize(NAME_LENGTH, 0);
		self.padded(&field)
	}

	pub(crate) fn finish(self) -> Vec<u8> {
		self.data
	}
}

/// An RXY table, always little-endian.
pub(crate) fn rxy(parts: &[[u16; 4]]) -> Vec<u8> {
	let mut data = (parts.len() as u16).to_le_bytes().to_vec();
	for [left, right, top, bottom] in parts {
		for v in [left, right, top, bottom] {
			data.extend_from_slice(&v.to_le_bytes());
		}
	}
	data
}

/// A raw (uncompressed) sprite sheet.
pub(crate) fn raw_sprite(pixels: &[u8]) -> Vec<u8> {
	let mut data = vec![1, 2, 2];
	data.extend_from_slice(pixels);
	data
}

/// A version 4 IMD with optional frame index.
///
/// Entry 1 of the header palette is `[10, 20, 30]`.
pub(crate) fn imd(width: i16, height: i16, frames: &[Vec<u8>], with_index: bool) -> Vec<u8> {
	const FIRST_FRAME: usize = 792;

	let mut data = Vec::new();
	for v in [0, 4, frames.len() as i16, 0, 0, width, height, 0, FIRST_FRAME as i16] {
		data.extend_from_slice(&v.to_le_bytes());
	}

	let mut palette = vec![0u8; PALETTE_SIZE];
	palette[3..6].copy_from_slice(&[10, 20, 30]);
	data.extend_from_slice(&palette);
	data.extend_from_slice(&[0; 6]);

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

/// A frame filling `pixels` pixels with one color.
pub(crate) fn solid_frame(color: u8, pixels: usize) -> Vec<u8> {
	let mut frame = (pixels as u16 - 1).to_le_bytes().to_vec();
	frame.push(2);
	frame.extend(std::iter::repeat_n(color, pixels));
	frame
}

/// A palette chunk setting entry 1 to `rgb`, followed by `frame`.
pub(crate) fn palette_frame(rgb: [u8; 3], frame: Vec<u8>) -> Vec<u8> {
	let mut data = 0xFFF4u16.to_le_bytes().to_vec();
	data.extend_from_slice(&[0, 0]);
	let mut palette = vec![0u8; PALETTE_SIZE];
	palette[3..6].copy_from_slice(&rgb);
	data.extend_from_slice(&palette);
	data.extend(frame);
	data
}
