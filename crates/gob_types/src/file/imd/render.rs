//! Frame payload renderers.
//!
//! The first payload byte selects the renderer:
//!
//! | Type                    | Rendering                                         |
//! |-------------------------|---------------------------------------------------|
//! | `0x10` bit              | 49-byte palette block (start index + 16 colors)   |
//! | `0x80` bit              | LZ77-compressed, decompressed before rendering    |
//! | `2`                     | whole block, one byte per pixel                   |
//! | `1`                     | sparse block of literal and skip runs             |
//! | `0x42`                  | quarter width, each byte covers 4 pixels          |
//! | `(type & 0x0F) == 2`    | half height, each row drawn twice                 |
//! | anything else           | sparse half height                                |
//!
//! Sparse runs: a byte with bit 7 set is followed by `(b & 0x7F) + 1`
//! literal pixels, any other byte skips `b + 1` pixels.

use crate::codec::lz77;
use crate::graphics::{Palette, Surface};

use crate::file::{FileType, GobFileError};

use super::Area;

const PALETTE_BLOCK: usize = 49;

struct Source<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> Source<'a> {
	fn take(&mut self, count: usize) -> Result<&'a [u8], GobFileError> {
		let bytes = self.data.get(self.pos..self.pos + count).ok_or(GobFileError::UnexpectedEof {
			file_type: FileType::Imd,
			offset: self.pos,
			context: "frame data",
		})?;
		self.pos += count;
		Ok(bytes)
	}

	fn byte(&mut self) -> Result<u8, GobFileError> {
		Ok(self.take(1)?[0])
	}
}

/// The clipped frame area within a surface.
struct Target<'a> {
	pixels: &'a mut [u8],
	pitch: usize,
	left: usize,
	top: usize,
	width: usize,
	height: usize,
}

impl Target<'_> {
	fn offset(&self, row: usize, col: usize) -> usize {
		(self.top + row) * self.pitch + self.left + col
	}

	fn write(&mut self, row: usize, col: usize, src: &[u8]) {
		if row >= self.height || col >= self.width {
			return;
		}
		let count = src.len().min(self.width - col);
		let start = self.offset(row, col);
		if let Some(dest) = self.pixels.get_mut(start..start + count) {
			dest.copy_from_slice(&src[..count]);
		}
	}

	fn fill(&mut self, row: usize, col: usize, count: usize, value: u8) {
		if row >= self.height || col >= self.width {
			return;
		}
		let count = count.min(self.width - col);
		let start = self.offset(row, col);
		if let Some(dest) = self.pixels.get_mut(start..start + count) {
			dest.fill(value);
		}
	}

	fn sparse(&mut self, src: &mut Source<'_>, double: bool) -> Result<(), GobFileError> {
		let step = if double { 2 } else { 1 };
		for row in (0..self.height).step_by(step) {
			let mut col = 0;
			while col < self.width {
				let count = src.byte()?;
				if count & 0x80 != 0 {
					let count = (usize::from(count & 0x7F) + 1).min(self.width - col);
					let pixels = src.take(count)?;
					self.write(row, col, pixels);
					if double {
						self.write(row + 1, col, pixels);
					}
					col += count;
				} else {
					col += usize::from(count) + 1;
				}
			}
		}
		Ok(())
	}
}

/// Renders one frame payload into `dest` at `area`.
///
/// `area` must already be clipped to the surface. `source` is the frame area
/// before clipping, which sizes the decoded image.
pub(super) fn render_frame(
	payload: &[u8],
	vid_buffer: &mut [u8],
	dest: &mut Surface,
	area: Area,
	source: Area,
	palette: &mut Palette,
) -> Result<(), GobFileError> {
	let Some((&kind, mut data)) = payload.split_first() else {
		return Ok(());
	};
	if dest.bpp() != 1 {
		log::debug!("IMD: cannot render into a {}-byte surface", dest.bpp());
		return Ok(());
	}

	let mut kind = kind;
	if kind & 0x10 != 0 {
		kind ^= 0x10;
		let block = data
			.get(..PALETTE_BLOCK)
			.ok_or_else(|| GobFileError::insufficient_data(FileType::Imd, PALETTE_BLOCK, data.len()))?;
		palette.load_vga_bytes(usize::from(block[0]), &block[1..]);
		data = &data[PALETTE_BLOCK..];
	}

	let pitch = usize::from(dest.width());
	let mut target = Target {
		pixels: dest.pixels_mut(),
		pitch,
		left: area.x as usize,
		top: area.y as usize,
		width: area.width as usize,
		height: area.height as usize,
	};

	let data = if kind & 0x80 != 0 {
		kind &= 0x7F;
		let unclipped = source.width == area.width && source.height == area.height;
		if kind == 2 && target.width == pitch && unclipped {
			// Full-width frames decompress straight into the surface
			let start = target.offset(0, 0);
			let end = (start + target.width * target.height).min(target.pixels.len());
			if let Some(rows) = target.pixels.get_mut(start..end) {
				lz77::decompress(data, rows)?;
			}
			return Ok(());
		}
		let size = lz77::decompress(data, vid_buffer)?;
		&vid_buffer[..size]
	} else {
		data
	};

	let mut src = Source {
		data,
		pos: 0,
	};

	match kind {
		2 => {
			for row in 0..target.height {
				let line = src.take(target.width)?;
				target.write(row, 0, line);
			}
		}
		1 => target.sparse(&mut src, false)?,
		0x42 => {
			for row in 0..target.height {
				for col in (0..target.width).step_by(4) {
					let value = src.byte()?;
					target.fill(row, col, 4, value);
				}
			}
		}
		kind if kind & 0x0F == 2 => {
			let mut row = 0;
			while row < target.height {
				let line = src.take(target.width)?;
				target.write(row, 0, line);
				target.write(row + 1, 0, line);
				row += 2;
			}
		}
		_ => target.sparse(&mut src, true)?,
	}

	Ok(())
}
