//! 1-bit bitmap fonts.
//!
//! ## Layout
//!
//! | Offset | Size              | Field                                      |
//! |--------|-------------------|--------------------------------------------|
//! | 0      | 1                 | item width (bits 0-6), char-width flag (7) |
//! | 1      | 1                 | item height                                |
//! | 2      | 1                 | first character                            |
//! | 3      | 1                 | last character                             |
//! | 4      | `size * count`    | glyph bitmaps                              |
//! | ...    | `count`           | per-character widths, if flagged           |
//!
//! A glyph row takes `(width - 1) / 8 + 1` bytes, most significant bit first.

use crate::file::{FileType, GobFileError};

use super::surface::Surface;

/// A parsed bitmap font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
	item_width: u8,
	item_height: u8,
	start_item: u8,
	end_item: u8,
	item_size: usize,
	glyphs: Vec<u8>,
	char_widths: Option<Vec<u8>>,
}

impl Font {
	/// Parses a font from raw bytes.
	pub fn from_bytes(data: &[u8]) -> Result<Self, GobFileError> {
		if data.len() < 4 {
			return Err(GobFileError::insufficient_data(FileType::Font, 4, data.len()));
		}

		let item_width = data[0] & 0x7F;
		let item_height = data[1];
		let start_item = data[2];
		let end_item = data[3];

		let row_bytes = (usize::from(item_width.max(1)) - 1) / 8 + 1;
		let item_size = row_bytes * usize::from(item_height);
		let count = usize::from(end_item.saturating_sub(start_item)) + 1;

		let glyph_end = 4 + item_size * count;
		if data.len() < glyph_end {
			return Err(GobFileError::insufficient_data(FileType::Font, glyph_end, data.len()));
		}

		let char_widths = if data[0] & 0x80 != 0 {
			let widths_end = glyph_end + count;
			if data.len() < widths_end {
				return Err(GobFileError::insufficient_data(FileType::Font, widths_end, data.len()));
			}
			Some(data[glyph_end..widths_end].to_vec())
		} else {
			None
		};

		Ok(Self {
			item_width,
			item_height,
			start_item,
			end_item,
			item_size,
			glyphs: data[4..glyph_end].to_vec(),
			char_widths,
		})
	}

	/// Cell width in pixels.
	pub fn item_width(&self) -> u8 {
		self.item_width
	}

	/// Cell height in pixels.
	pub fn item_height(&self) -> u8 {
		self.item_height
	}

	/// First character with a glyph.
	pub fn start_item(&self) -> u8 {
		self.start_item
	}

	/// Last character with a glyph.
	pub fn end_item(&self) -> u8 {
		self.end_item
	}

	/// Number of glyphs.
	pub fn char_count(&self) -> usize {
		usize::from(self.end_item.saturating_sub(self.start_item)) + 1
	}

	/// Returns `true` if the font has per-character widths.
	pub fn is_monospaced(&self) -> bool {
		self.char_widths.is_none()
	}

	/// Returns `true` if the character has a glyph.
	pub fn has_char(&self, c: u8) -> bool {
		c >= self.start_item && c <= self.end_item
	}

	/// Advance width of a character.
	pub fn char_width(&self, c: u8) -> u8 {
		match &self.char_widths {
			Some(widths) if self.has_char(c) => {
				widths[usize::from(c - self.start_item)]
			}
			_ => self.item_width,
		}
	}

	fn glyph(&self, c: u8) -> Option<&[u8]> {
		if !self.has_char(c) {
			return None;
		}
		let start = usize::from(c - self.start_item) * self.item_size;
		self.glyphs.get(start..start + self.item_size)
	}

	/// Draws one character with its top-left corner at `(x, y)`.
	///
	/// Set bits are drawn with `color2`. Clear bits are drawn with `color1`,
	/// unless `transparent` is set. Characters without a glyph are ignored.
	#[allow(clippy::too_many_arguments)]
	pub fn draw_letter(
		&self,
		c: u8,
		x: i16,
		y: i16,
		color1: u32,
		color2: u32,
		transparent: bool,
		dest: &mut Surface,
	) {
		let Some(glyph) = self.glyph(c) else {
			return;
		};

		let row_bytes = (usize::from(self.item_width.max(1)) - 1) / 8 + 1;
		for (row, bits) in glyph.chunks_exact(row_bytes).enumerate() {
			for col in 0..usize::from(self.item_width) {
				let set = bits[col / 8] & (0x80 >> (col % 8)) != 0;
				let px = x.wrapping_add(col as i16);
				let py = y.wrapping_add(row as i16);
				if set {
					dest.put_pixel(px, py, color2);
				} else if !transparent {
					dest.put_pixel(px, py, color1);
				}
			}
		}
	}
}
