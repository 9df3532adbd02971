//! Linear indexed-color pixel buffers.
//!
//! Every pixel operation here is silent on bad input: out-of-range
//! coordinates are clipped or ignored, never reported. Callers that track
//! damaged regions do so one level up.

use std::fmt;

use super::rect::{Rect, clamp_to_surface, clip_blit_rect};

/// An owned, row-major pixel buffer.
///
/// `bpp` is the number of bytes per pixel. Gob surfaces are 8-bit indexed
/// (`bpp == 1`); wider pixels store the color little-endian.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
	width: u16,
	height: u16,
	bpp: u8,
	pixels: Vec<u8>,
}

impl fmt::Debug for Surface {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Surface")
			.field("width", &self.width)
			.field("height", &self.height)
			.field("bpp", &self.bpp)
			.finish_non_exhaustive()
	}
}

impl Surface {
	/// Creates a zero-filled surface.
	pub fn new(width: u16, height: u16, bpp: u8) -> Self {
		let bpp = bpp.max(1);
		Self {
			width,
			height,
			bpp,
			pixels: vec![0; usize::from(width) * usize::from(height) * usize::from(bpp)],
		}
	}

	/// Creates a zero-filled 8-bit indexed surface.
	pub fn indexed(width: u16, height: u16) -> Self {
		Self::new(width, height, 1)
	}

	/// Wraps existing 8-bit pixel data.
	///
	/// The data is truncated or zero-padded to `width * height` bytes.
	pub fn from_pixels(width: u16, height: u16, mut pixels: Vec<u8>) -> Self {
		pixels.resize(usize::from(width) * usize::from(height), 0);
		Self {
			width,
			height,
			bpp: 1,
			pixels,
		}
	}

	/// Width in pixels.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Bytes per pixel.
	pub fn bpp(&self) -> u8 {
		self.bpp
	}

	/// `(width, height)`
	pub fn size(&self) -> (u16, u16) {
		(self.width, self.height)
	}

	/// Full-surface rectangle.
	pub fn rect(&self) -> Rect {
		Rect::from_size(0, 0, self.width as i16, self.height as i16)
	}

	/// Raw pixel bytes.
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Mutable raw pixel bytes.
	pub fn pixels_mut(&mut self) -> &mut [u8] {
		&mut self.pixels
	}

	/// Bytes of one row, or `None` past the bottom.
	pub fn row(&self, y: u16) -> Option<&[u8]> {
		let pitch = self.pitch();
		let start = usize::from(y) * pitch;
		self.pixels.get(start..start + pitch)
	}

	/// Mutable bytes of one row, or `None` past the bottom.
	pub fn row_mut(&mut self, y: u16) -> Option<&mut [u8]> {
		let pitch = self.pitch();
		let start = usize::from(y) * pitch;
		self.pixels.get_mut(start..start + pitch)
	}

	/// Exchanges the contents of two surfaces, used for front/back buffer flips.
	pub fn swap(&mut self, other: &mut Surface) {
		std::mem::swap(self, other);
	}

	/// Reallocates the surface to a new size, clearing it.
	pub fn resize(&mut self, width: u16, height: u16) {
		*self = Surface::new(width, height, self.bpp);
	}

	/// Reads one pixel, or `None` outside the surface.
	pub fn get_pixel(&self, x: i16, y: i16) -> Option<u32> {
		let offset = self.offset(x, y)?;
		Some(self.read_color(offset))
	}

	/// Writes one pixel. Out-of-range coordinates are ignored.
	pub fn put_pixel(&mut self, x: i16, y: i16, color: u32) {
		if let Some(offset) = self.offset(x, y) {
			self.write_color(offset, color);
		}
	}

	/// Fills the whole surface.
	pub fn fill(&mut self, color: u32) {
		if self.bpp == 1 {
			self.pixels.fill(color as u8);
			return;
		}
		let bpp = usize::from(self.bpp);
		for offset in (0..self.pixels.len()).step_by(bpp) {
			self.write_color(offset, color);
		}
	}

	/// Fills an inclusive rectangle.
	///
	/// This is the strict primitive: if any edge lies outside the surface, or
	/// the edges are inverted, nothing is drawn. Use [`clamp_to_surface`]
	/// first to get the forgiving behaviour.
	pub fn fill_rect(&mut self, left: i16, top: i16, right: i16, bottom: i16, color: u32) {
		if left < 0 || top < 0 || left > right || top > bottom {
			return;
		}
		if right as u16 >= self.width || bottom as u16 >= self.height {
			return;
		}

		let bpp = usize::from(self.bpp);
		for y in top..=bottom {
			let Some(start) = self.offset(left, y) else {
				continue;
			};
			let end = start + (right - left + 1) as usize * bpp;
			if bpp == 1 {
				self.pixels[start..end].fill(color as u8);
			} else {
				for offset in (start..end).step_by(bpp) {
					self.write_color(offset, color);
				}
			}
		}
	}

	/// Copies the inclusive rectangle `(left, top, right, bottom)` of `from` to `(x, y)`.
	///
	/// With `transp >= 0` pixels of that color are skipped, otherwise rows are
	/// copied as-is. Both surfaces must have the same pixel depth.
	#[allow(clippy::too_many_arguments)]
	pub fn blit(
		&mut self,
		from: &Surface,
		left: i16,
		top: i16,
		right: i16,
		bottom: i16,
		x: i16,
		y: i16,
		transp: i32,
	) {
		if from.bpp != self.bpp {
			log::debug!("Blit between surfaces of different depth ({} vs {})", from.bpp, self.bpp);
			return;
		}

		let Some((src, x, y)) =
			clip_blit_rect(Rect::new(left, top, right, bottom), x, y, from.size(), self.size())
		else {
			return;
		};

		let bpp = usize::from(self.bpp);
		let row_len = usize::from(src.width()) * bpp;

		for row in 0..src.height() as i16 {
			let (Some(src_start), Some(dst_start)) =
				(from.offset(src.left, src.top + row), self.offset(x, y + row))
			else {
				continue;
			};

			if transp < 0 {
				self.pixels[dst_start..dst_start + row_len]
					.copy_from_slice(&from.pixels[src_start..src_start + row_len]);
				continue;
			}

			for col in (0..row_len).step_by(bpp) {
				let color = from.read_color(src_start + col);
				if color != transp as u32 {
					self.write_color(dst_start + col, color);
				}
			}
		}
	}

	/// Blits the whole of `from` to `(x, y)`.
	pub fn blit_at(&mut self, from: &Surface, x: i16, y: i16, transp: i32) {
		let rect = from.rect();
		self.blit(from, rect.left, rect.top, rect.right, rect.bottom, x, y, transp);
	}

	/// Copies a region of this surface onto itself. Source and destination may overlap.
	#[allow(clippy::too_many_arguments)]
	pub fn blit_within(
		&mut self,
		left: i16,
		top: i16,
		right: i16,
		bottom: i16,
		x: i16,
		y: i16,
		transp: i32,
	) {
		let Some((src, x, y)) =
			clip_blit_rect(Rect::new(left, top, right, bottom), x, y, self.size(), self.size())
		else {
			return;
		};

		if transp >= 0 {
			// Skipping pixels while the source is being overwritten has no
			// well-defined result, so take a snapshot first.
			let mut region = Surface::new(src.width(), src.height(), self.bpp);
			region.blit(self, src.left, src.top, src.right, src.bottom, 0, 0, -1);
			self.blit_at(&region, x, y, transp);
			return;
		}

		let row_len = usize::from(src.width()) * usize::from(self.bpp);
		let rows: Vec<i16> = if y > src.top {
			(0..src.height() as i16).rev().collect()
		} else {
			(0..src.height() as i16).collect()
		};

		for row in rows {
			let (Some(src_start), Some(dst_start)) =
				(self.offset(src.left, src.top + row), self.offset(x, y + row))
			else {
				continue;
			};
			self.pixels.copy_within(src_start..src_start + row_len, dst_start);
		}
	}

	/// Draws a line between two points, clipping each pixel.
	pub fn draw_line(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, color: u32) {
		if x0 == x1 || y0 == y1 {
			if let Some(rect) = clamp_to_surface(Rect::new(x0, y0, x1, y1), self.width, self.height)
			{
				self.fill_rect(rect.left, rect.top, rect.right, rect.bottom, color);
			}
			return;
		}

		let (mut x, mut y) = (i32::from(x0), i32::from(y0));
		let (x1, y1) = (i32::from(x1), i32::from(y1));
		let dx = (x1 - x).abs();
		let dy = -(y1 - y).abs();
		let sx = if x < x1 { 1 } else { -1 };
		let sy = if y < y1 { 1 } else { -1 };
		let mut err = dx + dy;

		loop {
			self.put_pixel(x as i16, y as i16, color);
			if x == x1 && y == y1 {
				break;
			}
			let e2 = 2 * err;
			if e2 >= dy {
				err += dy;
				x += sx;
			}
			if e2 <= dx {
				err += dx;
				y += sy;
			}
		}
	}

	fn pitch(&self) -> usize {
		usize::from(self.width) * usize::from(self.bpp)
	}

	fn offset(&self, x: i16, y: i16) -> Option<usize> {
		if x < 0 || y < 0 || x as u16 >= self.width || y as u16 >= self.height {
			return None;
		}
		Some((y as usize * usize::from(self.width) + x as usize) * usize::from(self.bpp))
	}

	fn read_color(&self, offset: usize) -> u32 {
		let bpp = usize::from(self.bpp);
		self.pixels[offset..offset + bpp]
			.iter()
			.rev()
			.fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
	}

	fn write_color(&mut self, offset: usize, color: u32) {
		let bpp = usize::from(self.bpp);
		let bytes = color.to_le_bytes();
		for (i, dst) in self.pixels[offset..offset + bpp].iter_mut().enumerate() {
			*dst = bytes.get(i).copied().unwrap_or(0);
		}
	}
}
