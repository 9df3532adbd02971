//! Video driver: palette, backend dirty rectangles and pixel primitives.

use gob_types::codec::uncompress_sprite;
use gob_types::graphics::{self, Font, Palette, Rect, Surface, clamp_to_surface};

use crate::display::Display;

/// Wraps a [`Display`] and tracks which screen regions need presenting.
#[derive(Debug)]
pub struct Video<D: Display> {
	display: D,
	width: u16,
	height: u16,
	palette: Palette,
	dirty_rects: Vec<Rect>,
	dirty_all: bool,
}

impl<D: Display> Video<D> {
	/// Creates a driver for a `width`×`height` screen.
	pub fn new(display: D, width: u16, height: u16) -> Self {
		Self {
			display,
			width,
			height,
			palette: Palette::default(),
			dirty_rects: Vec::new(),
			dirty_all: false,
		}
	}

	/// The backend.
	pub fn display(&self) -> &D {
		&self.display
	}

	/// Mutable access to the backend.
	pub fn display_mut(&mut self) -> &mut D {
		&mut self.display
	}

	/// Screen size.
	pub fn size(&self) -> (u16, u16) {
		(self.width, self.height)
	}

	/// Palette last pushed to the display.
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Marks a region for the next retrace.
	pub fn dirty_rects_add(&mut self, left: i16, top: i16, right: i16, bottom: i16) {
		if self.dirty_all {
			return;
		}
		self.dirty_rects.push(Rect::new(left, top, right, bottom));
	}

	/// Marks the whole screen for the next retrace.
	pub fn dirty_rects_all(&mut self) {
		self.dirty_all = true;
		self.dirty_rects.clear();
	}

	/// Forgets all dirty regions.
	pub fn dirty_rects_clear(&mut self) {
		self.dirty_all = false;
		self.dirty_rects.clear();
	}

	/// Regions marked for the next retrace.
	pub fn dirty_rects(&self) -> &[Rect] {
		&self.dirty_rects
	}

	/// Returns `true` if the whole screen is marked.
	pub fn is_dirty_all(&self) -> bool {
		self.dirty_all
	}

	/// Presents the dirty regions of `front`.
	pub fn retrace(&mut self, front: &Surface) {
		if front.bpp() != 1 {
			log::debug!("Video: cannot present a {}-byte surface", front.bpp());
			self.dirty_rects_clear();
			return;
		}

		let rects = if self.dirty_all { vec![front.rect()] } else { std::mem::take(&mut self.dirty_rects) };
		let pitch = usize::from(front.width());

		for rect in rects {
			let Some(rect) = clamp_to_surface(rect, front.width(), front.height()) else {
				continue;
			};
			let start = rect.top as usize * pitch + rect.left as usize;
			self.display.copy_rect_to_screen(
				&front.pixels()[start..],
				pitch,
				rect.left as u16,
				rect.top as u16,
				rect.width(),
				rect.height(),
			);
		}

		self.display.update_screen();
		self.dirty_rects_clear();
	}

	/// Pushes a palette to the display.
	pub fn set_full_palette(&mut self, palette: &Palette) {
		self.palette.clone_from(palette);
		self.display.set_palette(&self.palette);
	}

	/// Blacks out the display palette.
	pub fn clear_palette(&mut self) {
		self.set_full_palette(&Palette::default());
	}

	/// Fills a rectangle, clamping it to the surface first.
	pub fn fill_rect(&self, dest: &mut Surface, left: i16, top: i16, right: i16, bottom: i16, color: u32) {
		if let Some(rect) = clamp_to_surface(Rect::new(left, top, right, bottom), dest.width(), dest.height()) {
			dest.fill_rect(rect.left, rect.top, rect.right, rect.bottom, color);
		}
	}

	/// Draws a sprite that is either LZ-compressed or packed.
	#[allow(clippy::too_many_arguments)]
	pub fn draw_packed_sprite(
		&self,
		data: &[u8],
		width: u16,
		height: u16,
		x: i16,
		y: i16,
		transparent: bool,
		dest: &mut Surface,
	) {
		if !uncompress_sprite(data, width, height, x, y, transparent, dest) {
			graphics::draw_packed_sprite(data, width, height, x, y, transparent, dest);
		}
	}

	/// Draws one character of a font.
	#[allow(clippy::too_many_arguments)]
	pub fn draw_letter(
		&self,
		font: &Font,
		c: u8,
		x: i16,
		y: i16,
		color1: u32,
		color2: u32,
		transparent: bool,
		dest: &mut Surface,
	) {
		font.draw_letter(c, x, y, color1, color2, transparent, dest);
	}

	/// Draws a line.
	pub fn draw_line(&self, dest: &mut Surface, x0: i16, y0: i16, x1: i16, y1: i16, color: u32) {
		dest.draw_line(x0, y0, x1, y1, color);
	}

	/// Sets one pixel.
	pub fn put_pixel(&self, dest: &mut Surface, x: i16, y: i16, color: u32) {
		dest.put_pixel(x, y, color);
	}
}
