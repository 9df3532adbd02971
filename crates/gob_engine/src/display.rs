//! Display backends.

use gob_types::graphics::{Palette, Rect};

/// The screen the engine presents to.
pub trait Display {
	/// Replaces the hardware palette.
	fn set_palette(&mut self, palette: &Palette);

	/// Copies a block of 8-bit pixels to the screen.
	///
	/// `pixels` starts at the top-left pixel of the block and has `pitch`
	/// bytes per row.
	fn copy_rect_to_screen(&mut self, pixels: &[u8], pitch: usize, x: u16, y: u16, width: u16, height: u16);

	/// Presents everything copied since the last update.
	fn update_screen(&mut self);
}

/// A headless display keeping its framebuffer in memory.
#[derive(Debug, Clone)]
pub struct MemoryDisplay {
	width: u16,
	height: u16,
	framebuffer: Vec<u8>,
	palette: Palette,
	palette_updates: usize,
	updates: usize,
	copies: Vec<Rect>,
}

impl MemoryDisplay {
	/// Creates a black display.
	pub fn new(width: u16, height: u16) -> Self {
		Self {
			width,
			height,
			framebuffer: vec![0; usize::from(width) * usize::from(height)],
			palette: Palette::default(),
			palette_updates: 0,
			updates: 0,
			copies: Vec::new(),
		}
	}

	/// Screen width.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Screen height.
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Current screen contents.
	pub fn framebuffer(&self) -> &[u8] {
		&self.framebuffer
	}

	/// One pixel of the screen.
	pub fn pixel(&self, x: u16, y: u16) -> Option<u8> {
		if x >= self.width {
			return None;
		}
		self.framebuffer.get(usize::from(y) * usize::from(self.width) + usize::from(x)).copied()
	}

	/// Current palette.
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Number of palette changes.
	pub fn palette_updates(&self) -> usize {
		self.palette_updates
	}

	/// Number of screen updates.
	pub fn updates(&self) -> usize {
		self.updates
	}

	/// Blocks copied since the last screen update.
	pub fn pending_copies(&self) -> &[Rect] {
		&self.copies
	}
}

impl Display for MemoryDisplay {
	fn set_palette(&mut self, palette: &Palette) {
		self.palette.clone_from(palette);
		self.palette_updates += 1;
	}

	fn copy_rect_to_screen(&mut self, pixels: &[u8], pitch: usize, x: u16, y: u16, width: u16, height: u16) {
		let screen_width = usize::from(self.width);
		let width = usize::from(width.min(self.width.saturating_sub(x)));
		let height = usize::from(height.min(self.height.saturating_sub(y)));
		if width == 0 || height == 0 {
			return;
		}

		for row in 0..height {
			let Some(src) = pixels.get(row * pitch..row * pitch + width) else {
				break;
			};
			let start = (usize::from(y) + row) * screen_width + usize::from(x);
			self.framebuffer[start..start + width].copy_from_slice(src);
		}

		self.copies.push(Rect::from_size(x as i16, y as i16, width as i16, height as i16));
	}

	fn update_screen(&mut self) {
		self.updates += 1;
		self.copies.clear();
	}
}
