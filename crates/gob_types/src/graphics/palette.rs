//! VGA palettes.
//!
//! Gob data stores colors as 6-bit VGA DAC values (`0..=63` per component),
//! 3 bytes per entry, 256 entries.

/// Number of palette entries.
pub const PALETTE_COLORS: usize = 256;

/// Size of a full palette in bytes.
pub const PALETTE_SIZE: usize = PALETTE_COLORS * 3;

/// A 256-entry palette of 6-bit VGA RGB triplets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	colors: [[u8; 3]; PALETTE_COLORS],
}

impl Default for Palette {
	fn default() -> Self {
		Self {
			colors: [[0; 3]; PALETTE_COLORS],
		}
	}
}

impl Palette {
	/// Creates an all-black palette.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a palette from packed VGA bytes.
	///
	/// Short input leaves the remaining entries black; components are masked to 6 bits.
	pub fn from_vga_bytes(data: &[u8]) -> Self {
		let mut palette = Self::default();
		palette.load_vga_bytes(0, data);
		palette
	}

	/// Overwrites entries starting at `start` with packed VGA bytes.
	pub fn load_vga_bytes(&mut self, start: usize, data: &[u8]) {
		for (entry, rgb) in self.colors.iter_mut().skip(start).zip(data.chunks_exact(3)) {
			*entry = [rgb[0] & 0x3F, rgb[1] & 0x3F, rgb[2] & 0x3F];
		}
	}

	/// Packed VGA bytes of the whole palette.
	pub fn to_vga_bytes(&self) -> Vec<u8> {
		self.colors.iter().flatten().copied().collect()
	}

	/// Converts to 8-bit RGB, scaling each component to `0..=255`.
	pub fn to_rgb8(&self) -> Vec<[u8; 3]> {
		self.colors.iter().map(|c| c.map(|v| (v << 2) | (v >> 4))).collect()
	}

	/// Returns one entry.
	pub fn get(&self, index: u8) -> [u8; 3] {
		self.colors[usize::from(index)]
	}

	/// Sets one entry.
	pub fn set(&mut self, index: u8, rgb: [u8; 3]) {
		self.colors[usize::from(index)] = rgb;
	}

	/// All entries.
	pub fn colors(&self) -> &[[u8; 3]; PALETTE_COLORS] {
		&self.colors
	}

	/// Mutable access to all entries.
	pub fn colors_mut(&mut self) -> &mut [[u8; 3]; PALETTE_COLORS] {
		&mut self.colors
	}

	/// Copies the inclusive range `start..=end` from another palette.
	pub fn copy_range(&mut self, from: &Palette, start: u8, end: u8) {
		if start > end {
			return;
		}
		let range = usize::from(start)..=usize::from(end);
		self.colors[range.clone()].copy_from_slice(&from.colors[range]);
	}

	/// Sets every entry to black.
	pub fn clear(&mut self) {
		self.colors = [[0; 3]; PALETTE_COLORS];
	}

	/// Returns `true` if every entry is black.
	pub fn is_black(&self) -> bool {
		self.colors.iter().all(|c| *c == [0; 3])
	}
}
