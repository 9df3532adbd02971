//! CMP sprite sheets.
//!
//! A layer is a pair of files sharing a base name: `<base>.CMP` holds the
//! compressed pixels and `<base>.RXY` the coordinates of the parts within
//! them. Without an RXY file the whole sheet is a single part.
//!
//! The pixel data is either an LZ sprite (`01 02 ..`, see
//! [`uncompress_sprite`]) or, failing that, a packed RLE sprite.

use gob_vfs::Resources;

use crate::codec::lz77::uncompress_sprite;
use crate::graphics::{Rect, Surface, draw_packed_sprite};

use super::rxy::{self, Coordinates};

/// Screen size used when neither the caller nor the RXY table gives one.
pub const DEFAULT_SIZE: (u16, u16) = (320, 200);

/// A sprite sheet with its part coordinates.
///
/// A layer whose `.CMP` file is missing is empty and draws nothing.
#[derive(Debug, Clone, Default)]
pub struct File {
	name: String,
	surface: Option<Surface>,
	coordinates: Option<rxy::File>,
}

impl File {
	/// Loads `<base_name>.CMP` and `<base_name>.RXY`.
	///
	/// `width` and `height` force the sheet size; pass `0` to take it from the
	/// RXY table instead.
	pub fn open(resources: &dyn Resources, base_name: &str, width: u16, height: u16, bpp: u8) -> Self {
		let cmp_name = format!("{base_name}.CMP");
		let rxy_name = format!("{base_name}.RXY");

		let mut file = Self {
			name: base_name.to_string(),
			..Self::default()
		};

		let Some(data) = resources.get_file(&cmp_name) else {
			log::debug!("CMP \"{cmp_name}\" not found, layer left empty");
			return file;
		};

		file.coordinates = rxy::File::open(resources, &rxy_name);
		file.create_surface(width, height, bpp);
		file.load_pixels(&data);
		file
	}

	/// Builds a layer from in-memory data.
	pub fn from_parts(name: &str, cmp: &[u8], rxy: Option<rxy::File>, width: u16, height: u16) -> Self {
		let mut file = Self {
			name: name.to_string(),
			surface: None,
			coordinates: rxy,
		};
		file.create_surface(width, height, 1);
		file.load_pixels(cmp);
		file
	}

	fn create_surface(&mut self, width: u16, height: u16, bpp: u8) {
		let (rxy_width, rxy_height) =
			self.coordinates.as_ref().map_or((0, 0), |rxy| (rxy.width(), rxy.height()));

		let pick = |explicit: u16, from_rxy: u16, fallback: u16| {
			if explicit != 0 {
				explicit
			} else if from_rxy != 0 {
				from_rxy
			} else {
				fallback
			}
		};
		let width = pick(width, rxy_width, DEFAULT_SIZE.0);
		let height = pick(height, rxy_height, DEFAULT_SIZE.1);

		self.surface = Some(Surface::new(width, height, bpp));
		if self.coordinates.is_none() {
			self.coordinates = Some(rxy::File::with_extent(width, height));
		}
	}

	fn load_pixels(&mut self, data: &[u8]) {
		let Some(surface) = self.surface.as_mut() else {
			return;
		};
		let (width, height) = surface.size();
		if !uncompress_sprite(data, width, height, 0, 0, false, surface) {
			draw_packed_sprite(data, width, height, 0, 0, false, surface);
		}
	}

	/// Base name the layer was loaded from.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns `true` if the layer has no pixels.
	pub fn is_empty(&self) -> bool {
		self.surface.is_none()
	}

	/// The decoded sheet.
	pub fn surface(&self) -> Option<&Surface> {
		self.surface.as_ref()
	}

	/// The coordinate table.
	pub fn rxy(&self) -> Option<&rxy::File> {
		self.coordinates.as_ref()
	}

	/// Number of parts.
	pub fn part_count(&self) -> usize {
		self.coordinates.as_ref().map_or(0, rxy::File::len)
	}

	/// Coordinates of a part, `None` for missing or sentinel parts.
	pub fn coordinates(&self, part: u16) -> Option<Coordinates> {
		self.surface.as_ref()?;
		let coords = *self.coordinates.as_ref()?.get(part)?;
		coords.is_valid().then_some(coords)
	}

	/// Size of a part, `(0, 0)` for missing parts.
	pub fn part_size(&self, part: u16) -> (u16, u16) {
		self.coordinates(part).map_or((0, 0), |c| (c.width(), c.height()))
	}

	/// Size of the area spanned by all parts.
	pub fn max_size(&self) -> (u16, u16) {
		self.coordinates.as_ref().map_or((0, 0), |rxy| (rxy.width(), rxy.height()))
	}

	/// Draws one part with its top-left corner at `(x, y)`.
	pub fn draw(&self, dest: &mut Surface, part: u16, x: i16, y: i16, transp: i32) {
		let Some(coords) = self.coordinates(part) else {
			return;
		};
		self.draw_rect(dest, coords.to_rect(), x, y, transp);
	}

	/// Draws an arbitrary area of the sheet.
	pub fn draw_rect(&self, dest: &mut Surface, area: Rect, x: i16, y: i16, transp: i32) {
		if let Some(surface) = &self.surface {
			dest.blit(surface, area.left, area.top, area.right, area.bottom, x, y, transp);
		}
	}

	/// Draws the whole sheet.
	pub fn draw_at(&self, dest: &mut Surface, x: i16, y: i16, transp: i32) {
		if let Some(surface) = &self.surface {
			dest.blit_at(surface, x, y, transp);
		}
	}

	/// Adds a part to the coordinate table and returns its index.
	pub fn add_part(&mut self, left: u16, top: u16, right: u16, bottom: u16) -> Option<u16> {
		self.surface.as_ref()?;
		Some(self.coordinates.get_or_insert_with(rxy::File::default).add(left, top, right, bottom))
	}

	/// Replaces every pixel of color `from` with `to`.
	pub fn recolor(&mut self, from: u8, to: u8) {
		if let Some(surface) = self.surface.as_mut() {
			for pixel in surface.pixels_mut().iter_mut().filter(|p| **p == from) {
				*pixel = to;
			}
		}
	}
}
