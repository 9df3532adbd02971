//! DEC backdrop decal files.
//!
//! A DEC file composes one static picture: a backdrop sheet drawn whole,
//! then a list of layer parts at fixed screen positions.
//!
//! ## Layout
//!
//! | Size          | Field                                            |
//! |---------------|--------------------------------------------------|
//! | 2             | unused                                           |
//! | 2             | backdrop count (i16)                             |
//! | 2             | layer count (i16, including the backdrop)        |
//! | 13(+1) × n    | backdrop names, only the first is used           |
//! | 13(+1) × n    | layer names (`layer_count - 1` of them)          |
//! | 13(+1) × 2    | two more names, ignored                          |
//! | 2             | part count                                       |
//! | 8 × n         | parts: layer + 1, part, unused, x, y, transp     |
//!
//! Names usually carry an `.LBM` extension; the CMP/RXY pair with the same
//! base name is loaded instead. The parts table is only present when the
//! file has a backdrop.

use gob_vfs::Resources;

use crate::graphics::{Rect, Surface};
use crate::reader::{ByteReader, Endian};

use super::cmp;
use super::endian::{self, EndiannessMethod, base_name};
use super::error::{FileType, GobFileError};

const NAME_LENGTH: usize = 13;

/// One placed layer part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Part {
	/// Layer index; `0xFF` for parts referencing no layer
	pub layer: u8,
	/// Part within the layer
	pub part: u8,
	/// Screen column
	pub x: u16,
	/// Screen row
	pub y: u16,
	/// Draw with color 0 transparent
	pub transp: bool,
}

/// Source of a [`Blit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlitSource {
	/// The backdrop sheet
	Backdrop,
	/// A layer sheet
	Layer(u8),
}

/// A resolved draw operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blit {
	/// Sheet to copy from
	pub source: BlitSource,
	/// Area of the sheet
	pub area: Rect,
	/// Destination column
	pub x: i16,
	/// Destination row
	pub y: i16,
	/// Transparent color, or `-1`
	pub transp: i32,
}

/// A loaded DEC file.
#[derive(Debug, Clone, Default)]
pub struct File {
	name: String,
	backdrop: Option<cmp::File>,
	layers: Vec<cmp::File>,
	parts: Vec<Part>,
}

impl File {
	/// Loads a DEC file with its backdrop and layers.
	///
	/// Layer sheets are allocated at `width`×`height`. A missing or damaged
	/// file logs a warning and yields an empty picture.
	pub fn open(
		resources: &dyn Resources,
		name: &str,
		width: u16,
		height: u16,
		bpp: u8,
		method: EndiannessMethod,
	) -> Self {
		let Some(probed) = endian::probe(resources, name, method) else {
			log::warn!("DEC: no such file \"{name}\"");
			return Self {
				name: name.to_string(),
				..Self::default()
			};
		};

		match Self::from_bytes(resources, &probed.data, probed.endian, (width, height), bpp) {
			Ok(mut file) => {
				file.name = name.to_string();
				file
			}
			Err(e) => {
				log::warn!("DEC: failed to load \"{}\": {}", probed.name, e);
				Self {
					name: name.to_string(),
					..Self::default()
				}
			}
		}
	}

	/// Parses DEC data, loading sheets through `resources`.
	pub fn from_bytes(
		resources: &dyn Resources,
		data: &[u8],
		endian: Endian,
		size: (u16, u16),
		bpp: u8,
	) -> Result<Self, GobFileError> {
		let mut reader =
			ByteReader::new(data, FileType::Dec).with_endian(endian).with_padding(endian == Endian::Big);
		let name_size = NAME_LENGTH + usize::from(reader.has_padding());

		reader.skip(2)?;
		let backdrop_count = reader.read_i16()?;
		let layer_count = reader.read_i16()?;

		if backdrop_count > 1 {
			log::warn!("DEC: more than one backdrop ({backdrop_count})");
		}
		if layer_count < 1 {
			log::warn!("DEC: less than one layer ({layer_count})");
		}

		let mut file = Self::default();
		let load_sheet = |reader: &mut ByteReader<'_>| -> Result<cmp::File, GobFileError> {
			let name = reader.read_fixed_string(NAME_LENGTH)?;
			reader.pad()?;
			Ok(cmp::File::open(resources, base_name(&name), size.0, size.1, bpp))
		};

		if backdrop_count > 0 {
			file.backdrop = Some(load_sheet(&mut reader)?);
			reader.skip(usize::from(backdrop_count as u16 - 1) * name_size)?;
		}

		for _ in 1..layer_count.max(1) {
			file.layers.push(load_sheet(&mut reader)?);
		}

		if backdrop_count > 0 {
			reader.skip(name_size * 2)?;
			let part_count = reader.read_u16()?;
			for _ in 0..part_count {
				let layer = reader.read_u8()?.wrapping_sub(1);
				let part = reader.read_u8()?;
				reader.skip(1)?;
				let x = reader.read_u16()?;
				let y = reader.read_u16()?;
				let transp = reader.read_u8()? != 0;
				file.parts.push(Part {
					layer,
					part,
					x,
					y,
					transp,
				});
			}
		}

		log::debug!("DEC: {} layers, {} parts", file.layers.len(), file.parts.len());

		Ok(file)
	}

	/// Name the file was opened with.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The backdrop sheet, if the file has one.
	pub fn backdrop(&self) -> Option<&cmp::File> {
		self.backdrop.as_ref()
	}

	/// Layer sheets.
	pub fn layers(&self) -> &[cmp::File] {
		&self.layers
	}

	/// Placed parts in draw order.
	pub fn parts(&self) -> &[Part] {
		&self.parts
	}

	/// Resolves the picture into draw operations.
	///
	/// The backdrop comes first, then the parts in file order. Parts whose
	/// layer or coordinates do not exist are left out.
	pub fn draw_list(&self) -> Vec<Blit> {
		let mut blits = Vec::with_capacity(self.parts.len() + 1);

		if let Some(surface) = self.backdrop.as_ref().and_then(cmp::File::surface) {
			blits.push(Blit {
				source: BlitSource::Backdrop,
				area: surface.rect(),
				x: 0,
				y: 0,
				transp: -1,
			});
		}

		for part in &self.parts {
			let Some(coords) =
				self.layers.get(usize::from(part.layer)).and_then(|layer| layer.coordinates(u16::from(part.part)))
			else {
				continue;
			};
			blits.push(Blit {
				source: BlitSource::Layer(part.layer),
				area: coords.to_rect(),
				x: part.x as i16,
				y: part.y as i16,
				transp: if part.transp { 0 } else { -1 },
			});
		}

		blits
	}

	/// Draws the backdrop and all parts.
	pub fn draw(&self, dest: &mut Surface) {
		for blit in self.draw_list() {
			let sheet = match blit.source {
				BlitSource::Backdrop => self.backdrop.as_ref(),
				BlitSource::Layer(layer) => self.layers.get(usize::from(layer)),
			};
			if let Some(sheet) = sheet {
				sheet.draw_rect(dest, blit.area, blit.x, blit.y, blit.transp);
			}
		}
	}

	/// Draws only the backdrop.
	pub fn draw_backdrop(&self, dest: &mut Surface) {
		if let Some(backdrop) = &self.backdrop {
			backdrop.draw_at(dest, 0, 0, -1);
		}
	}

	/// Draws a single layer part.
	pub fn draw_layer(&self, dest: &mut Surface, layer: u16, part: u16, x: i16, y: i16, transp: i32) {
		if let Some(layer) = self.layers.get(usize::from(layer)) {
			layer.draw(dest, part, x, y, transp);
		}
	}
}
