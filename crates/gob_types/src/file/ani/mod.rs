//! ANI layered animation files.
//!
//! An animation frame is a list of chunks, each drawing one part of one
//! layer (a CMP sprite sheet) at an offset. The layers are named in the ANI
//! file and loaded from sibling `.CMP`/`.RXY` files.
//!
//! ## Header
//!
//! | Size | Field                                 |
//! |------|---------------------------------------|
//! | 2    | unused                                |
//! | 2    | animation count                       |
//! | 2    | layer count (including a dummy first) |
//!
//! ## Layers
//!
//! `layer_count` names of 13 bytes (plus one pad byte in big-endian files).
//! The first name is ignored.
//!
//! ## Animations
//!
//! | Size   | Field                        |
//! |--------|------------------------------|
//! | 13(+1) | name                         |
//! | 13(+1) | name again, ignored          |
//! | 2      | unknown                      |
//! | 2 × 4  | x, y, delta x, delta y (i16) |
//! | 1(+1)  | transparency flag            |
//! | 2      | frame count                  |
//! | ...    | chunk stream                 |
//!
//! ## Chunks
//!
//! | Size  | Field                                                      |
//! |-------|------------------------------------------------------------|
//! | 1     | flags: layer + 1 (bits 0-3), Y (4-5) and X (6-7) multipliers |
//! | 1     | part                                                       |
//! | 1     | x (i8)                                                     |
//! | 1     | y (i8)                                                     |
//! | 1(+1) | control: `0x01` more chunks, `0xFF` end, else next frame   |
//!
//! The multipliers extend the signed offsets by `±(bits << 7)`.

use gob_vfs::Resources;

use crate::graphics::{Rect, Surface};
use crate::reader::{ByteReader, Endian};

use super::cmp;
use super::endian::{self, EndiannessMethod, base_name};
use super::error::{FileType, GobFileError};

/// Width of a name field.
pub const NAME_LENGTH: usize = 13;

/// Chunk control byte: another chunk follows in the same frame.
pub const CHUNK_CONTINUE: u8 = 0x01;

/// Chunk control byte: the animation ends.
pub const CHUNK_END: u8 = 0xFF;

/// One draw instruction of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Chunk {
	/// Layer index; `0xFFFF` for chunks referencing the dummy layer
	pub layer: u16,
	/// Part within the layer
	pub part: u16,
	/// Horizontal offset from the animation position
	pub x: i16,
	/// Vertical offset from the animation position
	pub y: i16,
}

/// One animation of an ANI file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Animation {
	/// Animation name
	pub name: String,
	/// Default horizontal position
	pub x: i16,
	/// Default vertical position
	pub y: i16,
	/// Horizontal movement per completed cycle
	pub delta_x: i16,
	/// Vertical movement per completed cycle
	pub delta_y: i16,
	/// Draw with color 0 transparent
	pub transp: bool,
	/// Number of frames, at least 1
	pub frame_count: u16,
	/// Widest frame area
	pub width: u16,
	/// Tallest frame area
	pub height: u16,
	/// Chunks per frame, drawn in order
	pub frames: Vec<Vec<Chunk>>,
	/// Bounding box per frame, relative to the animation position.
	///
	/// Frames without drawable chunks keep a degenerate box (`left > right`).
	pub frame_areas: Vec<Rect>,
}

/// A loaded ANI file.
#[derive(Debug, Clone, Default)]
pub struct File {
	name: String,
	layers: Vec<Option<cmp::File>>,
	animations: Vec<Animation>,
	max_width: u16,
	max_height: u16,
}

impl File {
	/// Loads an ANI file and its layers.
	///
	/// `width` is the sheet width handed to the layers (normally the screen
	/// width). A missing or damaged file logs a warning and yields an empty
	/// animation set.
	pub fn open(resources: &dyn Resources, name: &str, width: u16, bpp: u8, method: EndiannessMethod) -> Self {
		let Some(probed) = endian::probe(resources, name, method) else {
			log::warn!("ANI: no such file \"{name}\"");
			return Self {
				name: name.to_string(),
				..Self::default()
			};
		};

		match Self::from_bytes(resources, &probed.data, probed.endian, width, bpp) {
			Ok(mut file) => {
				file.name = name.to_string();
				file
			}
			Err(e) => {
				log::warn!("ANI: failed to load \"{}\": {}", probed.name, e);
				Self {
					name: name.to_string(),
					..Self::default()
				}
			}
		}
	}

	/// Parses ANI data, loading layers through `resources`.
	///
	/// Big-endian data is read with padding. Unlike [`File::open`] any read
	/// error is returned.
	pub fn from_bytes(
		resources: &dyn Resources,
		data: &[u8],
		endian: Endian,
		width: u16,
		bpp: u8,
	) -> Result<Self, GobFileError> {
		let mut reader =
			ByteReader::new(data, FileType::Ani).with_endian(endian).with_padding(endian == Endian::Big);

		reader.skip(2)?;
		let animation_count = reader.read_u16()?;
		let layer_count = reader.read_u16()?;

		if layer_count < 1 {
			log::warn!("ANI: less than one layer ({layer_count})");
		}

		let mut file = Self::default();

		if layer_count > 0 {
			// The first layer is a dummy
			reader.skip(NAME_LENGTH)?;
			reader.pad()?;

			for _ in 1..layer_count {
				let layer = Self::load_layer(&mut reader, resources, width, bpp)?;
				file.layers.push(layer);
			}
		}

		for _ in 0..animation_count {
			let mut animation = Self::load_animation(&mut reader)?;
			file.compute_areas(&mut animation);
			file.max_width = file.max_width.max(animation.width);
			file.max_height = file.max_height.max(animation.height);
			file.animations.push(animation);
		}

		log::debug!(
			"ANI: {} animations, {} layers, max size {}x{}",
			file.animations.len(),
			file.layers.len(),
			file.max_width,
			file.max_height
		);

		Ok(file)
	}

	fn load_layer(
		reader: &mut ByteReader<'_>,
		resources: &dyn Resources,
		width: u16,
		bpp: u8,
	) -> Result<Option<cmp::File>, GobFileError> {
		let name = reader.read_fixed_string(NAME_LENGTH)?;
		reader.pad()?;

		let base = base_name(&name);
		if base.is_empty() {
			return Ok(None);
		}

		let has_rxy = resources.has_file(&format!("{base}.RXY"));
		let has_cmp = resources.has_file(&format!("{base}.CMP"));
		if !has_rxy || !has_cmp {
			log::debug!("ANI: layer \"{base}\" is missing its RXY or CMP file");
			return Ok(None);
		}

		Ok(Some(cmp::File::open(resources, base, width, 0, bpp)))
	}

	fn load_animation(reader: &mut ByteReader<'_>) -> Result<Animation, GobFileError> {
		let name = reader.read_fixed_string(NAME_LENGTH)?;
		reader.pad()?;
		// The name a second time
		reader.skip(NAME_LENGTH)?;
		reader.pad()?;
		reader.skip(2)?;

		let x = reader.read_i16()?;
		let y = reader.read_i16()?;
		let delta_x = reader.read_i16()?;
		let delta_y = reader.read_i16()?;
		let transp = reader.read_u8()? != 0;
		reader.pad()?;

		let frame_count = reader.read_u16()?;
		let mut frames = vec![Vec::new(); usize::from(frame_count.max(1))];
		Self::load_frames(reader, &mut frames)?;

		Ok(Animation {
			name,
			x,
			y,
			delta_x,
			delta_y,
			transp,
			frame_count: frames.len() as u16,
			frames,
			..Animation::default()
		})
	}

	fn load_frames(reader: &mut ByteReader<'_>, frames: &mut Vec<Vec<Chunk>>) -> Result<(), GobFileError> {
		let mut current = 0usize;

		loop {
			let flags = reader.read_u8()?;
			let part = reader.read_u8()?;
			let x = reader.read_i8()?;
			let y = reader.read_i8()?;

			let x_offset = i16::from((flags & 0xC0) >> 6) << 7;
			let y_offset = i16::from((flags & 0x30) >> 4) << 7;

			frames[current].push(Chunk {
				layer: u16::from(flags & 0x0F).wrapping_sub(1),
				part: u16::from(part),
				x: i16::from(x) + if x >= 0 { x_offset } else { -x_offset },
				y: i16::from(y) + if y >= 0 { y_offset } else { -y_offset },
			});

			let control = reader.read_u8()?;
			let end = control == CHUNK_END;
			if !end && control != CHUNK_CONTINUE {
				current += 1;
			}
			if frames.len() <= current {
				frames.resize(current + 1, Vec::new());
			}
			reader.pad()?;

			if end {
				return Ok(());
			}
		}
	}

	fn compute_areas(&self, animation: &mut Animation) {
		animation.width = 0;
		animation.height = 0;
		animation.frame_areas.clear();

		for chunks in &animation.frames {
			let mut area = Rect::empty_area();
			for chunk in chunks {
				let Some(coords) = self.coordinates(chunk.layer, chunk.part) else {
					continue;
				};
				let left = chunk.x;
				let top = chunk.y;
				let right = left.wrapping_add(coords.width() as i16).wrapping_sub(1);
				let bottom = top.wrapping_add(coords.height() as i16).wrapping_sub(1);
				area = area.union(&Rect::new(left, top, right, bottom));
			}

			if area.is_valid() {
				animation.width = animation.width.max(area.width());
				animation.height = animation.height.max(area.height());
			}
			animation.frame_areas.push(area);
		}
	}

	/// Name the file was opened with.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Number of animations.
	pub fn animation_count(&self) -> usize {
		self.animations.len()
	}

	/// All animations.
	pub fn animations(&self) -> &[Animation] {
		&self.animations
	}

	/// One animation, `None` out of range.
	pub fn animation(&self, animation: u16) -> Option<&Animation> {
		self.animations.get(usize::from(animation))
	}

	/// Layer slots; a slot is `None` if its files were missing.
	pub fn layers(&self) -> &[Option<cmp::File>] {
		&self.layers
	}

	/// Largest frame area over all animations.
	pub fn max_size(&self) -> (u16, u16) {
		(self.max_width, self.max_height)
	}

	/// Coordinates of a layer part, `None` if the layer or part does not exist.
	pub fn coordinates(&self, layer: u16, part: u16) -> Option<super::rxy::Coordinates> {
		self.layers.get(usize::from(layer))?.as_ref()?.coordinates(part)
	}

	/// Draws one frame with the animation origin at `(x, y)`.
	pub fn draw(&self, dest: &mut Surface, animation: u16, frame: u16, x: i16, y: i16) {
		let Some(anim) = self.animation(animation) else {
			return;
		};
		let Some(chunks) = anim.frames.get(usize::from(frame)) else {
			return;
		};

		let transp = if anim.transp { 0 } else { -1 };
		for chunk in chunks {
			self.draw_layer(
				dest,
				chunk.layer,
				chunk.part,
				x.wrapping_add(chunk.x),
				y.wrapping_add(chunk.y),
				transp,
			);
		}
	}

	/// Draws a single layer part.
	pub fn draw_layer(&self, dest: &mut Surface, layer: u16, part: u16, x: i16, y: i16, transp: i32) {
		if let Some(Some(layer)) = self.layers.get(usize::from(layer)) {
			layer.draw(dest, part, x, y, transp);
		}
	}
}

#[cfg(test)]
mod tests;
