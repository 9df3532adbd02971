//! RXY sprite coordinate tables.
//!
//! ## Layout
//!
//! | Offset | Size | Field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 2    | `real_count`                            |
//! | 2      | 8×n  | `left`, `right`, `top`, `bottom` (u16)  |
//!
//! The record count is derived from the file size, `(size - 2) / 8`, and
//! trailing bytes are ignored. A record with `left == 0xFFFF` is a hole in
//! the table. Files shorter than two bytes load as an empty table.

use std::ops::Index;

use gob_vfs::Resources;

use crate::graphics::Rect;
use crate::reader::Endian;

/// `left` value of a part that does not exist.
pub const SENTINEL: u16 = 0xFFFF;

/// Coordinates of one part within a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coordinates {
	/// Leftmost column
	pub left: u16,
	/// Rightmost column (inclusive)
	pub right: u16,
	/// Topmost row
	pub top: u16,
	/// Bottommost row (inclusive)
	pub bottom: u16,
}

impl Coordinates {
	/// Returns `false` for sentinel entries.
	pub fn is_valid(&self) -> bool {
		self.left != SENTINEL
	}

	/// Width of the part.
	pub fn width(&self) -> u16 {
		self.right.wrapping_sub(self.left).wrapping_add(1)
	}

	/// Height of the part.
	pub fn height(&self) -> u16 {
		self.bottom.wrapping_sub(self.top).wrapping_add(1)
	}

	/// The part as a sheet-space rectangle.
	pub fn to_rect(&self) -> Rect {
		Rect::new(self.left as i16, self.top as i16, self.right as i16, self.bottom as i16)
	}
}

/// A table of sprite coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct File {
	real_count: u16,
	width: u16,
	height: u16,
	coordinates: Vec<Coordinates>,
}

impl File {
	/// Parses a little-endian table.
	pub fn from_bytes(data: &[u8]) -> Self {
		Self::from_bytes_with_endian(data, Endian::Little)
	}

	/// Parses a table in the given byte order.
	pub fn from_bytes_with_endian(data: &[u8], endian: Endian) -> Self {
		let word = |bytes: &[u8]| match endian {
			Endian::Little => u16::from_le_bytes([bytes[0], bytes[1]]),
			Endian::Big => u16::from_be_bytes([bytes[0], bytes[1]]),
		};

		let mut file = Self::default();
		if data.len() < 2 {
			return file;
		}

		file.real_count = word(&data[..2]);
		for record in data[2..].chunks_exact(8) {
			let coords = Coordinates {
				left: word(&record[0..2]),
				right: word(&record[2..4]),
				top: word(&record[4..6]),
				bottom: word(&record[6..8]),
			};
			file.grow_extent(&coords);
			file.coordinates.push(coords);
		}

		file
	}

	/// Loads a table through the resources, `None` if the file does not exist.
	pub fn open(resources: &dyn Resources, name: &str) -> Option<Self> {
		let data = resources.get_file(name)?;
		let file = Self::from_bytes(&data);
		log::trace!("RXY \"{name}\": {} parts, {}x{}", file.len(), file.width, file.height);
		Some(file)
	}

	/// Creates a table with a single part covering a `width`×`height` sheet.
	pub fn with_extent(width: u16, height: u16) -> Self {
		let mut file = Self::default();
		file.add(0, 0, width.saturating_sub(1), height.saturating_sub(1));
		file
	}

	/// Appends a part and returns its index.
	pub fn add(&mut self, left: u16, top: u16, right: u16, bottom: u16) -> u16 {
		let coords = Coordinates {
			left,
			right,
			top,
			bottom,
		};
		self.grow_extent(&coords);
		self.coordinates.push(coords);
		self.real_count = self.real_count.saturating_add(1);
		(self.coordinates.len() - 1) as u16
	}

	fn grow_extent(&mut self, coords: &Coordinates) {
		if coords.is_valid() {
			self.width = self.width.max(coords.right.wrapping_add(1));
			self.height = self.height.max(coords.bottom.wrapping_add(1));
		}
	}

	/// Count stored in the header. Not necessarily the number of records.
	pub fn real_count(&self) -> u16 {
		self.real_count
	}

	/// Number of records.
	pub fn len(&self) -> usize {
		self.coordinates.len()
	}

	/// Returns `true` if there are no records.
	pub fn is_empty(&self) -> bool {
		self.coordinates.is_empty()
	}

	/// Width of the sheet spanned by all valid parts.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Height of the sheet spanned by all valid parts.
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Returns a part, or `None` out of range.
	pub fn get(&self, part: u16) -> Option<&Coordinates> {
		self.coordinates.get(usize::from(part))
	}

	/// Iterates over all records, sentinels included.
	pub fn iter(&self) -> std::slice::Iter<'_, Coordinates> {
		self.coordinates.iter()
	}
}

impl Index<u16> for File {
	type Output = Coordinates;

	fn index(&self, part: u16) -> &Self::Output {
		&self.coordinates[usize::from(part)]
	}
}
