//! Endian-aware byte cursor used by the format loaders.
//!
//! Gob data files come in two flavours: the usual little-endian files and
//! big-endian variants (Amiga/Atari/Mac ports) which additionally pad single
//! byte fields and odd-length names to even sizes. The reader carries both
//! choices at runtime so that one loader serves both variants.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::file::{FileType, GobFileError};

/// Byte order of multi-byte fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
	/// Least significant byte first (PC data)
	#[default]
	Little,
	/// Most significant byte first (alternate `_`-prefixed data)
	Big,
}

/// Cursor over a byte slice with runtime byte order and optional padding.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
	cursor: Cursor<&'a [u8]>,
	endian: Endian,
	padding: bool,
	file_type: FileType,
}

impl<'a> ByteReader<'a> {
	/// Creates a little-endian reader without padding.
	pub fn new(data: &'a [u8], file_type: FileType) -> Self {
		Self {
			cursor: Cursor::new(data),
			endian: Endian::Little,
			padding: false,
			file_type,
		}
	}

	/// Sets the byte order.
	pub fn with_endian(mut self, endian: Endian) -> Self {
		self.endian = endian;
		self
	}

	/// Enables or disables even-size padding.
	pub fn with_padding(mut self, padding: bool) -> Self {
		self.padding = padding;
		self
	}

	/// Returns the byte order in use.
	pub fn endian(&self) -> Endian {
		self.endian
	}

	/// Returns `true` if padding bytes are skipped.
	pub fn has_padding(&self) -> bool {
		self.padding
	}

	/// Current offset from the start of the data.
	pub fn position(&self) -> usize {
		self.cursor.position() as usize
	}

	/// Total length of the data.
	pub fn len(&self) -> usize {
		self.cursor.get_ref().len()
	}

	/// Returns `true` if the underlying data is empty.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Bytes left to read.
	pub fn remaining(&self) -> usize {
		self.len().saturating_sub(self.position())
	}

	/// Moves the cursor to an absolute offset.
	pub fn seek(&mut self, offset: usize) -> Result<(), GobFileError> {
		if offset > self.len() {
			return Err(self.eof("seek target"));
		}
		self.cursor.set_position(offset as u64);
		Ok(())
	}

	/// Skips `count` bytes.
	pub fn skip(&mut self, count: usize) -> Result<(), GobFileError> {
		if count > self.remaining() {
			return Err(self.eof("skipped bytes"));
		}
		self.cursor.set_position((self.position() + count) as u64);
		Ok(())
	}

	/// Skips one byte if the data is padded.
	pub fn pad(&mut self) -> Result<(), GobFileError> {
		if self.padding {
			self.skip(1)?;
		}
		Ok(())
	}

	/// Returns the next byte without consuming it.
	pub fn peek_u8(&self) -> Option<u8> {
		self.cursor.get_ref().get(self.position()).copied()
	}

	/// Reads an unsigned byte.
	pub fn read_u8(&mut self) -> Result<u8, GobFileError> {
		self.cursor.read_u8().map_err(|_| self.eof("u8"))
	}

	/// Reads a signed byte.
	pub fn read_i8(&mut self) -> Result<i8, GobFileError> {
		self.cursor.read_i8().map_err(|_| self.eof("i8"))
	}

	/// Reads an unsigned 16-bit word in the reader's byte order.
	pub fn read_u16(&mut self) -> Result<u16, GobFileError> {
		let value = match self.endian {
			Endian::Little => self.cursor.read_u16::<LittleEndian>(),
			Endian::Big => self.cursor.read_u16::<BigEndian>(),
		};
		value.map_err(|_| self.eof("u16"))
	}

	/// Reads a signed 16-bit word in the reader's byte order.
	pub fn read_i16(&mut self) -> Result<i16, GobFileError> {
		let value = match self.endian {
			Endian::Little => self.cursor.read_i16::<LittleEndian>(),
			Endian::Big => self.cursor.read_i16::<BigEndian>(),
		};
		value.map_err(|_| self.eof("i16"))
	}

	/// Reads an unsigned 32-bit word in the reader's byte order.
	pub fn read_u32(&mut self) -> Result<u32, GobFileError> {
		let value = match self.endian {
			Endian::Little => self.cursor.read_u32::<LittleEndian>(),
			Endian::Big => self.cursor.read_u32::<BigEndian>(),
		};
		value.map_err(|_| self.eof("u32"))
	}

	/// Reads `count` raw bytes.
	pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], GobFileError> {
		if count > self.remaining() {
			return Err(self.eof("byte block"));
		}
		let start = self.position();
		let data: &'a [u8] = self.cursor.get_ref();
		self.cursor.set_position((start + count) as u64);
		Ok(&data[start..start + count])
	}

	/// Reads a fixed-width field holding a NUL-terminated string.
	///
	/// The full `width` bytes are consumed regardless of where the string ends.
	pub fn read_fixed_string(&mut self, width: usize) -> Result<String, GobFileError> {
		let mut field = vec![0u8; width];
		self.cursor.read_exact(&mut field).map_err(|_| self.eof("string field"))?;
		let end = field.iter().position(|&b| b == 0).unwrap_or(width);
		Ok(field[..end].iter().map(|&b| b as char).collect())
	}

	fn eof(&self, context: &'static str) -> GobFileError {
		GobFileError::UnexpectedEof {
			file_type: self.file_type,
			offset: self.position(),
			context,
		}
	}
}
