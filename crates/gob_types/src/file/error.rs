//! Error types for file format parsing and frame decoding.

use std::fmt::Display;

use thiserror::Error;

/// File types handled by this crate, used to tag errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// `.RXY` coordinate tables
	Rxy,
	/// `.CMP` packed sprite sheets
	Cmp,
	/// `.ANI` animation files
	Ani,
	/// `.DEC` backdrop decal files
	Dec,
	/// `.IMD` video containers
	Imd,
	/// `.VMD` video containers
	Vmd,
	/// Raw LZ77 compressed streams
	Lz77,
	/// Bitmap fonts
	Font,
}

impl Display for FileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			FileType::Rxy => "RXY",
			FileType::Cmp => "CMP",
			FileType::Ani => "ANI",
			FileType::Dec => "DEC",
			FileType::Imd => "IMD",
			FileType::Vmd => "VMD",
			FileType::Lz77 => "LZ77",
			FileType::Font => "FONT",
		};
		write!(f, "{name}")
	}
}

/// Unified error type for every format in `gob_types`.
#[derive(Debug, Error)]
pub enum GobFileError {
	/// Not enough data to parse
	#[error("{file_type}: insufficient data, expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// File type being parsed
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// A read ran past the end of the data
	#[error("{file_type}: unexpected end of data at offset {offset} while reading {context}")]
	UnexpectedEof {
		/// File type being parsed
		file_type: FileType,
		/// Offset of the failed read
		offset: usize,
		/// What was being read
		context: &'static str,
	},

	/// The file was not found in the resources
	#[error("{file_type}: no such file \"{name}\"")]
	NotFound {
		/// File type being looked up
		file_type: FileType,
		/// Requested file name
		name: String,
	},

	/// Unknown or obsolete format version
	#[error("{file_type}: unsupported version ({signature}, {version:#06X})")]
	UnsupportedVersion {
		/// File type being parsed
		file_type: FileType,
		/// Leading signature word
		signature: u16,
		/// Version word
		version: u16,
	},

	/// A format feature that is recognised but not implemented
	#[error("{file_type}: unsupported feature: {feature}")]
	UnsupportedFeature {
		/// File type being parsed
		file_type: FileType,
		/// Description of the feature
		feature: &'static str,
	},

	/// Compressed data is inconsistent
	#[error("{file_type}: decompression error: {message}")]
	DecompressionError {
		/// File type being decoded
		file_type: FileType,
		/// Error details
		message: String,
	},

	/// Frame can only be reached by sequential decoding
	#[error("{file_type}: frame {frame} inaccessible without a frame index")]
	FrameInaccessible {
		/// File type being decoded
		file_type: FileType,
		/// Requested frame
		frame: u16,
	},

	/// Frame chunk larger than the frame buffer
	#[error("{file_type}: frame chunk of {size} bytes exceeds buffer of {capacity} bytes")]
	ChunkTooLarge {
		/// File type being decoded
		file_type: FileType,
		/// Chunk size
		size: usize,
		/// Buffer capacity
		capacity: usize,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl GobFileError {
	/// Shorthand for [`GobFileError::InsufficientData`].
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Shorthand for [`GobFileError::DecompressionError`].
	pub fn decompression(file_type: FileType, message: impl Into<String>) -> Self {
		Self::DecompressionError {
			file_type,
			message: message.into(),
		}
	}

	/// Returns `true` for errors that mean "the data is absent" rather than "the data is wrong".
	pub fn is_missing(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}
}
