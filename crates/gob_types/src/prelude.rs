//! Prelude module for `gob_types`.
//!
//! # Examples
//!
//! ```no_run
//! use gob_types::prelude::*;
//!
//! let mut screen = Surface::indexed(320, 200);
//! screen.fill_rect(0, 0, 15, 15, 4);
//! let palette = Palette::new();
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	AniFile,
	Animation,
	CmpFile,
	Coordinates,
	DecFile,

	EndiannessMethod,
	FileType,
	GobFileError,

	// IMD types
	ImdFile,
	ImdFrameFlags,
	ImdFrameResult,
	ImdHeader,

	RxyFile,
	Whence,
};

// Graphics types
#[doc(inline)]
pub use crate::graphics::{Font, Palette, Rect, Surface, draw_packed_sprite};

// Codecs
#[doc(inline)]
pub use crate::codec::{Lz77Mode, uncompress_sprite};

#[doc(inline)]
pub use crate::reader::{ByteReader, Endian};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
