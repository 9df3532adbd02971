//! Prelude module for `gob_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use gob_internal::prelude::*;
//!
//! let archive = MemoryArchive::new();
//! assert!(!archive.has_file("INTRO.IMD"));
//!
//! let display = MemoryDisplay::new(320, 200);
//! let mut draw = Draw::new(Video::new(display, 320, 200));
//! draw.invalidate_rect(0, 0, 15, 15);
//! assert_eq!(draw.invalidated().len(), 1);
//! ```

// Re-export everything from gob_types::prelude
#[doc(inline)]
pub use gob_types::prelude::*;

// Engine types
#[doc(inline)]
pub use gob_engine::{
	AniMode, AniObject, Display, Draw, EngineConfig, EngineError, FramePacer, ImdPlayer, InputPoll, InputState,
	MemoryDisplay, OpenFlags, PRIMARY_SLOT, PalAnim, PaletteCommand, PlayProperties, SLOT_COUNT, SimulatedInput,
	SystemClock, Video, VideoPlayer,
};

// Resource access
#[doc(inline)]
pub use gob_vfs::{DirectoryArchive, MemoryArchive, Resources};

// Re-export the member crates for advanced usage
#[doc(inline)]
pub use gob_engine;
#[doc(inline)]
pub use gob_types;
