//! This module is separated into its own crate to enable simple dynamic linking for `gob`, and should not be used directly.

/// `use gob::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use gob_engine;
pub use gob_types;
pub use gob_vfs;

// Re-export commonly used types at crate root
pub use gob_engine::{AniObject, Draw, EngineConfig, EngineError, PlayProperties, Video, VideoPlayer};
pub use gob_types::file::{AniFile, CmpFile, DecFile, GobFileError, ImdFile, RxyFile};
pub use gob_vfs::{DirectoryArchive, MemoryArchive, Resources};
