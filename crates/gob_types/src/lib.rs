//! Core data types, codecs and file formats for the `gob-rs` project.
//!
//! # File Formats
//!
//! - **RXY**: coordinate tables addressing parts of a sprite sheet
//! - **CMP**: packed or LZ-compressed sprite sheets, paired with an RXY table
//! - **ANI**: layered animations composed from CMP/RXY layers
//! - **DEC**: static backdrops with decals placed from CMP/RXY layers
//! - **IMD**: video containers with LZ77/RLE compressed frames
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use gob_types::prelude::*;
//! use gob_vfs::DirectoryArchive;
//!
//! let archive = DirectoryArchive::open("data").unwrap();
//! let ani = AniFile::open(&archive, "WALK.ANI", 320, 1, EndiannessMethod::AltFile);
//!
//! let mut screen = Surface::indexed(320, 200);
//! ani.draw(&mut screen, 0, 0, 10, 10);
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use gob_types::file::{ImdFile, Whence};
//!
//! let mut imd = ImdFile::from_bytes(std::fs::read("INTRO.IMD").unwrap()).unwrap();
//! imd.seek_frame(1, Whence::Set).unwrap();
//! ```

pub mod codec;
pub mod file;
pub mod graphics;
pub mod reader;

/// `use gob_types::prelude::*;` to import commonly used items.
pub mod prelude;
