//! File format support for Gob game data.

mod error;

pub mod ani;
pub mod cmp;
pub mod dec;
pub mod endian;
pub mod imd;
pub mod rxy;

// Re-export unified error type
pub use error::{FileType, GobFileError};

// Re-export main file types
pub use ani::{Animation, Chunk as AniChunk, File as AniFile};
pub use cmp::File as CmpFile;
pub use dec::{Blit as DecBlit, BlitSource as DecBlitSource, File as DecFile, Part as DecPart};
pub use endian::{EndiannessMethod, probe as probe_endianness};
pub use imd::{
	Area as ImdArea, File as ImdFile, FrameFlags as ImdFrameFlags, FrameResult as ImdFrameResult,
	Header as ImdHeader, Whence,
};
pub use rxy::{Coordinates, File as RxyFile};
