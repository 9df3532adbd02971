//! Error type for the runtime.

use gob_types::file::GobFileError;
use gob_vfs::VfsError;
use thiserror::Error;

/// Errors raised by the runtime.
#[derive(Debug, Error)]
pub enum EngineError {
	/// A file could not be parsed or decoded
	#[error(transparent)]
	File(#[from] GobFileError),

	/// The resource archive could not be opened
	#[error(transparent)]
	Vfs(#[from] VfsError),

	/// The configuration could not be loaded
	#[error("configuration error: {0}")]
	Config(#[from] config::ConfigError),

	/// No video is open
	#[error("no video is open")]
	NoVideo,

	/// Every video slot is in use
	#[error("no free video slot")]
	NoFreeSlot,

	/// A video slot index out of range or empty
	#[error("invalid video slot {0}")]
	InvalidSlot(usize),
}
