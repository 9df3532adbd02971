//! Resource archive access for `gob-rs`.
//!
//! Game data is addressed by DOS-style file names (`"TOT01.ANI"`, `"IMD_INTR.IMD"`, ...).
//! Lookups are case-insensitive, like the DOS file systems the games shipped on.
//!
//! Two archives are provided:
//! - [`MemoryArchive`]: files held in memory, used by tools and tests
//! - [`DirectoryArchive`]: files read from a directory on disk
//!
//! Everything above this crate only talks to the [`Resources`] trait.

use std::{
	collections::HashMap,
	fs,
	io::{self, BufReader, Cursor, Read, Seek},
	path::{Path, PathBuf},
	sync::Arc,
};

use thiserror::Error;

/// Errors raised while setting up an archive
#[derive(Debug, Error)]
pub enum VfsError {
	/// The archive root is not a directory
	#[error("Not a directory: {0}")]
	NotADirectory(PathBuf),

	/// IO error
	#[error(transparent)]
	IOError(#[from] io::Error),
}

/// A readable, seekable data stream handed out by [`Resources::open_data`].
pub trait DataStream: Read + Seek {}

impl<T: Read + Seek> DataStream for T {}

/// Read access to the game's resource files.
pub trait Resources {
	/// Returns `true` if a file with that name exists.
	fn has_file(&self, name: &str) -> bool;

	/// Reads a whole file into memory, or `None` if it does not exist.
	fn get_file(&self, name: &str) -> Option<Vec<u8>>;

	/// Opens a file as a seekable stream, or `None` if it does not exist.
	fn open_data(&self, name: &str) -> Option<Box<dyn DataStream>>;
}

/// Normalizes a file name for lookup.
pub fn normalize_name(name: &str) -> String {
	name.trim().to_ascii_uppercase()
}

/// An archive whose files live in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
	files: HashMap<String, Arc<[u8]>>,
}

impl MemoryArchive {
	/// Creates an empty archive.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds (or replaces) a file.
	pub fn insert(&mut self, name: &str, data: impl Into<Vec<u8>>) {
		let data: Vec<u8> = data.into();
		self.files.insert(normalize_name(name), Arc::from(data));
	}

	/// Builder-style variant of [`MemoryArchive::insert`].
	pub fn with_file(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
		self.insert(name, data);
		self
	}

	/// Removes a file, returning `true` if it was present.
	pub fn remove(&mut self, name: &str) -> bool {
		self.files.remove(&normalize_name(name)).is_some()
	}

	/// Number of files in the archive.
	pub fn len(&self) -> usize {
		self.files.len()
	}

	/// Returns `true` if the archive holds no files.
	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}
}

impl Resources for MemoryArchive {
	fn has_file(&self, name: &str) -> bool {
		self.files.contains_key(&normalize_name(name))
	}

	fn get_file(&self, name: &str) -> Option<Vec<u8>> {
		self.files.get(&normalize_name(name)).map(|data| data.to_vec())
	}

	fn open_data(&self, name: &str) -> Option<Box<dyn DataStream>> {
		let data = self.files.get(&normalize_name(name))?;
		Some(Box::new(Cursor::new(Arc::clone(data))))
	}
}

/// An archive backed by a directory of loose files.
///
/// The directory listing is taken once at construction so that lookups can
/// ignore case without touching the filesystem.
#[derive(Debug, Clone)]
pub struct DirectoryArchive {
	root: PathBuf,
	entries: HashMap<String, PathBuf>,
}

impl DirectoryArchive {
	/// Indexes the files directly under `root`.
	pub fn open(root: impl AsRef<Path>) -> Result<Self, VfsError> {
		let root = root.as_ref().to_path_buf();
		if !root.is_dir() {
			return Err(VfsError::NotADirectory(root));
		}

		let mut entries = HashMap::new();
		for entry in fs::read_dir(&root)? {
			let entry = entry?;
			if !entry.file_type()?.is_file() {
				continue;
			}
			if let Some(name) = entry.file_name().to_str() {
				entries.insert(normalize_name(name), entry.path());
			}
		}

		log::debug!("Indexed {} files under {}", entries.len(), root.display());

		Ok(Self {
			root,
			entries,
		})
	}

	/// Returns the directory this archive was opened on.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Number of indexed files.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if no files were indexed.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl Resources for DirectoryArchive {
	fn has_file(&self, name: &str) -> bool {
		self.entries.contains_key(&normalize_name(name))
	}

	fn get_file(&self, name: &str) -> Option<Vec<u8>> {
		let path = self.entries.get(&normalize_name(name))?;
		match fs::read(path) {
			Ok(data) => Some(data),
			Err(e) => {
				log::warn!("Failed to read {}: {}", path.display(), e);
				None
			}
		}
	}

	fn open_data(&self, name: &str) -> Option<Box<dyn DataStream>> {
		let path = self.entries.get(&normalize_name(name))?;
		match fs::File::open(path) {
			Ok(file) => Some(Box::new(BufReader::new(file))),
			Err(e) => {
				log::warn!("Failed to open {}: {}", path.display(), e);
				None
			}
		}
	}
}
