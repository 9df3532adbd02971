//! Byte order selection for layered animation files.
//!
//! The formats carry no magic number, so byte order is chosen by file name.
//! Big-endian ports ship their files under the same name with the first
//! character replaced by `_`, and those files also pad byte fields and
//! names to even sizes.

use gob_vfs::Resources;
use serde::{Deserialize, Serialize};

use crate::reader::Endian;

/// How the byte order of ANI/DEC files is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndiannessMethod {
	/// Always little-endian
	Little,
	/// Always big-endian with padding
	Big,
	/// Little-endian, unless only the `_`-prefixed alternate file exists
	#[default]
	AltFile,
}

/// A file found by [`probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probed {
	/// Name of the file that was actually read
	pub name: String,
	/// File contents
	pub data: Vec<u8>,
	/// Byte order to read it with
	pub endian: Endian,
}

impl Probed {
	/// Big-endian files pad byte fields to even size.
	pub fn has_padding(&self) -> bool {
		self.endian == Endian::Big
	}
}

/// Returns `name` with its first character replaced by `_`.
pub fn alternate_name(name: &str) -> Option<String> {
	let mut chars = name.chars();
	chars.next()?;
	Some(format!("_{}", chars.as_str()))
}

/// Looks up `name`, falling back to its big-endian alternate.
///
/// Returns `None` if neither file exists.
pub fn probe(resources: &dyn Resources, name: &str, method: EndiannessMethod) -> Option<Probed> {
	let mut endian = Endian::Little;
	let mut file_name = name.to_string();

	match method {
		EndiannessMethod::AltFile if !resources.has_file(name) => {
			if let Some(alternate) = alternate_name(name).filter(|alt| resources.has_file(alt)) {
				endian = Endian::Big;
				file_name = alternate;
			}
		}
		EndiannessMethod::Big => endian = Endian::Big,
		EndiannessMethod::Little | EndiannessMethod::AltFile => {}
	}

	if let Some(data) = resources.get_file(&file_name) {
		return Some(Probed {
			name: file_name,
			data,
			endian,
		});
	}

	// The primary file is gone, try the big-endian alternate regardless of method
	let alternate = alternate_name(name)?;
	let data = resources.get_file(&alternate)?;
	log::debug!("Using big-endian alternate \"{alternate}\" for \"{name}\"");
	Some(Probed {
		name: alternate,
		data,
		endian: Endian::Big,
	})
}

/// Strips the extension from a file name (`"FOO.LBM"` becomes `"FOO"`).
pub fn base_name(name: &str) -> &str {
	match name.rfind('.') {
		Some(dot) => &name[..dot],
		None => name,
	}
}
