//! Engine configuration.
//!
//! Values come from, in increasing priority: the built-in defaults, an
//! optional TOML file and `GOB_`-prefixed environment variables
//! (`GOB_FRAME_RATE=15`).

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, FileFormat};
use gob_types::file::EndiannessMethod;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
	/// Width of the logical screen
	pub screen_width: u16,
	/// Height of the logical screen
	pub screen_height: u16,
	/// How the byte order of ANI/DEC files is picked
	pub endianness: EndiannessMethod,
	/// Frames per second for video playback
	pub frame_rate: u16,
	/// Palette fade step per component
	pub fade_step: u8,
	/// Multiplier applied to the clock by long delays
	pub speed_factor: u32,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			screen_width: 320,
			screen_height: 200,
			endianness: EndiannessMethod::AltFile,
			frame_rate: 12,
			fade_step: 2,
			speed_factor: 1,
		}
	}
}

impl EngineConfig {
	/// Loads the configuration from an optional file and the environment.
	///
	/// A missing file is not an error.
	pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
		let mut builder = Self::builder()?;
		if let Some(path) = path {
			builder = builder.add_source(config::File::from(path).required(false));
		}
		builder = builder.add_source(Environment::with_prefix("GOB").try_parsing(true));

		let config: Self = builder.build()?.try_deserialize()?;
		log::debug!("Loaded configuration: {config:?}");
		Ok(config)
	}

	/// Parses a TOML document on top of the defaults.
	pub fn from_toml(text: &str) -> Result<Self, EngineError> {
		let config = Self::builder()?.add_source(config::File::from_str(text, FileFormat::Toml)).build()?;
		Ok(config.try_deserialize()?)
	}

	fn builder() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
		let defaults = Self::default();
		Config::builder()
			.set_default("screen_width", i64::from(defaults.screen_width))?
			.set_default("screen_height", i64::from(defaults.screen_height))?
			.set_default("endianness", "alt-file")?
			.set_default("frame_rate", i64::from(defaults.frame_rate))?
			.set_default("fade_step", i64::from(defaults.fade_step))?
			.set_default("speed_factor", i64::from(defaults.speed_factor))
	}
}
