//! Runtime for the `gob-rs` project: screen flushing, animated objects and
//! video playback.
//!
//! The engine talks to the outside world through three capabilities:
//! [`gob_vfs::Resources`] for game files, [`Display`] for the screen and
//! [`InputPoll`] for input and time. [`MemoryDisplay`] and
//! [`SimulatedInput`] implement the last two without any platform code.
//!
//! # Examples
//!
//! ```no_run
//! use gob_engine::{Draw, EngineConfig, MemoryDisplay, PlayProperties, SystemClock, Video, VideoPlayer};
//! use gob_vfs::DirectoryArchive;
//!
//! let config = EngineConfig::load(None).unwrap();
//! let archive = DirectoryArchive::open("data").unwrap();
//!
//! let display = MemoryDisplay::new(config.screen_width, config.screen_height);
//! let mut draw = Draw::new(Video::new(display, config.screen_width, config.screen_height));
//! let mut videos = VideoPlayer::new(&config);
//! let mut input = SystemClock::new();
//!
//! let mut props = PlayProperties::default();
//! let slot = videos.open(&archive, true, "INTRO", &props).unwrap();
//! videos.play(slot, &mut props, &mut draw, &mut input).unwrap();
//! ```

pub mod ani_object;
pub mod config;
pub mod display;
pub mod draw;
pub mod error;
pub mod imd_player;
pub mod input;
pub mod pacer;
pub mod pal_anim;
pub mod video;
pub mod video_player;

#[cfg(test)]
mod fixtures;

pub use ani_object::{AniObject, Mode as AniMode};
pub use self::config::EngineConfig;
pub use display::{Display, MemoryDisplay};
pub use draw::Draw;
pub use error::EngineError;
pub use imd_player::{ImdPlayer, OpenFlags, PaletteCommand};
pub use input::{InputPoll, InputState, SimulatedInput, SystemClock};
pub use pacer::FramePacer;
pub use pal_anim::PalAnim;
pub use video::Video;
pub use video_player::{PRIMARY_SLOT, PlayProperties, SLOT_COUNT, VideoPlayer};
