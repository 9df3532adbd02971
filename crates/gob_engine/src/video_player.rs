//! Table of open videos and the frame loop that plays them.
//!
//! Slot 0 holds the primary video, which renders through [`Draw`] onto the
//! screen. The other slots render into surfaces of their own that callers
//! copy from with [`VideoPlayer::copy_frame`].

use std::path::Path;

use gob_types::file::{FileType, GobFileError, Whence};
use gob_types::graphics::Surface;
use gob_vfs::Resources;

use crate::config::EngineConfig;
use crate::display::Display;
use crate::draw::Draw;
use crate::error::EngineError;
use crate::imd_player::{ImdPlayer, OpenFlags, PaletteCommand};
use crate::input::InputPoll;
use crate::pacer::FramePacer;
use crate::pal_anim::PalAnim;

/// Number of video slots.
pub const SLOT_COUNT: usize = 32;

/// Slot of the video shown on screen.
pub const PRIMARY_SLOT: usize = 0;

/// How [`VideoPlayer::play`] runs a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayProperties {
	/// Horizontal position override for the primary video
	pub x: Option<i16>,
	/// Vertical position override for the primary video
	pub y: Option<i16>,
	/// Open options
	pub flags: OpenFlags,
	/// First frame to play, the current frame if unset.
	///
	/// Advanced while playing, so a non-blocking caller resumes where the
	/// last call stopped.
	pub start_frame: Option<u16>,
	/// Last frame to play, the final one if unset
	pub last_frame: Option<u16>,
	/// Frame to seek to when playback is cancelled, `last_frame` if unset
	pub end_frame: Option<u16>,
	/// Key that cancels playback
	pub break_key: Option<u16>,
	/// Palette command
	pub pal_cmd: PaletteCommand,
	/// First palette entry the command copies, `-1` for all
	pub pal_start: i16,
	/// Last palette entry the command copies, `-1` for all
	pub pal_end: i16,
	/// Frame the palette command runs on, `-1` for none
	pub pal_frame: i16,
	/// Fade the screen to black before the first frame
	pub fade: bool,
	/// Play a single frame per call
	pub no_block: bool,
	/// Keep the frame rate
	pub wait_end_frame: bool,
	/// Set when the last call was cancelled
	pub canceled: bool,
}

impl Default for PlayProperties {
	fn default() -> Self {
		Self {
			x: None,
			y: None,
			flags: OpenFlags::empty(),
			start_frame: None,
			last_frame: None,
			end_frame: None,
			break_key: None,
			pal_cmd: PaletteCommand::default(),
			pal_start: -1,
			pal_end: -1,
			pal_frame: -1,
			fade: false,
			no_block: false,
			wait_end_frame: true,
			canceled: false,
		}
	}
}

#[derive(Debug)]
struct Slot {
	name: String,
	player: ImdPlayer,
	surface: Option<Surface>,
}

/// Owns every open video.
#[derive(Debug)]
pub struct VideoPlayer {
	slots: Vec<Option<Slot>>,
	pacer: FramePacer,
	pal_anim: PalAnim,
}

impl Default for VideoPlayer {
	fn default() -> Self {
		Self::new(&EngineConfig::default())
	}
}

impl VideoPlayer {
	/// Creates an empty slot table with pacing and fading from `config`.
	pub fn new(config: &EngineConfig) -> Self {
		Self {
			slots: (0..SLOT_COUNT).map(|_| None).collect(),
			pacer: FramePacer::new(config.frame_rate, config.speed_factor),
			pal_anim: PalAnim::new(config.fade_step),
		}
	}

	/// Frame pacer shared by all slots.
	pub fn pacer(&self) -> &FramePacer {
		&self.pacer
	}

	/// Mutable frame pacer.
	pub fn pacer_mut(&mut self) -> &mut FramePacer {
		&mut self.pacer
	}

	/// Palette fader used for fading videos.
	pub fn pal_anim(&self) -> &PalAnim {
		&self.pal_anim
	}

	/// Opens a video and returns its slot.
	///
	/// A name without extension gets `.IMD`. The primary video always goes to
	/// [`PRIMARY_SLOT`]; others reuse the slot of an open video with the same
	/// name or take the first free one.
	pub fn open(
		&mut self,
		resources: &dyn Resources,
		primary: bool,
		name: &str,
		props: &PlayProperties,
	) -> Result<usize, EngineError> {
		let name = video_file_name(name)?;

		let slot = if primary {
			self.close(PRIMARY_SLOT);
			PRIMARY_SLOT
		} else {
			if let Some(slot) = self.find(&name) {
				log::trace!("Video \"{name}\" already open in slot {slot}");
				return Ok(slot);
			}
			(PRIMARY_SLOT + 1..SLOT_COUNT).find(|&slot| self.slots[slot].is_none()).ok_or(EngineError::NoFreeSlot)?
		};

		let mut player = ImdPlayer::new();
		let surface = if primary {
			player.open(resources, &name, props.x, props.y, props.flags)?;
			None
		} else {
			player.open(resources, &name, Some(0), Some(0), props.flags)?;
			let area = player.imd().map(|imd| imd.area()).unwrap_or_default();
			Some(Surface::indexed(area.width.max(0) as u16, area.height.max(0) as u16))
		};

		log::debug!("Opened video \"{name}\" in slot {slot} ({} frames)", player.frame_count());
		self.slots[slot] = Some(Slot {
			name,
			player,
			surface,
		});
		Ok(slot)
	}

	fn find(&self, name: &str) -> Option<usize> {
		(PRIMARY_SLOT + 1..SLOT_COUNT)
			.find(|&slot| self.slots[slot].as_ref().is_some_and(|s| s.name.eq_ignore_ascii_case(name)))
	}

	fn slot(&self, slot: usize) -> Option<&Slot> {
		self.slots.get(slot)?.as_ref()
	}

	fn slot_mut(&mut self, slot: usize) -> Result<&mut Slot, EngineError> {
		self.slots.get_mut(slot).and_then(Option::as_mut).ok_or(EngineError::InvalidSlot(slot))
	}

	/// Closes one video.
	pub fn close(&mut self, slot: usize) {
		if let Some(entry) = self.slots.get_mut(slot)
			&& let Some(closed) = entry.take()
		{
			log::trace!("Closed video \"{}\" in slot {slot}", closed.name);
		}
	}

	/// Closes every video.
	pub fn close_all(&mut self) {
		for slot in 0..SLOT_COUNT {
			self.close(slot);
		}
	}

	/// Whether `slot` holds an open video.
	pub fn is_open(&self, slot: usize) -> bool {
		self.slot(slot).is_some()
	}

	/// File name of the video in a slot.
	pub fn name(&self, slot: usize) -> Option<&str> {
		self.slot(slot).map(|s| s.name.as_str())
	}

	/// Next frame of the video in a slot.
	pub fn current_frame(&self, slot: usize) -> Option<u16> {
		self.slot(slot).map(|s| s.player.current_frame())
	}

	/// Frame count of the video in a slot.
	pub fn frame_count(&self, slot: usize) -> Option<u16> {
		self.slot(slot).map(|s| s.player.frame_count())
	}

	/// Surface a secondary video renders into.
	pub fn slot_surface(&self, slot: usize) -> Option<&Surface> {
		self.slot(slot)?.surface.as_ref()
	}

	/// Plays frames of a video.
	///
	/// Returns `Ok(true)` if every requested frame was shown and `Ok(false)`
	/// if nothing was played or the user cancelled with the break key or by
	/// quitting. A cancelled video is left at `end_frame`.
	pub fn play<D: Display>(
		&mut self,
		slot: usize,
		props: &mut PlayProperties,
		draw: &mut Draw<D>,
		input: &mut dyn InputPoll,
	) -> Result<bool, EngineError> {
		let primary = slot == PRIMARY_SLOT;
		let (pacer, pal_anim) = (&mut self.pacer, &self.pal_anim);
		let Some(Some(entry)) = self.slots.get_mut(slot) else {
			return Err(EngineError::InvalidSlot(slot));
		};

		let count = entry.player.frame_count();
		if count == 0 {
			return Ok(false);
		}

		let start = props.start_frame.unwrap_or_else(|| entry.player.current_frame());
		let last = props.last_frame.map_or(count - 1, |last| last.min(count - 1));
		let end_frame = props.end_frame.unwrap_or(last);
		props.canceled = false;

		if start > last {
			return Ok(false);
		}

		if primary && props.fade && !pal_anim.fade(draw, input, None, 0) {
			props.canceled = true;
			return Ok(false);
		}

		pacer.start_frame(input);

		for frame in start..=last {
			if primary {
				entry.player.play(
					frame as i16,
					props.pal_cmd,
					props.pal_start,
					props.pal_end,
					props.pal_frame,
					last as i16,
					draw,
					pal_anim,
					input,
				)?;
			} else {
				entry.player.view(entry.surface.as_mut(), frame)?;
			}
			props.start_frame = Some(frame + 1);

			let mut state = input.process_input();
			if props.wait_end_frame && !state.quit {
				let waited = pacer.wait_end_frame(input);
				state.quit |= waited.quit;
				state.key = state.key.or(waited.key);
			}

			if state.quit || (props.break_key.is_some() && state.key == props.break_key) {
				log::debug!("Video \"{}\" cancelled on frame {frame}", entry.name);
				props.canceled = true;
				break;
			}

			if props.no_block {
				break;
			}
		}

		if props.canceled {
			if let Err(e) = entry.player.seek_frame(i32::from(end_frame), Whence::Set) {
				log::warn!("Cannot seek video \"{}\" to frame {end_frame}: {e}", entry.name);
			}
			return Ok(false);
		}

		Ok(true)
	}

	/// Copies part of a secondary video's current picture.
	///
	/// Returns `false` if the slot has no surface of its own.
	#[allow(clippy::too_many_arguments)]
	pub fn copy_frame(
		&self,
		slot: usize,
		dest: &mut Surface,
		left: i16,
		top: i16,
		right: i16,
		bottom: i16,
		x: i16,
		y: i16,
		transp: i32,
	) -> bool {
		let Some(surface) = self.slot_surface(slot) else {
			return false;
		};
		dest.blit(surface, left, top, right, bottom, x, y, transp);
		true
	}

	/// Seeks the video in a slot.
	pub fn seek_frame(&mut self, slot: usize, frame: i32, whence: Whence) -> Result<(), EngineError> {
		self.slot_mut(slot)?.player.seek_frame(frame, whence)
	}
}

/// Checks the container type and adds the default extension.
fn video_file_name(name: &str) -> Result<String, EngineError> {
	match Path::new(name).extension().and_then(|ext| ext.to_str()) {
		Some(ext) if ext.eq_ignore_ascii_case("vmd") => Err(GobFileError::UnsupportedFeature {
			file_type: FileType::Vmd,
			feature: "VMD containers",
		}
		.into()),
		Some(_) => Ok(name.to_string()),
		None => Ok(format!("{name}.IMD")),
	}
}
