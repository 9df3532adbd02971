//! Playback of one IMD video with palette synchronisation.

use gob_types::file::{ImdFile, ImdFrameFlags, ImdFrameResult, Whence};
use gob_types::graphics::{Palette, Rect, Surface};
use gob_vfs::Resources;

use crate::display::Display;
use crate::draw::Draw;
use crate::error::EngineError;
use crate::input::InputPoll;
use crate::pal_anim::PalAnim;

/// Fade step used by palette commands.
const COMMAND_FADE: i16 = -2;

/// Options for [`ImdPlayer::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenFlags(u16);

impl OpenFlags {
	/// Palette chunks in the video go straight to the display.
	pub const SET_PALETTE: Self = Self(0x0001);

	/// No flags.
	pub const fn empty() -> Self {
		Self(0)
	}

	/// Wraps raw flag bits.
	pub const fn from_bits(bits: u16) -> Self {
		Self(bits)
	}

	/// Raw flag bits.
	pub const fn bits(self) -> u16 {
		self.0
	}

	/// Whether all bits of `other` are set.
	pub const fn contains(self, other: Self) -> bool {
		self.0 & other.0 == other.0
	}
}

/// When and how the video palette becomes visible.
///
/// Only the low six bits are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaletteCommand(u16);

impl PaletteCommand {
	/// Fade to the current palette
	pub const FADE: Self = Self(2);
	/// Copy the video palette, then fade to it
	pub const COPY_AND_FADE: Self = Self(4);
	/// Copy the video palette and set it at once
	pub const SET: Self = Self(8);
	/// Copy the video palette and cross-fade the whole screen
	pub const CROSS_FADE: Self = Self(16);

	/// Wraps a raw command, keeping the known bits.
	pub const fn new(bits: u16) -> Self {
		Self(bits & 0x3F)
	}

	/// Raw command bits.
	pub const fn bits(self) -> u16 {
		self.0
	}

	/// Returns `true` for commands that copy the video palette.
	pub const fn copies_palette(self) -> bool {
		self.0 >= Self::COPY_AND_FADE.0
	}

	/// Returns `true` for commands ending in a palette fade.
	pub const fn is_fade(self) -> bool {
		self.0 == Self::FADE.0 || self.0 == Self::COPY_AND_FADE.0
	}
}

/// An IMD player slot.
#[derive(Debug, Default)]
pub struct ImdPlayer {
	imd: Option<ImdFile>,
	flags: OpenFlags,
}

impl ImdPlayer {
	/// A player with no video loaded.
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens a video, replacing the current one.
	///
	/// `x` and `y` move the video away from the position in its header.
	pub fn open(
		&mut self,
		resources: &dyn Resources,
		name: &str,
		x: Option<i16>,
		y: Option<i16>,
		flags: OpenFlags,
	) -> Result<(), EngineError> {
		self.close();

		let mut imd = ImdFile::open(resources, name)?;
		let area = imd.area();
		imd.set_position(x.unwrap_or(area.x), y.unwrap_or(area.y));

		self.imd = Some(imd);
		self.flags = flags;
		Ok(())
	}

	/// Closes the video.
	pub fn close(&mut self) {
		self.imd = None;
		self.flags = OpenFlags::empty();
	}

	/// Whether a video is loaded.
	pub fn is_open(&self) -> bool {
		self.imd.is_some()
	}

	/// The loaded video.
	pub fn imd(&self) -> Option<&ImdFile> {
		self.imd.as_ref()
	}

	/// Flags given to [`open`](Self::open).
	pub fn flags(&self) -> OpenFlags {
		self.flags
	}

	/// Number of frames, `0` without a video.
	pub fn frame_count(&self) -> u16 {
		self.imd.as_ref().map_or(0, ImdFile::frame_count)
	}

	/// Next frame to be decoded, `0` without a video.
	pub fn current_frame(&self) -> u16 {
		self.imd.as_ref().map_or(0, ImdFile::current_frame)
	}

	/// Positions the video at a frame.
	pub fn seek_frame(&mut self, frame: i32, whence: Whence) -> Result<(), EngineError> {
		let imd = self.imd.as_mut().ok_or(EngineError::NoVideo)?;
		Ok(imd.seek_frame(frame, whence)?)
	}

	/// Decodes a frame, rendering it into `dest` if given.
	///
	/// Without a video this reports the end of the stream.
	pub fn view(&mut self, dest: Option<&mut Surface>, frame: u16) -> Result<ImdFrameResult, EngineError> {
		let Some(imd) = self.imd.as_mut() else {
			return Ok(ImdFrameResult {
				flags: ImdFrameFlags::END,
				area: Rect::default(),
			});
		};
		Ok(imd.view(dest, frame)?)
	}

	/// Copies entries `start..=end` of the video palette, everything if either is `-1`.
	pub fn copy_palette(&self, dest: &mut Palette, start: i16, end: i16) {
		let Some(imd) = &self.imd else {
			return;
		};
		if start == -1 || end == -1 {
			dest.clone_from(imd.palette());
		} else {
			dest.copy_range(imd.palette(), start.clamp(0, 255) as u8, end.clamp(0, 255) as u8);
		}
	}

	/// Shows one frame on the screen.
	///
	/// The frame is decoded into the back surface and flushed to the display.
	/// On `pal_frame`, or on `last_frame` for [`PaletteCommand::SET`], the
	/// palette command takes effect. Returns `None` for frames outside
	/// `0..=last_frame` or without a video.
	///
	/// Fading commands leave [`Draw::apply_pal`] unset, so the flush before a
	/// fade does not show the target palette at full brightness.
	#[allow(clippy::too_many_arguments)]
	pub fn play<D: Display>(
		&mut self,
		frame: i16,
		command: PaletteCommand,
		pal_start: i16,
		pal_end: i16,
		pal_frame: i16,
		last_frame: i16,
		draw: &mut Draw<D>,
		pal_anim: &PalAnim,
		input: &mut dyn InputPoll,
	) -> Result<Option<ImdFrameResult>, EngineError> {
		if frame < 0 || frame > last_frame || self.imd.is_none() {
			return Ok(None);
		}

		let modified = frame == pal_frame || (frame == last_frame && command == PaletteCommand::SET);
		if modified {
			if command.copies_palette() {
				self.copy_palette(draw.palette_mut(), pal_start, pal_end);
			}
			draw.set_apply_pal(!command.is_fade() && command != PaletteCommand::CROSS_FADE);
		}

		let result = self.view(Some(draw.back_mut()), frame as u16)?;

		if result.flags.contains(ImdFrameFlags::PALETTE) && self.flags.contains(OpenFlags::SET_PALETTE) {
			self.copy_palette(draw.palette_mut(), -1, -1);
			draw.set_palette();
		}

		if result.flags.contains(ImdFrameFlags::DATA) {
			let area = result.area;
			draw.invalidate_rect(area.left, area.top, area.right, area.bottom);
		}

		if modified && command == PaletteCommand::CROSS_FADE {
			draw.force_blit(false);
			draw.retrace();
			let target = draw.palette().clone();
			if !pal_anim.fade(draw, input, Some(&target), COMMAND_FADE) {
				log::debug!("Cross-fade on frame {frame} interrupted");
			}
			draw.set_no_invalidated(true);
		}

		if modified && command == PaletteCommand::SET {
			draw.set_palette();
		}

		draw.blit_invalidated();
		draw.retrace();

		if modified && command.is_fade() {
			let target = draw.palette().clone();
			if !pal_anim.fade(draw, input, Some(&target), COMMAND_FADE) {
				log::debug!("Palette fade on frame {frame} interrupted");
			}
		}

		Ok(Some(result))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::display::MemoryDisplay;
	use crate::fixtures;
	use crate::input::SimulatedInput;
	use crate::video::Video;
	use gob_types::file::GobFileError;
	use gob_vfs::MemoryArchive;

	fn draw() -> Draw<MemoryDisplay> {
		Draw::new(Video::new(MemoryDisplay::new(320, 200), 320, 200))
	}

	fn archive(frames: &[Vec<u8>]) -> MemoryArchive {
		MemoryArchive::new().with_file("INTRO.IMD", fixtures::imd(8, 4, 4, 2, frames, true))
	}

	fn player(archive: &MemoryArchive, flags: OpenFlags) -> ImdPlayer {
		let mut player = ImdPlayer::new();
		player.open(archive, "INTRO.IMD", None, None, flags).unwrap();
		player
	}

	#[test]
	fn test_palette_command_mask() {
		assert_eq!(PaletteCommand::new(0x48), PaletteCommand::SET);
		assert!(PaletteCommand::SET.copies_palette());
		assert!(!PaletteCommand::FADE.copies_palette());
		assert!(PaletteCommand::COPY_AND_FADE.is_fade());
		assert!(!PaletteCommand::CROSS_FADE.is_fade());
	}

	#[test]
	fn test_open() {
		let archive = archive(&[fixtures::solid(3, 8)]);
		let mut player = ImdPlayer::new();

		let err = player.open(&archive, "MISSING.IMD", None, None, OpenFlags::empty()).unwrap_err();
		assert!(matches!(err, EngineError::File(GobFileError::NotFound { .. })));
		assert!(!player.is_open());

		player.open(&archive, "INTRO.IMD", Some(100), None, OpenFlags::empty()).unwrap();
		let area = player.imd().unwrap().area();
		assert_eq!((area.x, area.y), (100, 4));
		assert_eq!(player.frame_count(), 1);

		player.close();
		assert_eq!(player.frame_count(), 0);
		assert!(matches!(player.seek_frame(0, Whence::Set), Err(EngineError::NoVideo)));
	}

	#[test]
	fn test_view_without_video() {
		let mut player = ImdPlayer::new();
		let result = player.view(None, 0).unwrap();
		assert!(result.flags.contains(ImdFrameFlags::END));
	}

	#[test]
	fn test_copy_palette() {
		let archive = archive(&[fixtures::solid(3, 8)]);
		let player = player(&archive, OpenFlags::empty());

		let mut palette = Palette::new();
		palette.set(0, [1, 1, 1]);
		player.copy_palette(&mut palette, 1, 1);
		assert_eq!(palette.get(0), [1, 1, 1]);
		assert_eq!(palette.get(1), [10, 20, 30]);

		player.copy_palette(&mut palette, -1, 5);
		assert_eq!(palette.get(0), [0, 0, 0]);
	}

	#[test]
	fn test_play_sets_palette() {
		let archive = archive(&[fixtures::solid(1, 8), fixtures::solid(2, 8)]);
		let mut player = player(&archive, OpenFlags::empty());
		let mut draw = draw();
		let mut input = SimulatedInput::new();
		let pal_anim = PalAnim::default();

		let result = player
			.play(0, PaletteCommand::SET, -1, -1, 0, 1, &mut draw, &pal_anim, &mut input)
			.unwrap()
			.unwrap();
		assert_eq!(result.area, Rect::new(8, 4, 11, 5));
		assert_eq!(draw.palette().get(1), [10, 20, 30]);
		assert_eq!(draw.video().display().palette().get(1), [10, 20, 30]);
		assert_eq!(draw.video().display().pixel(8, 4), Some(1));
		assert_eq!(draw.video().display().pixel(11, 5), Some(1));
		assert_eq!(draw.video().display().pixel(12, 5), Some(0));
		assert!(!draw.apply_pal());

		player.play(1, PaletteCommand::SET, -1, -1, 0, 1, &mut draw, &pal_anim, &mut input).unwrap();
		assert_eq!(draw.video().display().pixel(9, 4), Some(2));

		assert_eq!(player.play(2, PaletteCommand::SET, -1, -1, 0, 1, &mut draw, &pal_anim, &mut input).unwrap(), None);
		assert_eq!(input.delayed(), 0);
	}

	#[test]
	fn test_play_fades_in() {
		let archive = archive(&[fixtures::solid(1, 8)]);
		let mut player = player(&archive, OpenFlags::empty());
		let mut draw = draw();
		let mut input = SimulatedInput::new();

		player
			.play(0, PaletteCommand::COPY_AND_FADE, 0, 15, 0, 0, &mut draw, &PalAnim::default(), &mut input)
			.unwrap();

		// Steps of 2 toward 30 on the blue component
		let display = draw.video().display();
		assert_eq!(display.palette().get(1), [10, 20, 30]);
		assert_eq!(display.palette_updates(), 15);
		assert_eq!(display.pixel(8, 4), Some(1));
	}

	#[test]
	fn test_fade_commands_do_not_flush_the_palette() {
		let archive = archive(&[fixtures::solid(1, 8)]);
		let mut player = player(&archive, OpenFlags::empty());
		let mut draw = draw();
		let mut input = SimulatedInput::new();

		player
			.play(0, PaletteCommand::COPY_AND_FADE, 0, 15, 0, 0, &mut draw, &PalAnim::default(), &mut input)
			.unwrap();

		// Only the fade steps reach the display, no clear and set around the flush
		let display = draw.video().display();
		assert!(!draw.apply_pal());
		assert_eq!(display.palette_updates(), 15);
		assert_eq!(display.palette().get(1), [10, 20, 30]);

		// SET pushes the palette once with the flush
		let mut player = self::player(&archive, OpenFlags::empty());
		let mut draw = self::draw();
		player.play(0, PaletteCommand::SET, -1, -1, 0, 0, &mut draw, &PalAnim::default(), &mut input).unwrap();
		assert!(!draw.apply_pal());
		assert!(draw.video().display().palette_updates() < 15);
		assert_eq!(draw.video().display().palette().get(1), [10, 20, 30]);
	}

	#[test]
	fn test_play_other_frames_keep_palette() {
		let archive = archive(&[fixtures::solid(1, 8), fixtures::solid(2, 8)]);
		let mut player = player(&archive, OpenFlags::empty());
		let mut draw = draw();
		let mut input = SimulatedInput::new();

		player.play(0, PaletteCommand::SET, -1, -1, 1, 5, &mut draw, &PalAnim::default(), &mut input).unwrap();
		assert!(draw.palette().is_black());
		assert_eq!(draw.video().display().palette_updates(), 0);
		assert_eq!(draw.video().display().pixel(8, 4), Some(1));
	}

	#[test]
	fn test_palette_chunk_with_set_palette() {
		let frames = [fixtures::with_palette([40, 50, 60], fixtures::solid(1, 8))];
		let archive = archive(&frames);
		let mut draw = draw();
		let mut input = SimulatedInput::new();

		let mut player = player(&archive, OpenFlags::SET_PALETTE);
		let result = player
			.play(0, PaletteCommand::default(), -1, -1, -1, 0, &mut draw, &PalAnim::default(), &mut input)
			.unwrap()
			.unwrap();
		assert!(result.flags.contains(ImdFrameFlags::PALETTE));
		assert_eq!(draw.palette().get(1), [40, 50, 60]);
		assert_eq!(draw.video().display().palette().get(1), [40, 50, 60]);

		// Without the flag the palette only reaches the video
		let mut draw = self::draw();
		let mut player = self::player(&archive, OpenFlags::empty());
		player
			.play(0, PaletteCommand::default(), -1, -1, -1, 0, &mut draw, &PalAnim::default(), &mut input)
			.unwrap();
		assert!(draw.palette().is_black());
		assert_eq!(player.imd().unwrap().palette().get(1), [40, 50, 60]);
	}

	#[test]
	fn test_cross_fade() {
		let archive = archive(&[fixtures::solid(1, 8)]);
		let mut player = player(&archive, OpenFlags::empty());
		let mut draw = draw();
		let mut input = SimulatedInput::new();

		player
			.play(0, PaletteCommand::CROSS_FADE, -1, -1, 0, 0, &mut draw, &PalAnim::default(), &mut input)
			.unwrap();
		assert_eq!(draw.video().display().palette().get(1), [10, 20, 30]);
		assert_eq!(draw.video().display().pixel(10, 5), Some(1));
		assert!(draw.no_invalidated());
	}
}
