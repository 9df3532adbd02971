//! IMD playback through the video slots

use gob_rs::prelude::*;
use test_log::test;

use crate::builders::{imd, palette_frame, solid_frame};

/// INTRO: a 16×8 video whose first frame carries a palette, then two more
/// solid frames. LOGO: a 4×2 video for a secondary slot.
fn archive() -> MemoryArchive {
	let intro = imd(
		16,
		8,
		&[palette_frame([50, 40, 30], solid_frame(1, 128)), solid_frame(2, 128), solid_frame(3, 128)],
		true,
	);
	let logo = imd(4, 2, &[solid_frame(7, 8), solid_frame(8, 8)], false);

	MemoryArchive::new().with_file("INTRO.IMD", intro).with_file("LOGO.IMD", logo)
}

#[test]
fn test_play_to_the_end() {
	let archive = archive();
	let mut videos = VideoPlayer::new(&EngineConfig::default());
	let mut draw = crate::small_screen();
	let mut input = SimulatedInput::new();
	let mut props = PlayProperties {
		flags: OpenFlags::SET_PALETTE,
		..PlayProperties::default()
	};

	let slot = videos.open(&archive, true, "INTRO", &props).unwrap();
	assert_eq!(slot, PRIMARY_SLOT);
	assert_eq!(videos.frame_count(slot), Some(3));

	assert!(videos.play(slot, &mut props, &mut draw, &mut input).unwrap());

	let display = draw.video().display();
	assert!(display.framebuffer().iter().all(|&p| p == 3));
	assert_eq!(display.palette().get(1), [50, 40, 30]);
	assert_eq!(videos.current_frame(slot), Some(3));
	assert!(!props.canceled);
}

#[test]
fn test_non_blocking_playback_resumes() {
	let archive = archive();
	let mut videos = VideoPlayer::default();
	let mut draw = crate::small_screen();
	let mut input = SimulatedInput::new();
	let mut props = PlayProperties {
		no_block: true,
		wait_end_frame: false,
		..PlayProperties::default()
	};

	videos.open(&archive, true, "INTRO", &props).unwrap();

	for color in 1..=3 {
		assert!(videos.play(PRIMARY_SLOT, &mut props, &mut draw, &mut input).unwrap());
		assert_eq!(draw.video().display().pixel(0, 0), Some(color));
	}
	assert!(!videos.play(PRIMARY_SLOT, &mut props, &mut draw, &mut input).unwrap());
	assert_eq!(input.millis(), 0);
}

#[test]
fn test_break_key_seeks_to_end_frame() {
	let archive = archive();
	let mut videos = VideoPlayer::default();
	let mut draw = crate::small_screen();
	let mut input = SimulatedInput::new().with_key(10, 32);
	let mut props = PlayProperties {
		break_key: Some(32),
		..PlayProperties::default()
	};

	videos.open(&archive, true, "INTRO", &props).unwrap();
	assert!(!videos.play(PRIMARY_SLOT, &mut props, &mut draw, &mut input).unwrap());

	assert!(props.canceled);
	assert_eq!(draw.video().display().pixel(0, 0), Some(1));
	assert_eq!(videos.current_frame(PRIMARY_SLOT), Some(2));
}

#[test]
fn test_secondary_slot_renders_off_screen() {
	let archive = archive();
	let mut videos = VideoPlayer::default();
	let mut draw = crate::small_screen();
	let mut input = SimulatedInput::new();
	let mut props = PlayProperties {
		wait_end_frame: false,
		..PlayProperties::default()
	};

	let slot = videos.open(&archive, false, "LOGO", &props).unwrap();
	assert_ne!(slot, PRIMARY_SLOT);

	assert!(videos.play(slot, &mut props, &mut draw, &mut input).unwrap());
	// The screen is untouched
	assert_eq!(draw.video().display().updates(), 0);

	assert!(videos.copy_frame(slot, draw.back_mut(), 0, 0, 3, 1, 6, 3, -1));
	assert_eq!(draw.back().get_pixel(6, 3), Some(8));
	assert_eq!(draw.back().get_pixel(9, 4), Some(8));
	assert_eq!(draw.back().get_pixel(10, 4), Some(0));
}

#[test]
fn test_vmd_is_rejected() {
	let mut videos = VideoPlayer::default();
	let result = videos.open(&archive(), true, "INTRO.VMD", &PlayProperties::default());
	assert!(matches!(result, Err(EngineError::File(GobFileError::UnsupportedFeature { .. }))));
}
