//! ANI files and animated objects

use std::rc::Rc;

use gob_rs::prelude::*;

use crate::builders::{Writer, raw_sprite, rxy};

/// SHEET: part 0 is 2×2 of color 7, part 1 is 1×1 of color 9.
fn sheet(archive: MemoryArchive) -> MemoryArchive {
	let mut pixels = vec![0u8; 320 * 2];
	pixels[0..2].fill(7);
	pixels[320..322].fill(7);
	pixels[2] = 9;

	archive.with_file("SHEET.RXY", rxy(&[[0, 1, 0, 1], [2, 2, 0, 0]])).with_file("SHEET.CMP", raw_sprite(&pixels))
}

/// HOP: three frames at (40, 30), moving 10 pixels right per cycle.
fn hop(writer: Writer) -> Vec<u8> {
	writer
		.word(0)
		.word(1)
		.word(2)
		.name("")
		.name("SHEET.CMP")
		.name("HOP")
		.name("HOP")
		.word(0)
		.word(40)
		.word(30)
		.word(10)
		.word(0)
		.padded(&[1])
		.word(3)
		.padded(&[0x01, 0, 0, 0, 0x00])
		.padded(&[0x01, 0, 2, 0, 0x01])
		.padded(&[0x01, 1, 0, 3, 0x00])
		.padded(&[0x01, 1, 5, 5, 0xFF])
		.finish()
}

fn little_archive() -> MemoryArchive {
	sheet(MemoryArchive::new()).with_file("HOP.ANI", hop(Writer::little()))
}

#[test]
fn test_alternate_file_is_big_endian() {
	let little = AniFile::open(&little_archive(), "HOP.ANI", 320, 1, EndiannessMethod::AltFile);
	let archive = sheet(MemoryArchive::new()).with_file("_OP.ANI", hop(Writer::big()));
	let big = AniFile::open(&archive, "HOP.ANI", 320, 1, EndiannessMethod::AltFile);

	assert_eq!(big.animation_count(), 1);
	assert_eq!(big.animations(), little.animations());

	let animation = big.animation(0).unwrap();
	assert_eq!(animation.name, "HOP");
	assert_eq!((animation.x, animation.y, animation.delta_x), (40, 30, 10));
	assert_eq!(animation.frame_count, 3);
	assert_eq!(animation.frames[1].len(), 2);
}

#[test]
fn test_object_cycle_on_screen() {
	let ani = Rc::new(AniFile::open(&little_archive(), "HOP.ANI", 320, 1, EndiannessMethod::AltFile));
	let mut object = AniObject::new(ani);
	object.set_visible(true);

	let mut screen = Surface::indexed(320, 200);

	// Frame 0: part 0 at the origin
	let area = object.draw(&mut screen).unwrap();
	assert_eq!((area.left, area.top), (40, 30));
	assert_eq!(screen.get_pixel(41, 31), Some(7));

	// Clearing restores what was below
	object.clear(&mut screen).unwrap();
	assert_eq!(screen.get_pixel(41, 31), Some(0));

	// Frame 1: part 0 shifted by 2, then part 1 three rows down
	object.advance();
	object.draw(&mut screen).unwrap();
	assert_eq!(screen.get_pixel(43, 31), Some(7));
	assert_eq!(screen.get_pixel(40, 33), Some(9));
	object.clear(&mut screen).unwrap();

	// Wrapping to frame 0 moves the object by one cycle
	object.advance();
	object.advance();
	assert_eq!(object.frame(), 0);
	assert_eq!(object.position(), (50, 30));
	assert!(object.is_in(51, 31));
	assert!(!object.is_in(41, 31));
}

#[test]
fn test_object_once_hides_after_last_frame() {
	let ani = Rc::new(AniFile::open(&little_archive(), "HOP.ANI", 320, 1, EndiannessMethod::AltFile));
	let mut object = AniObject::new(ani);
	object.set_visible(true);
	object.set_mode(AniMode::Once);

	object.set_frame(2);
	assert!(object.last_frame());
	object.advance();

	assert!(object.is_paused());
	assert!(!object.is_visible());
	assert!(object.draw(&mut Surface::indexed(320, 200)).is_none());
}
