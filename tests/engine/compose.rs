//! DEC backdrops and CMP layers

use gob_rs::prelude::*;

use crate::builders::{Writer, raw_sprite, rxy};

/// ROOM: a 16×8 backdrop of color 3.
/// DECAL: a 2×2 part with one transparent pixel, placed at (4, 2).
fn archive() -> MemoryArchive {
	archive_with_backdrop(&[3; 16 * 8])
}

fn archive_with_backdrop(backdrop: &[u8]) -> MemoryArchive {
	let mut decal = vec![0u8; 16 * 8];
	decal[0] = 5;
	decal[16] = 5;
	decal[17] = 5;

	let dec = Writer::little()
		.word(0)
		.word(1)
		.word(2)
		.name("ROOM.LBM")
		.name("DECAL.LBM")
		.name("")
		.name("")
		.word(1)
		.bytes(&[1, 0, 0])
		.word(4)
		.word(2)
		.bytes(&[1])
		.finish();

	MemoryArchive::new()
		.with_file("ROOM.CMP", raw_sprite(backdrop))
		.with_file("DECAL.CMP", raw_sprite(&decal))
		.with_file("DECAL.RXY", rxy(&[[0, 1, 0, 1]]))
		.with_file("SCENE.DEC", dec)
}

#[test]
fn test_dec_composes_backdrop_and_parts() {
	let archive = archive();
	let dec = DecFile::open(&archive, "SCENE.DEC", 16, 8, 1, EndiannessMethod::AltFile);
	assert!(dec.backdrop().is_some());
	assert_eq!(dec.layers().len(), 1);
	assert_eq!(dec.parts().len(), 1);

	let mut screen = Surface::indexed(16, 8);
	dec.draw(&mut screen);

	assert_eq!(screen.get_pixel(0, 0), Some(3));
	assert_eq!(screen.get_pixel(4, 2), Some(5));
	assert_eq!(screen.get_pixel(4, 3), Some(5));
	assert_eq!(screen.get_pixel(5, 3), Some(5));
	// Transparent pixel keeps the backdrop
	assert_eq!(screen.get_pixel(5, 2), Some(3));
}

#[test]
fn test_backdrop_color_zero_is_opaque() {
	let mut backdrop = vec![3u8; 16 * 8];
	backdrop[0] = 0;
	let archive = archive_with_backdrop(&backdrop);
	let dec = DecFile::open(&archive, "SCENE.DEC", 16, 8, 1, EndiannessMethod::AltFile);

	let mut screen = Surface::indexed(16, 8);
	screen.fill(9);
	dec.draw(&mut screen);
	assert_eq!(screen.get_pixel(0, 0), Some(0));
	assert_eq!(screen.get_pixel(1, 0), Some(3));

	let mut screen = Surface::indexed(16, 8);
	screen.fill(9);
	dec.draw_backdrop(&mut screen);
	assert_eq!(screen.get_pixel(0, 0), Some(0));
	// Parts are left out
	assert_eq!(screen.get_pixel(4, 2), Some(3));
}

#[test]
fn test_missing_dec_draws_nothing() {
	let dec = DecFile::open(&archive(), "NONE.DEC", 16, 8, 1, EndiannessMethod::AltFile);
	assert!(dec.backdrop().is_none());
	assert!(dec.draw_list().is_empty());

	let mut screen = Surface::indexed(16, 8);
	dec.draw(&mut screen);
	assert!(screen.pixels().iter().all(|&p| p == 0));
}

#[test]
fn test_layer_parts_are_drawn_through_the_draw_engine() {
	let archive = archive();
	let layer = CmpFile::open(&archive, "DECAL", 16, 8, 1);
	assert_eq!(layer.part_count(), 1);

	let mut draw = crate::small_screen();
	layer.draw(draw.back_mut(), 0, 10, 4, 0);
	draw.invalidate_rect(10, 4, 11, 5);
	draw.blit_invalidated();
	draw.retrace();

	let display = draw.video().display();
	assert_eq!(display.pixel(10, 4), Some(5));
	assert_eq!(display.pixel(11, 4), Some(0));
	assert_eq!(display.pixel(11, 5), Some(5));
}
