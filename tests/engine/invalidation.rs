//! Dirty-rect tracking and flushing

use gob_rs::prelude::*;

fn screen() -> Draw<MemoryDisplay> {
	Draw::new(Video::new(MemoryDisplay::new(320, 200), 320, 200))
}

#[test]
fn test_overflow_flushes_whole_screen() {
	let mut draw = screen();
	draw.back_mut().fill(6);

	// Far apart rows never merge
	for i in 0..30 {
		draw.invalidate_rect(0, i * 6, 3, i * 6 + 1);
	}
	assert_eq!(draw.invalidated().len(), 30);

	draw.invalidate_rect(100, 199, 101, 199);
	assert_eq!(draw.invalidated(), &[Rect::new(0, 0, 319, 199)]);

	draw.blit_invalidated();
	draw.retrace();

	let display = draw.video().display();
	assert!(display.framebuffer().iter().all(|&p| p == 6));
	assert!(draw.invalidated().is_empty());
	assert!(draw.no_invalidated());
}

#[test]
fn test_only_invalidated_regions_reach_the_screen() {
	let mut draw = screen();
	draw.back_mut().fill(2);
	draw.invalidate_rect(40, 10, 41, 12);
	draw.blit_invalidated();
	draw.retrace();

	let display = draw.video().display();
	// Columns snap to 16-pixel boundaries
	assert_eq!(display.pixel(32, 10), Some(2));
	assert_eq!(display.pixel(47, 12), Some(2));
	assert_eq!(display.pixel(48, 12), Some(0));
	assert_eq!(display.pixel(40, 13), Some(0));
}

#[test]
fn test_pending_palette_flushes_everything() {
	let mut draw = screen();
	draw.back_mut().fill(1);
	draw.palette_mut().set(1, [63, 0, 0]);
	draw.invalidate_rect(0, 0, 0, 0);
	draw.set_apply_pal(true);

	draw.blit_invalidated();
	draw.retrace();

	let display = draw.video().display();
	assert_eq!(display.pixel(319, 199), Some(1));
	assert_eq!(display.palette().get(1), [63, 0, 0]);
	assert!(!draw.apply_pal());
}

#[test]
fn test_cursor_is_restored_from_back_buffer() {
	let mut draw = crate::small_screen();
	let sprite = Surface::from_pixels(2, 2, vec![9; 4]);

	draw.set_cursor(4, &sprite, 3, 3);
	draw.retrace();
	assert_eq!(draw.video().display().pixel(4, 4), Some(9));

	draw.blit_invalidated();
	draw.retrace();
	assert_eq!(draw.cursor_index(), -1);
	assert_eq!(draw.video().display().pixel(4, 4), Some(0));
}
