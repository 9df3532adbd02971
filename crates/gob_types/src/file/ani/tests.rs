//! Unit tests for ANI loading and drawing

use super::*;
use crate::graphics::encode_packed_sprite;
use gob_vfs::MemoryArchive;

/// Raw chunk: flags, part, x, y, control
type RawChunk = (u8, u8, i8, i8, u8);

struct AniWriter {
	big: bool,
	data: Vec<u8>,
}

impl AniWriter {
	fn new(big: bool) -> Self {
		Self {
			big,
			data: Vec::new(),
		}
	}

	fn pad(&mut self) {
		if self.big {
			self.data.push(0);
		}
	}

	fn byte(&mut self, value: u8) {
		self.data.push(value);
	}

	fn word(&mut self, value: u16) {
		let bytes = if self.big { value.to_be_bytes() } else { value.to_le_bytes() };
		self.data.extend_from_slice(&bytes);
	}

	fn name(&mut self, name: &str) {
		let mut field = name.as_bytes().to_vec();
		field.resize(NAME_LENGTH, 0);
		self.data.extend_from_slice(&field);
		self.pad();
	}

	fn animation(&mut self, name: &str, pos: [i16; 4], frame_count: u16, chunks: &[RawChunk]) {
		self.name(name);
		self.name(name);
		self.word(0);
		for v in pos {
			self.word(v as u16);
		}
		self.byte(1);
		self.pad();
		self.word(frame_count);
		for &(flags, part, x, y, control) in chunks {
			self.byte(flags);
			self.byte(part);
			self.byte(x as u8);
			self.byte(y as u8);
			self.byte(control);
			self.pad();
		}
	}
}

const WALK: [RawChunk; 3] = [(0x01, 0, 0, 0, 0x01), (0x01, 1, 4, 0, 0x00), (0x01, 1, -2, 1, 0xFF)];

fn walk_file(big: bool, layers: &[&str]) -> Vec<u8> {
	let mut w = AniWriter::new(big);
	w.word(0);
	w.word(1);
	w.word(layers.len() as u16 + 1);
	w.name("DUMMY");
	for layer in layers {
		w.name(layer);
	}
	w.animation("WALK", [10, 20, 4, 0], 2, &WALK);
	w.data
}

/// RXY with two parts: 4×2 at (0, 0) and 2×2 at (4, 0)
fn sheet_rxy() -> Vec<u8> {
	let mut data = 2u16.to_le_bytes().to_vec();
	for v in [0u16, 3, 0, 1, 4, 5, 0, 1] {
		data.extend_from_slice(&v.to_le_bytes());
	}
	data
}

/// 320×2 sheet, part 0 is color 1, part 1 is color 2
fn sheet_cmp() -> Vec<u8> {
	let mut pixels = vec![0u8; 640];
	for row in 0..2 {
		pixels[row * 320..row * 320 + 4].fill(1);
		pixels[row * 320 + 4..row * 320 + 6].fill(2);
	}
	encode_packed_sprite(&pixels)
}

fn archive_with_sheet() -> MemoryArchive {
	MemoryArchive::new().with_file("SHEET.RXY", sheet_rxy()).with_file("SHEET.CMP", sheet_cmp())
}

#[test]
fn test_parse_animation() {
	let archive = archive_with_sheet().with_file("WALK.ANI", walk_file(false, &["SHEET.CMP"]));
	let ani = File::open(&archive, "WALK.ANI", 320, 1, EndiannessMethod::AltFile);

	assert_eq!(ani.animation_count(), 1);
	assert_eq!(ani.layers().len(), 1);

	let anim = ani.animation(0).unwrap();
	assert_eq!(anim.name, "WALK");
	assert_eq!((anim.x, anim.y, anim.delta_x, anim.delta_y), (10, 20, 4, 0));
	assert!(anim.transp);
	assert_eq!(anim.frame_count, 2);
	assert_eq!(anim.frames[0].len(), 2);
	assert_eq!(anim.frames[1].len(), 1);
	assert_eq!(
		anim.frames[1][0],
		Chunk {
			layer: 0,
			part: 1,
			x: -2,
			y: 1,
		}
	);
}

#[test]
fn test_frame_areas_and_sizes() {
	let archive = archive_with_sheet().with_file("WALK.ANI", walk_file(false, &["SHEET"]));
	let ani = File::open(&archive, "WALK.ANI", 320, 1, EndiannessMethod::AltFile);

	let anim = ani.animation(0).unwrap();
	assert_eq!(anim.frame_areas[0], Rect::new(0, 0, 5, 1));
	assert_eq!(anim.frame_areas[1], Rect::new(-2, 1, -1, 2));
	assert_eq!((anim.width, anim.height), (6, 2));
	assert_eq!(ani.max_size(), (6, 2));
}

#[test]
fn test_offset_multipliers() {
	let mut w = AniWriter::new(false);
	w.word(0);
	w.word(1);
	w.word(1);
	w.name("DUMMY");
	w.animation("M", [0; 4], 1, &[(0x41, 0, 5, 0, 0x01), (0xB1, 0, -5, -3, 0xFF)]);

	let ani = File::from_bytes(&MemoryArchive::new(), &w.data, Endian::Little, 320, 1).unwrap();
	let chunks = &ani.animation(0).unwrap().frames[0];
	assert_eq!((chunks[0].x, chunks[0].y), (133, 0));
	assert_eq!((chunks[1].x, chunks[1].y), (-261, -387));
}

#[test]
fn test_missing_layer_keeps_slot() {
	let mut w = AniWriter::new(false);
	w.word(0);
	w.word(1);
	w.word(3);
	w.name("DUMMY");
	w.name("GONE");
	w.name("SHEET");
	w.animation("A", [0; 4], 1, &[(0x01, 0, 0, 0, 0x01), (0x02, 1, 0, 0, 0xFF)]);

	let ani = File::from_bytes(&archive_with_sheet(), &w.data, Endian::Little, 320, 1).unwrap();
	assert_eq!(ani.layers().len(), 2);
	assert!(ani.layers()[0].is_none());
	assert!(ani.layers()[1].is_some());

	// Only the chunk on the existing layer counts towards the area
	let anim = ani.animation(0).unwrap();
	assert_eq!(anim.frame_areas[0], Rect::new(0, 0, 1, 1));
}

#[test]
fn test_layer_needs_both_files() {
	let archive = MemoryArchive::new().with_file("SHEET.CMP", sheet_cmp());
	let ani = File::from_bytes(&archive, &walk_file(false, &["SHEET"]), Endian::Little, 320, 1).unwrap();
	assert!(ani.layers()[0].is_none());

	// Nothing resolves, every frame keeps the degenerate area
	let anim = ani.animation(0).unwrap();
	assert!(anim.frame_areas.iter().all(|area| !area.is_valid()));
	assert_eq!(*anim.frame_areas.first().unwrap(), Rect::empty_area());
	assert_eq!(ani.max_size(), (0, 0));
}

#[test]
fn test_alternate_big_endian_file() {
	let little = archive_with_sheet().with_file("WALK.ANI", walk_file(false, &["SHEET"]));
	let big = archive_with_sheet().with_file("_ALK.ANI", walk_file(true, &["SHEET"]));

	let from_little = File::open(&little, "WALK.ANI", 320, 1, EndiannessMethod::AltFile);
	let from_big = File::open(&big, "WALK.ANI", 320, 1, EndiannessMethod::AltFile);

	assert_eq!(from_big.name(), "WALK.ANI");
	assert_eq!(from_big.animations(), from_little.animations());
	assert_eq!(from_big.max_size(), from_little.max_size());
}

#[test_log::test]
fn test_missing_file_is_empty() {
	let ani = File::open(&MemoryArchive::new(), "NONE.ANI", 320, 1, EndiannessMethod::AltFile);
	assert_eq!(ani.animation_count(), 0);

	let mut dest = Surface::indexed(8, 8);
	ani.draw(&mut dest, 0, 0, 0, 0);
	assert!(dest.pixels().iter().all(|&p| p == 0));
}

#[test_log::test]
fn test_truncated_chunk_stream() {
	let mut data = walk_file(false, &["SHEET"]);
	data.truncate(data.len() - 3);

	let result = File::from_bytes(&archive_with_sheet(), &data, Endian::Little, 320, 1);
	assert!(matches!(result, Err(GobFileError::UnexpectedEof { .. })));

	let archive = archive_with_sheet().with_file("WALK.ANI", data);
	let ani = File::open(&archive, "WALK.ANI", 320, 1, EndiannessMethod::AltFile);
	assert_eq!(ani.animation_count(), 0);
}

#[test_log::test]
fn test_no_layers() {
	let mut w = AniWriter::new(false);
	w.word(0);
	w.word(0);
	w.word(0);
	let ani = File::from_bytes(&MemoryArchive::new(), &w.data, Endian::Little, 320, 1).unwrap();
	assert!(ani.layers().is_empty());
	assert_eq!(ani.animation_count(), 0);
}

#[test]
fn test_draw_frame() {
	let archive = archive_with_sheet().with_file("WALK.ANI", walk_file(false, &["SHEET"]));
	let ani = File::open(&archive, "WALK.ANI", 320, 1, EndiannessMethod::AltFile);

	let mut dest = Surface::indexed(16, 4);
	ani.draw(&mut dest, 0, 0, 2, 1);
	assert_eq!(&dest.row(1).unwrap()[..10], &[0, 0, 1, 1, 1, 1, 2, 2, 0, 0]);
	assert_eq!(&dest.row(2).unwrap()[..10], &[0, 0, 1, 1, 1, 1, 2, 2, 0, 0]);

	// Out of range animation and frame are ignored
	let before = dest.clone();
	ani.draw(&mut dest, 1, 0, 0, 0);
	ani.draw(&mut dest, 0, 2, 0, 0);
	assert_eq!(dest, before);
}
