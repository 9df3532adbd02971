//! Sliding-window LZ77 used by video frames, sprites and packed resources.
//!
//! ## Stream layout
//!
//! | Offset | Size | Field                                                |
//! |--------|------|------------------------------------------------------|
//! | 0      | 4    | decompressed size (LE)                               |
//! | 4      | 4    | optional magic `34 12 78 56` selecting extended mode |
//! | ...    | ...  | control bytes interleaved with literals and matches  |
//!
//! Each control byte carries eight flags, least significant first. A set flag
//! means one literal byte. A clear flag means a two-byte match reference:
//!
//! ```text
//! byte 0: offset bits 0-7
//! byte 1: offset bits 8-11 (high nibble), length - 3 (low nibble)
//! ```
//!
//! The window is 4096 bytes, pre-filled with spaces (`0x20`). In classic mode
//! writing starts at 4078; in extended mode it starts at 273 and a length
//! nibble of `0xF` (length 18) is an escape: the real length is the next byte
//! plus 18.

use crate::file::{FileType, GobFileError};

use crate::graphics::Surface;

/// Size of the sliding window.
pub const WINDOW_SIZE: usize = 4096;

/// Window buffer size, the window plus room for the longest match.
const BUFFER_SIZE: usize = WINDOW_SIZE + 274;

/// Magic following the size prefix in extended-mode streams.
pub const EXTENDED_MAGIC: [u8; 4] = [0x34, 0x12, 0x78, 0x56];

/// Window addressing mode, detected from the stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	/// No magic; writing starts at 4078
	Classic,
	/// `0x1234 0x5678` magic; writing starts at 273 with the long-length escape
	Extended,
}

impl Mode {
	/// Initial window write position.
	pub const fn start_position(self) -> usize {
		match self {
			Mode::Classic => 4078,
			Mode::Extended => 273,
		}
	}

	/// Detects the mode from the bytes following the size prefix.
	pub fn detect(data: &[u8]) -> Self {
		if data.starts_with(&EXTENDED_MAGIC) {
			Mode::Extended
		} else {
			Mode::Classic
		}
	}
}

struct Input<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> Input<'a> {
	fn new(data: &'a [u8], pos: usize) -> Self {
		Self {
			data,
			pos,
		}
	}

	fn next(&mut self) -> Result<u8, GobFileError> {
		let byte = self.data.get(self.pos).copied().ok_or(GobFileError::UnexpectedEof {
			file_type: FileType::Lz77,
			offset: self.pos,
			context: "compressed stream",
		})?;
		self.pos += 1;
		Ok(byte)
	}

	fn next_u16(&mut self) -> Result<u16, GobFileError> {
		let low = self.next()?;
		let high = self.next()?;
		Ok(u16::from_le_bytes([low, high]))
	}
}

fn read_size(src: &[u8]) -> Result<usize, GobFileError> {
	let bytes: [u8; 4] = src
		.get(..4)
		.and_then(|b| b.try_into().ok())
		.ok_or_else(|| GobFileError::insufficient_data(FileType::Lz77, 4, src.len()))?;
	Ok(u32::from_le_bytes(bytes) as usize)
}

/// Returns the decompressed size announced by a stream.
pub fn decompressed_size(src: &[u8]) -> Result<usize, GobFileError> {
	read_size(src)
}

/// Decompresses a frame stream into `dest`, returning the decompressed size.
///
/// Fails if the announced size does not fit into `dest` or the input ends
/// before the output is complete.
pub fn decompress(src: &[u8], dest: &mut [u8]) -> Result<usize, GobFileError> {
	let real_size = read_size(src)?;
	if real_size > dest.len() {
		return Err(GobFileError::ChunkTooLarge {
			file_type: FileType::Lz77,
			size: real_size,
			capacity: dest.len(),
		});
	}

	let mode = Mode::detect(&src[4..]);
	let mut input = Input::new(src, if mode == Mode::Extended { 8 } else { 4 });
	let mut window = [0u8; BUFFER_SIZE];
	let mut write_pos = mode.start_position();
	window[..write_pos].fill(0x20);

	log::trace!("LZ77: {real_size} bytes, {mode:?} mode");

	let mut out = 0usize;
	let mut emit = |out: &mut usize, byte: u8| {
		if let Some(d) = dest.get_mut(*out) {
			*d = byte;
		}
		*out += 1;
	};

	let mut remaining = real_size;
	let mut chunk_count = 1u8;
	let mut flags = 0u8;

	while remaining > 0 {
		chunk_count -= 1;
		if chunk_count == 0 {
			chunk_count = 8;
			flags = input.next()?;
		}

		if flags & 1 != 0 {
			let byte = input.next()?;
			window[write_pos] = byte;
			emit(&mut out, byte);
			write_pos = (write_pos + 1) % WINDOW_SIZE;
			remaining -= 1;
		} else {
			let tmp = usize::from(input.next_u16()?);
			let mut len = ((tmp & 0xF00) >> 8) + 3;
			let escaped = match mode {
				Mode::Extended => len == 0x12,
				Mode::Classic => len == 0,
			};
			if escaped {
				len = usize::from(input.next()?) + 0x12;
			}

			let mut read_pos = (tmp & 0xFF) + ((tmp >> 4) & 0xF00);

			if tmp + len >= WINDOW_SIZE || len + write_pos >= WINDOW_SIZE {
				// Wraps around the end of the window
				for _ in 0..len {
					let byte = window[read_pos];
					emit(&mut out, byte);
					window[write_pos] = byte;
					write_pos = (write_pos + 1) % WINDOW_SIZE;
					read_pos = (read_pos + 1) % WINDOW_SIZE;
				}
			} else if tmp + len < write_pos || len + write_pos < read_pos {
				// Source and target ranges do not feed each other
				for i in 0..len {
					emit(&mut out, window[read_pos + i]);
				}
				window.copy_within(read_pos..read_pos + len, write_pos);
				write_pos += len;
			} else {
				// Overlapping forward copy, repeats the just-written bytes
				for _ in 0..len {
					let byte = window[read_pos];
					emit(&mut out, byte);
					window[write_pos] = byte;
					write_pos += 1;
					read_pos += 1;
				}
			}

			remaining = remaining.saturating_sub(len);
		}

		flags >>= 1;
	}

	Ok(real_size)
}

/// Unpacks a classic-mode resource stream into a new buffer.
///
/// Unlike [`decompress`] this has no long-length escape and stops exactly at
/// the announced size, even in the middle of a match.
pub fn unpack_data(src: &[u8]) -> Result<Vec<u8>, GobFileError> {
	let real_size = read_size(src)?;
	let mut out = Vec::with_capacity(real_size);
	if real_size == 0 {
		return Ok(out);
	}

	let mut input = Input::new(src, 4);
	let mut window = [0u8; WINDOW_SIZE];
	let mut write_pos = Mode::Classic.start_position();
	window[..write_pos].fill(0x20);

	let mut cmd = 0u16;
	loop {
		cmd >>= 1;
		if cmd & 0x100 == 0 {
			cmd = u16::from(input.next()?) | 0xFF00;
		}

		if cmd & 1 != 0 {
			let byte = input.next()?;
			out.push(byte);
			window[write_pos] = byte;
			write_pos = (write_pos + 1) % WINDOW_SIZE;
			if out.len() == real_size {
				return Ok(out);
			}
		} else {
			let low = input.next()?;
			let high = input.next()?;
			let offset = usize::from(low) | (usize::from(high & 0xF0) << 4);
			let len = usize::from(high & 0x0F) + 3;

			for i in 0..len {
				let byte = window[(offset + i) % WINDOW_SIZE];
				out.push(byte);
				if out.len() == real_size {
					return Ok(out);
				}
				window[write_pos] = byte;
				write_pos = (write_pos + 1) % WINDOW_SIZE;
			}
		}
	}
}

/// Draws an LZ-compressed or raw sprite into `dest` at `(x, y)`.
///
/// Sprite data starts with `01 02` and a sub-type: `2` is a raw
/// `width`×`height` block, `1` an LZ stream written row by row. With
/// `transparent` set, zero pixels are skipped. Returns `false` if the data is
/// in neither form, in which case callers fall back to the packed RLE.
#[allow(clippy::too_many_arguments)]
pub fn uncompress_sprite(
	src: &[u8],
	width: u16,
	height: u16,
	x: i16,
	y: i16,
	transparent: bool,
	dest: &mut Surface,
) -> bool {
	if src.len() < 3 || src[0] != 1 || src[1] != 2 {
		return false;
	}

	match src[2] {
		2 => {
			let pixels = src[3..].iter().copied().take(usize::from(width) * usize::from(height));
			let sprite = Surface::from_pixels(width, height, pixels.collect());
			dest.blit_at(&sprite, x, y, if transparent { 0 } else { -1 });
			true
		}
		1 => {
			if let Err(e) = uncompress_sprite_stream(&src[3..], width, height, x, y, transparent, dest)
			{
				log::debug!("Truncated sprite stream: {e}");
			}
			true
		}
		_ => false,
	}
}

#[allow(clippy::too_many_arguments)]
fn uncompress_sprite_stream(
	src: &[u8],
	width: u16,
	height: u16,
	x: i16,
	y: i16,
	transparent: bool,
	dest: &mut Surface,
) -> Result<(), GobFileError> {
	let mut source_left = read_size(src)?;
	let mode = Mode::detect(src.get(4..).unwrap_or_default());
	let mut input = Input::new(src, if mode == Mode::Extended { 8 } else { 4 });
	let len_cmd = match mode {
		Mode::Extended => 18,
		Mode::Classic => 100,
	};

	let mut window = [0u8; WINDOW_SIZE];
	let mut write_pos = mode.start_position();
	window[..write_pos].fill(0x20);

	let (width, height) = (i32::from(width), i32::from(height));
	let (mut cur_x, mut cur_y) = (0i32, 0i32);

	// Writes one pixel, returns `true` once the last row is complete
	let mut plot = |byte: u8, cur_x: &mut i32, cur_y: &mut i32| -> bool {
		let (px, py) = (i16::try_from(i32::from(x) + *cur_x), i16::try_from(i32::from(y) + *cur_y));
		if (byte != 0 || !transparent)
			&& let (Ok(px), Ok(py)) = (px, py)
		{
			dest.put_pixel(px, py, u32::from(byte));
		}
		*cur_x += 1;
		if *cur_x >= width {
			*cur_x = 0;
			*cur_y += 1;
			return *cur_y >= height;
		}
		false
	};

	if source_left == 0 {
		return Ok(());
	}

	let mut cmd = 0u16;
	loop {
		cmd >>= 1;
		if cmd & 0x100 == 0 {
			cmd = u16::from(input.next()?) | 0xFF00;
		}

		if cmd & 1 != 0 {
			let byte = input.next()?;
			if plot(byte, &mut cur_x, &mut cur_y) {
				return Ok(());
			}
			window[write_pos] = byte;
			write_pos = (write_pos + 1) % WINDOW_SIZE;

			source_left -= 1;
			if source_left == 0 {
				return Ok(());
			}
		} else {
			let low = input.next()?;
			let high = input.next()?;
			let offset = usize::from(low) | (usize::from(high & 0xF0) << 4);
			let mut len = usize::from(high & 0x0F) + 3;
			if len == len_cmd {
				len = usize::from(input.next()?) + 18;
			}

			for i in 0..len {
				let byte = window[(offset + i) % WINDOW_SIZE];
				if plot(byte, &mut cur_x, &mut cur_y) {
					return Ok(());
				}
				window[write_pos] = byte;
				write_pos = (write_pos + 1) % WINDOW_SIZE;
			}

			if len >= source_left {
				return Ok(());
			}
			source_left -= len;
		}
	}
}
