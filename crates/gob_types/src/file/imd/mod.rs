//! IMD video containers.
//!
//! An IMD file is a header, an optional frame index and a stream of frame
//! chunks. Each frame chunk is prefixed with a 16-bit code that is either the
//! payload size or one of the escape codes below.
//!
//! ## Header
//!
//! | Size | Field                                              |
//! |------|----------------------------------------------------|
//! | 2    | signature, always 0                                |
//! | 2    | version, low byte must be at least 2               |
//! | 2    | frame count                                        |
//! | 2×4  | x, y, width, height (i16)                          |
//! | 2    | flags                                              |
//! | 2    | offset of the first frame                          |
//! | 768  | VGA palette                                        |
//!
//! Version 3 adds a standard rectangle (count, then x, y, width, height),
//! version 4 the offset of the frame index. The flags gate the frame
//! coordinates table ([`FLAG_FRAME_COORDS`]), embedded sound
//! ([`FLAG_SOUND`], not supported) and explicit buffer sizes
//! ([`FLAG_DATA_SIZE`]).
//!
//! ## Seeking
//!
//! Frames 0 and 1 can always be reached. Every other frame needs the frame
//! index; without one the video can only be decoded sequentially and
//! [`File::seek_frame`] fails with [`GobFileError::FrameInaccessible`].

use std::ops::{BitOr, BitOrAssign};

use gob_vfs::Resources;

use crate::graphics::{PALETTE_SIZE, Palette, Rect, Surface};
use crate::reader::ByteReader;

use super::error::{FileType, GobFileError};

mod render;

/// Header flag: a per-frame coordinates table exists.
pub const FLAG_FRAME_COORDS: u16 = 0x8000;
/// Header flag: sound is interleaved with the frames.
pub const FLAG_SOUND: u16 = 0x4000;
/// Header flag: frame data and video buffer sizes are stored.
pub const FLAG_DATA_SIZE: u16 = 0x2000;

/// Frame code: inline metadata, followed by the actual code.
pub const CODE_METADATA: u16 = 0xFFF0;
/// Frame code: end of the stream.
pub const CODE_END: u16 = 0xFFF1;
/// Frame code: skip a 16-bit sized block.
pub const CODE_SKIP16: u16 = 0xFFF2;
/// Frame code: skip a 32-bit sized block.
pub const CODE_SKIP32: u16 = 0xFFF3;
/// Frame code: full palette, followed by the actual code.
pub const CODE_PALETTE: u16 = 0xFFF4;
/// Frame code: payload with a 32-bit size.
pub const CODE_LARGE: u16 = 0xFFFC;
/// Frame code: jump to another frame.
pub const CODE_JUMP: u16 = 0xFFFD;

/// Extra room allocated on top of the announced buffer sizes.
const BUFFER_SLACK: usize = 500;

/// Where [`File::seek_frame`] counts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Whence {
	/// From the first frame
	#[default]
	Set,
	/// From the current frame
	Cur,
	/// Backwards from the last frame
	End,
}

/// Flags describing what [`File::view`] did.
///
/// The low byte also carries the frame type byte of decoded frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameFlags(u16);

impl FrameFlags {
	/// Frame had pixel data
	pub const DATA: Self = Self(0x0001);
	/// Palette changed
	pub const PALETTE: Self = Self(0x0010);
	/// Stream jumped to another frame
	pub const JUMPED: Self = Self(0x0200);
	/// Frame had no pixel data
	pub const EMPTY: Self = Self(0x0800);
	/// Frame area differs from the video area
	pub const RECT_CHANGED: Self = Self(0x1000);
	/// A seek was needed to reach the frame
	pub const SEEKED: Self = Self(0x2000);
	/// End of the stream was reached
	pub const END: Self = Self(0x8000);

	/// No flags set.
	pub const fn empty() -> Self {
		Self(0)
	}

	/// Flags from raw bits.
	pub const fn from_bits(bits: u16) -> Self {
		Self(bits)
	}

	/// Raw bits.
	pub const fn bits(self) -> u16 {
		self.0
	}

	/// Returns `true` if every flag of `other` is set.
	pub const fn contains(self, other: Self) -> bool {
		self.0 & other.0 == other.0
	}

	/// Sets the flags of `other`.
	pub fn insert(&mut self, other: Self) {
		self.0 |= other.0;
	}
}

impl BitOr for FrameFlags {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self::Output {
		Self(self.0 | rhs.0)
	}
}

impl BitOrAssign for FrameFlags {
	fn bitor_assign(&mut self, rhs: Self) {
		self.0 |= rhs.0;
	}
}

/// Outcome of viewing one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult {
	/// What happened
	pub flags: FrameFlags,
	/// Screen area of the frame, clipped to the target surface
	pub area: Rect,
}

/// A position and size in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Area {
	/// Left edge
	pub x: i16,
	/// Top edge
	pub y: i16,
	/// Width
	pub width: i16,
	/// Height
	pub height: i16,
}

impl Area {
	fn from_rect(rect: &Rect) -> Self {
		Self {
			x: rect.left,
			y: rect.top,
			width: rect.right.wrapping_sub(rect.left).wrapping_add(1),
			height: rect.bottom.wrapping_sub(rect.top).wrapping_add(1),
		}
	}

	/// The area as an inclusive rectangle.
	pub fn to_rect(&self) -> Rect {
		Rect::from_size(self.x, self.y, self.width, self.height)
	}
}

/// Parsed IMD header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
	/// Raw version word
	pub ver_min: u16,
	/// Number of frames
	pub frame_count: u16,
	/// Position and size of the video
	pub area: Area,
	/// Feature flags
	pub flags: u16,
	/// Offset of frame 0
	pub first_frame_pos: u16,
	/// Area used by every frame but the first
	pub std_area: Option<Area>,
	/// Offset of every frame; empty without a frame index
	pub frame_positions: Vec<u32>,
	/// Per-frame area overrides; empty without a coordinates table
	pub frame_coords: Vec<Rect>,
	/// Largest frame chunk
	pub frame_data_size: usize,
	/// Size of the decompression buffer
	pub vid_buffer_size: usize,
}

impl Header {
	/// Format version, the low byte of [`Header::ver_min`].
	pub fn version(&self) -> u8 {
		(self.ver_min & 0xFF) as u8
	}

	/// Returns `true` if any frame can be sought directly.
	pub fn has_frame_index(&self) -> bool {
		!self.frame_positions.is_empty()
	}
}

/// An open IMD video.
#[derive(Debug, Clone)]
pub struct File {
	header: Header,
	palette: Palette,
	data: Vec<u8>,
	pos: usize,
	cur_frame: u16,
	vid_buffer: Vec<u8>,
}

impl File {
	/// Opens a video through the resources.
	pub fn open(resources: &dyn Resources, name: &str) -> Result<Self, GobFileError> {
		let data = resources.get_file(name).ok_or_else(|| GobFileError::NotFound {
			file_type: FileType::Imd,
			name: name.to_string(),
		})?;
		let file = Self::from_bytes(data)?;
		log::debug!(
			"IMD \"{name}\": version {}, {} frames, {}x{} at ({}, {})",
			file.header.version(),
			file.header.frame_count,
			file.header.area.width,
			file.header.area.height,
			file.header.area.x,
			file.header.area.y
		);
		Ok(file)
	}

	/// Parses a video held in memory.
	pub fn from_bytes(data: Vec<u8>) -> Result<Self, GobFileError> {
		let (header, palette) = Self::parse_header(&data)?;
		let vid_buffer = vec![0u8; header.vid_buffer_size + BUFFER_SLACK];
		let pos = usize::from(header.first_frame_pos);

		Ok(Self {
			header,
			palette,
			data,
			pos,
			cur_frame: 0,
			vid_buffer,
		})
	}

	fn parse_header(data: &[u8]) -> Result<(Header, Palette), GobFileError> {
		let mut reader = ByteReader::new(data, FileType::Imd);

		let signature = reader.read_u16()?;
		let ver_min = reader.read_u16()?;
		if signature != 0 || (ver_min & 0xFF) < 2 {
			return Err(GobFileError::UnsupportedVersion {
				file_type: FileType::Imd,
				signature,
				version: ver_min,
			});
		}

		let mut header = Header {
			ver_min,
			frame_count: reader.read_u16()?,
			area: Area {
				x: reader.read_i16()?,
				y: reader.read_i16()?,
				width: reader.read_i16()?,
				height: reader.read_i16()?,
			},
			flags: reader.read_u16()?,
			first_frame_pos: reader.read_u16()?,
			..Header::default()
		};

		let palette = Palette::from_vga_bytes(reader.read_bytes(PALETTE_SIZE)?);

		if header.version() >= 3 {
			let std_count = reader.read_u16()?;
			if std_count > 1 {
				return Err(GobFileError::UnsupportedFeature {
					file_type: FileType::Imd,
					feature: "more than one standard rectangle",
				});
			}
			if std_count == 1 {
				header.std_area = Some(Area {
					x: reader.read_i16()?,
					y: reader.read_i16()?,
					width: reader.read_i16()?,
					height: reader.read_i16()?,
				});
			}
		}

		let frame_pos_offset = if header.version() >= 4 { reader.read_u32()? } else { 0 };
		let frame_coords_offset =
			if header.flags & FLAG_FRAME_COORDS != 0 { reader.read_u32()? } else { 0 };

		if header.flags & FLAG_SOUND != 0 {
			return Err(GobFileError::UnsupportedFeature {
				file_type: FileType::Imd,
				feature: "embedded sound",
			});
		}

		if header.flags & FLAG_DATA_SIZE != 0 {
			let size = reader.read_u16()?;
			if size == 0 {
				header.frame_data_size = reader.read_u32()? as usize;
				header.vid_buffer_size = reader.read_u32()? as usize;
			} else {
				header.frame_data_size = usize::from(size);
				header.vid_buffer_size = usize::from(reader.read_u16()?);
			}
		} else {
			let size = header.area.width.max(0) as usize * header.area.height.max(0) as usize + BUFFER_SLACK;
			header.frame_data_size = size;
			header.vid_buffer_size = size;
		}

		if frame_pos_offset != 0 {
			reader.seek(frame_pos_offset as usize)?;
			header.frame_positions =
				(0..header.frame_count).map(|_| reader.read_u32()).collect::<Result<_, _>>()?;
		}

		if frame_coords_offset != 0 {
			reader.seek(frame_coords_offset as usize)?;
			for _ in 0..header.frame_count {
				let left = reader.read_i16()?;
				let top = reader.read_i16()?;
				let right = reader.read_i16()?;
				let bottom = reader.read_i16()?;
				header.frame_coords.push(Rect::new(left, top, right, bottom));
			}
		}

		Ok((header, palette))
	}

	/// The parsed header.
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Number of frames.
	pub fn frame_count(&self) -> u16 {
		self.header.frame_count
	}

	/// Next frame [`File::view`] decodes without seeking.
	pub fn current_frame(&self) -> u16 {
		self.cur_frame
	}

	/// Position and size of the video.
	pub fn area(&self) -> Area {
		self.header.area
	}

	/// Moves the video.
	pub fn set_position(&mut self, x: i16, y: i16) {
		self.header.area.x = x;
		self.header.area.y = y;
	}

	/// The video palette, updated by palette chunks.
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Mutable access to the video palette.
	pub fn palette_mut(&mut self) -> &mut Palette {
		&mut self.palette
	}

	/// Positions the stream at a frame.
	///
	/// Frames out of range are ignored. Frames past the second one need a
	/// frame index.
	pub fn seek_frame(&mut self, frame: i32, whence: Whence) -> Result<(), GobFileError> {
		let frame = match whence {
			Whence::Set => frame,
			Whence::Cur => frame + i32::from(self.cur_frame),
			Whence::End => i32::from(self.header.frame_count) - frame - 1,
		};

		if frame < 0 || frame >= i32::from(self.header.frame_count) {
			log::trace!("IMD: ignoring seek to frame {frame}");
			return Ok(());
		}
		let frame = frame as u16;

		let first = usize::from(self.header.first_frame_pos);
		let pos = match frame {
			0 => first,
			1 => {
				let mut reader = ByteReader::new(&self.data, FileType::Imd);
				reader.seek(first)?;
				first + usize::from(reader.read_u16()?) + 4
			}
			_ => match self.header.frame_positions.get(usize::from(frame)) {
				Some(&pos) => pos as usize,
				None => {
					return Err(GobFileError::FrameInaccessible {
						file_type: FileType::Imd,
						frame,
					});
				}
			},
		};

		self.pos = pos;
		self.cur_frame = frame;
		Ok(())
	}

	/// Decodes a frame, rendering it into `dest` if given.
	///
	/// A frame other than [`File::current_frame`] is sought first. The video
	/// palette is updated by palette chunks; pushing it to a display is left
	/// to the caller.
	///
	/// Jump chunks are followed through the frame index. [`FrameFlags::JUMPED`]
	/// is added to the flags gathered so far, so a palette chunk ahead of a
	/// jump is still reported. Following more jumps than the video has frames
	/// stops decoding of the frame.
	pub fn view(&mut self, mut dest: Option<&mut Surface>, frame: u16) -> Result<FrameResult, GobFileError> {
		let mut flags = FrameFlags::empty();
		let mut frame = frame;

		if frame != self.cur_frame {
			flags |= FrameFlags::SEEKED;
			self.seek_frame(i32::from(frame), Whence::Set)?;
		}

		let mut area = self.header.area;
		let mut reader = ByteReader::new(&self.data, FileType::Imd);
		reader.seek(self.pos)?;
		let mut jumps = 0u16;

		loop {
			if frame != 0 {
				if let Some(std_area) = self.header.std_area {
					area = std_area;
					flags |= FrameFlags::RECT_CHANGED;
				}
				if let Some(coords) = self.header.frame_coords.get(usize::from(frame)).filter(|c| c.left != -1) {
					area = Area::from_rect(coords);
					flags |= FrameFlags::RECT_CHANGED;
				}
			}

			let mut code = reader.read_u16()?;

			if code & 0xFFF8 == CODE_METADATA {
				if code == CODE_METADATA {
					reader.skip(2)?;
					code = reader.read_u16()?;
				}
				let end = match code {
					CODE_END => true,
					CODE_SKIP16 => {
						let size = reader.read_u16()?;
						reader.skip(usize::from(size))?;
						true
					}
					CODE_SKIP32 => {
						let size = reader.read_u32()?;
						reader.skip(size as usize)?;
						true
					}
					_ => false,
				};
				if end {
					flags = FrameFlags::END;
					break;
				}
			}

			if code == CODE_PALETTE {
				reader.skip(2)?;
				self.palette = Palette::from_vga_bytes(reader.read_bytes(PALETTE_SIZE)?);
				flags |= FrameFlags::PALETTE;
				code = reader.read_u16()?;
			}

			if code == CODE_JUMP {
				let target = reader.read_u16()?;
				if jumps >= self.header.frame_count {
					log::warn!("IMD: giving up on frame {frame} after {jumps} jumps");
					break;
				}
				jumps += 1;
				if let Some(&pos) = self.header.frame_positions.get(usize::from(target)) {
					log::trace!("IMD: frame {frame} jumps to {target}");
					reader.seek(pos as usize)?;
					self.cur_frame = target;
					frame = target;
					flags |= FrameFlags::JUMPED;
					continue;
				}
				log::debug!("IMD: ignoring jump to frame {target} without a frame index");
				break;
			}

			let size = match code {
				0 => {
					flags |= FrameFlags::EMPTY;
					break;
				}
				CODE_LARGE => reader.read_u32()? as usize + 2,
				size => usize::from(size) + 2,
			};

			let capacity = self.header.frame_data_size + BUFFER_SLACK;
			if size > capacity {
				return Err(GobFileError::ChunkTooLarge {
					file_type: FileType::Imd,
					size,
					capacity,
				});
			}

			let payload = reader.read_bytes(size)?;
			flags |= FrameFlags::DATA;
			if let Some(&kind) = payload.first() {
				flags |= FrameFlags::from_bits(u16::from(kind));
			}

			if let Some(surface) = dest.as_deref_mut()
				&& let Some(target) = clip_area(area, surface.width(), surface.height())
			{
				render::render_frame(payload, &mut self.vid_buffer, surface, target, area, &mut self.palette)?;
				area = target;
			}
			break;
		}

		self.pos = reader.position();
		self.cur_frame = self.cur_frame.wrapping_add(1);

		Ok(FrameResult {
			flags,
			area: area.to_rect(),
		})
	}
}

/// Fits a frame area onto a surface.
///
/// An area running off the right or bottom edge is moved to the left or top
/// edge first and only then cut.
fn clip_area(area: Area, surface_width: u16, surface_height: u16) -> Option<Area> {
	let fit = |start: i16, size: i16, limit: u16| -> Option<(i16, i16)> {
		let limit = i32::from(limit);
		let (mut start, size) = (i32::from(start).max(0), i32::from(size));
		let mut end = start + size;
		if end > limit {
			start = 0;
			end = size;
		}
		end = end.min(limit);
		(end > start).then_some((start as i16, (end - start) as i16))
	};

	let (x, width) = fit(area.x, area.width, surface_width)?;
	let (y, height) = fit(area.y, area.height, surface_height)?;
	Some(Area {
		x,
		y,
		width,
		height,
	})
}
