//! Runtime player for one ANI animation or one CMP part.

use std::rc::Rc;

use gob_types::file::{AniFile, CmpFile};
use gob_types::graphics::{Rect, Surface, saturate};

/// How an animation behaves when it completes a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
	/// Loop forever
	#[default]
	Continuous,
	/// Stop and hide after one cycle
	Once,
}

#[derive(Debug, Clone)]
enum Source {
	Ani(Rc<AniFile>),
	/// A single CMP part, selected by the animation index
	Cmp(Rc<CmpFile>),
}

/// An animated object on screen.
///
/// Drawing saves the pixels under the object first, so [`AniObject::clear`]
/// can put them back. Callers clear the previous frame before drawing the
/// next one.
#[derive(Debug, Clone)]
pub struct AniObject {
	source: Source,
	animation: u16,
	frame: u16,
	mode: Mode,
	visible: bool,
	paused: bool,
	x: i16,
	y: i16,
	background: Option<Surface>,
	background_rect: Rect,
	drawn: bool,
}

impl AniObject {
	/// Plays animations of an ANI file, starting with animation 0.
	pub fn new(ani: Rc<AniFile>) -> Self {
		let mut object = Self::with_source(Source::Ani(ani));
		object.set_position_default();
		object
	}

	/// Shows parts of a CMP sheet; the animation index selects the part.
	pub fn from_cmp(cmp: Rc<CmpFile>) -> Self {
		Self::with_source(Source::Cmp(cmp))
	}

	fn with_source(source: Source) -> Self {
		Self {
			source,
			animation: 0,
			frame: 0,
			mode: Mode::Continuous,
			visible: false,
			paused: false,
			x: 0,
			y: 0,
			background: None,
			background_rect: Rect::default(),
			drawn: false,
		}
	}

	fn current(&self) -> Option<&gob_types::file::Animation> {
		match &self.source {
			Source::Ani(ani) => ani.animation(self.animation),
			Source::Cmp(_) => None,
		}
	}

	/// Whether the object is drawn.
	pub fn is_visible(&self) -> bool {
		self.visible
	}

	/// Shows or hides the object.
	pub fn set_visible(&mut self, visible: bool) {
		self.visible = visible;
	}

	/// Whether [`advance`](Self::advance) is frozen.
	pub fn is_paused(&self) -> bool {
		self.paused
	}

	/// Freezes or resumes the animation.
	pub fn set_paused(&mut self, paused: bool) {
		self.paused = paused;
	}

	/// Playback mode.
	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// Sets the playback mode.
	pub fn set_mode(&mut self, mode: Mode) {
		self.mode = mode;
	}

	/// Current animation index.
	pub fn animation(&self) -> u16 {
		self.animation
	}

	/// Switches to another animation and rewinds it.
	pub fn set_animation(&mut self, animation: u16) {
		self.animation = animation;
		self.frame = 0;
	}

	/// Current frame within the animation.
	pub fn frame(&self) -> u16 {
		self.frame
	}

	/// Jumps to a frame, wrapping around the frame count.
	pub fn set_frame(&mut self, frame: u16) {
		if let Some(anim) = self.current() {
			self.frame = frame % anim.frame_count.max(1);
		}
	}

	/// Goes back to the first frame.
	pub fn rewind(&mut self) {
		self.frame = 0;
	}

	/// Position of the object, before frame deltas.
	pub fn position(&self) -> (i16, i16) {
		(self.x, self.y)
	}

	/// Moves the object.
	pub fn set_position(&mut self, x: i16, y: i16) {
		self.x = x;
		self.y = y;
	}

	/// Moves to the animation's own position. CMP parts have none.
	pub fn set_position_default(&mut self) {
		if let Some(anim) = self.current() {
			(self.x, self.y) = (anim.x, anim.y);
		}
	}

	/// Top-left corner of the frame `n` frames ahead.
	///
	/// Completed cycles move the position by the animation delta; in
	/// [`Mode::Once`] at most one cycle counts.
	pub fn frame_position(&self, n: u16) -> Option<(i16, i16)> {
		let Source::Ani(_) = &self.source else {
			return Some(self.position());
		};
		let anim = self.current()?;
		if self.frame >= anim.frame_count {
			return None;
		}

		let n = if self.paused { 0 } else { u32::from(n) };
		let ahead = u32::from(self.frame) + n;
		let count = u32::from(anim.frame_count);
		let mut cycles = ahead / count;
		if self.mode == Mode::Once {
			cycles = cycles.min(1);
		}

		let area = anim.frame_areas.get((ahead % count) as usize)?;
		let cycles = cycles as i16;
		Some((
			self.x.wrapping_add(area.left).wrapping_add(cycles.wrapping_mul(anim.delta_x)),
			self.y.wrapping_add(area.top).wrapping_add(cycles.wrapping_mul(anim.delta_y)),
		))
	}

	/// Size of the frame `n` frames ahead.
	pub fn frame_size(&self, n: u16) -> Option<(u16, u16)> {
		let anim = match &self.source {
			Source::Cmp(cmp) => return Some(cmp.part_size(self.animation)),
			Source::Ani(_) => self.current()?,
		};
		if self.frame >= anim.frame_count {
			return None;
		}

		let n = if self.paused { 0 } else { u32::from(n) };
		let frame = (u32::from(self.frame) + n) % u32::from(anim.frame_count);
		let area = anim.frame_areas.get(frame as usize)?;
		Some((area.width(), area.height()))
	}

	/// Returns `true` if the point lies on the current frame.
	///
	/// The right and bottom edges are one pixel generous.
	pub fn is_in(&self, x: i16, y: i16) -> bool {
		if !self.visible {
			return false;
		}
		let (Some((frame_x, frame_y)), Some((width, height))) = (self.frame_position(0), self.frame_size(0)) else {
			return false;
		};

		let (x, y) = (i32::from(x), i32::from(y));
		let (frame_x, frame_y) = (i32::from(frame_x), i32::from(frame_y));
		x >= frame_x && y >= frame_y && x <= frame_x + i32::from(width) && y <= frame_y + i32::from(height)
	}

	/// Returns `true` if any corner of `other`'s frame lies on this one.
	pub fn is_in_object(&self, other: &AniObject) -> bool {
		if !self.visible || !other.visible {
			return false;
		}
		let (Some((x, y)), Some((width, height))) = (other.frame_position(0), other.frame_size(0)) else {
			return false;
		};

		let right = x.wrapping_add(width as i16).wrapping_sub(1);
		let bottom = y.wrapping_add(height as i16).wrapping_sub(1);
		self.is_in(x, y) || self.is_in(right, y) || self.is_in(x, bottom) || self.is_in(right, bottom)
	}

	/// Returns `true` on the last frame of the cycle.
	pub fn last_frame(&self) -> bool {
		match &self.source {
			Source::Cmp(_) => true,
			Source::Ani(_) => self.current().is_none_or(|anim| self.frame + 1 >= anim.frame_count),
		}
	}

	/// Steps to the next frame.
	pub fn advance(&mut self) {
		if self.paused {
			return;
		}
		let Some(anim) = self.current() else {
			return;
		};
		let (count, delta_x, delta_y) = (anim.frame_count.max(1), anim.delta_x, anim.delta_y);

		self.frame = (self.frame + 1) % count;
		if self.frame == 0 {
			self.x = self.x.wrapping_add(delta_x);
			self.y = self.y.wrapping_add(delta_y);
			if self.mode == Mode::Once {
				self.paused = true;
				self.visible = false;
			}
		}
	}

	/// Draws the current frame, saving what was underneath.
	///
	/// Returns the region that changed, clamped to `dest`, or `None` if
	/// nothing was drawn.
	pub fn draw(&mut self, dest: &mut Surface) -> Option<Rect> {
		if !self.visible || dest.width() == 0 || dest.height() == 0 {
			return None;
		}

		let (area, max_size) = match &self.source {
			Source::Ani(ani) => {
				let anim = ani.animation(self.animation)?;
				if self.frame >= anim.frame_count {
					return None;
				}
				(*anim.frame_areas.get(usize::from(self.frame))?, ani.max_size())
			}
			Source::Cmp(cmp) => {
				let (width, height) = cmp.part_size(self.animation);
				(Rect::from_size(0, 0, saturate(i32::from(width)), saturate(i32::from(height))), cmp.max_size())
			}
		};

		let clip = |value: i16, offset: i16, size: u16| {
			saturate((i32::from(value) + i32::from(offset)).clamp(0, i32::from(size) - 1))
		};
		let rect = Rect::new(
			clip(area.left, self.x, dest.width()),
			clip(area.top, self.y, dest.height()),
			clip(area.right, self.x, dest.width()),
			clip(area.bottom, self.y, dest.height()),
		);
		if !area.is_valid() || !rect.is_valid() {
			return None;
		}

		let background = self
			.background
			.get_or_insert_with(|| Surface::new(max_size.0.max(1), max_size.1.max(1), dest.bpp()));
		background.blit(dest, rect.left, rect.top, rect.right, rect.bottom, 0, 0, -1);

		match &self.source {
			Source::Ani(ani) => ani.draw(dest, self.animation, self.frame, self.x, self.y),
			Source::Cmp(cmp) => cmp.draw(dest, self.animation, self.x, self.y, 0),
		}

		self.background_rect = rect;
		self.drawn = true;
		Some(rect)
	}

	/// Restores what the last [`AniObject::draw`] covered.
	pub fn clear(&mut self, dest: &mut Surface) -> Option<Rect> {
		if !self.drawn {
			return None;
		}
		let background = self.background.as_ref()?;
		let rect = self.background_rect;

		dest.blit(
			background,
			0,
			0,
			rect.right - rect.left,
			rect.bottom - rect.top,
			rect.left,
			rect.top,
			-1,
		);
		self.drawn = false;
		Some(rect)
	}
}
