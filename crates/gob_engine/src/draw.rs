//! Back-buffer invalidation and flushing.
//!
//! Game code draws into the back surface and reports the touched regions to
//! [`Draw::invalidate_rect`]. [`Draw::blit_invalidated`] then copies only those
//! regions to the front surface. Regions are widened to 16-pixel columns and
//! kept sorted by their top edge, merging vertically overlapping ones.

use gob_types::graphics::{Palette, Rect, Surface, saturate};

use crate::display::Display;
use crate::video::Video;

/// Capacity of the invalidation list.
pub const MAX_INVALIDATED: usize = 30;

/// Cursor index requesting a cursor restore before the next flush.
pub const CURSOR_PENDING: i16 = 4;

/// Front/back surfaces plus the invalidation list.
#[derive(Debug)]
pub struct Draw<D: Display> {
	video: Video<D>,
	front: Surface,
	back: Surface,
	palette: Palette,
	invalidated: Vec<Rect>,
	no_invalidated: bool,
	apply_pal: bool,
	palette_cleared: bool,
	cursor_index: i16,
	cursor_rect: Rect,
}

impl<D: Display> Draw<D> {
	/// Creates screen-sized front and back surfaces.
	pub fn new(video: Video<D>) -> Self {
		let (width, height) = video.size();
		Self {
			video,
			front: Surface::indexed(width, height),
			back: Surface::indexed(width, height),
			palette: Palette::default(),
			invalidated: Vec::with_capacity(MAX_INVALIDATED),
			no_invalidated: true,
			apply_pal: false,
			palette_cleared: false,
			cursor_index: -1,
			cursor_rect: Rect::default(),
		}
	}

	/// Screen flushing layer.
	pub fn video(&self) -> &Video<D> {
		&self.video
	}

	/// Screen flushing layer.
	pub fn video_mut(&mut self) -> &mut Video<D> {
		&mut self.video
	}

	/// Surface shown on screen.
	pub fn front(&self) -> &Surface {
		&self.front
	}

	/// Mutable front buffer.
	pub fn front_mut(&mut self) -> &mut Surface {
		&mut self.front
	}

	/// Surface the game draws into.
	pub fn back(&self) -> &Surface {
		&self.back
	}

	/// Mutable back buffer.
	pub fn back_mut(&mut self) -> &mut Surface {
		&mut self.back
	}

	/// The palette that [`Draw::set_palette`] pushes.
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Mutable working palette.
	pub fn palette_mut(&mut self) -> &mut Palette {
		&mut self.palette
	}

	/// Pending regions, sorted by top edge.
	pub fn invalidated(&self) -> &[Rect] {
		&self.invalidated
	}

	/// Returns `true` if nothing was invalidated since the last flush.
	pub fn no_invalidated(&self) -> bool {
		self.no_invalidated
	}

	/// Marks the invalidation list as stale or fresh.
	pub fn set_no_invalidated(&mut self, value: bool) {
		self.no_invalidated = value;
	}

	/// Returns `true` if the next flush also pushes the palette.
	pub fn apply_pal(&self) -> bool {
		self.apply_pal
	}

	/// Requests the palette be applied on the next flush.
	pub fn set_apply_pal(&mut self, value: bool) {
		self.apply_pal = value;
	}

	/// Cursor slot drawn on the front buffer, `-1` when hidden.
	pub fn cursor_index(&self) -> i16 {
		self.cursor_index
	}

	/// Adds a back-buffer region to the next flush.
	pub fn invalidate_rect(&mut self, left: i16, top: i16, right: i16, bottom: i16) {
		let (left, right) = if left > right { (right, left) } else { (left, right) };
		let (top, bottom) = if top > bottom { (bottom, top) } else { (top, bottom) };

		let (width, height) = self.video.size();
		let max_x = (i32::from(width) - 1) as i16;
		let max_y = (i32::from(height) - 1) as i16;

		if left > max_x || right < 0 || top > max_y || bottom < 0 {
			return;
		}

		self.no_invalidated = false;

		if self.invalidated.len() >= MAX_INVALIDATED {
			log::trace!("Invalidation list full, flushing the whole screen");
			self.invalidated.clear();
			self.invalidated.push(Rect::new(0, 0, max_x, max_y));
			return;
		}

		let left = left.max(0) & !0xF;
		let right = right.min(max_x) | 0xF;
		let top = top.max(0);
		let bottom = bottom.min(max_y);

		for index in 0..self.invalidated.len() {
			let rect = &mut self.invalidated[index];

			if rect.top > top {
				if rect.top > bottom {
					self.invalidated.insert(index, Rect::new(left, top, right, bottom));
					return;
				}

				rect.bottom = rect.bottom.max(bottom);
				rect.left = rect.left.min(left);
				rect.right = rect.right.max(right);
				rect.top = top;
				return;
			}

			if rect.bottom < top {
				continue;
			}

			rect.bottom = rect.bottom.max(bottom);
			rect.left = rect.left.min(left);
			rect.right = rect.right.max(right);
			return;
		}

		self.invalidated.push(Rect::new(left, top, right, bottom));
	}

	/// Copies the invalidated regions to the front surface.
	///
	/// With a palette change pending, the whole screen is copied between a
	/// palette clear and a palette set.
	pub fn blit_invalidated(&mut self) {
		if self.cursor_index == CURSOR_PENDING {
			self.blit_cursor();
		}

		if self.no_invalidated && !self.apply_pal {
			return;
		}

		if self.no_invalidated {
			self.set_palette();
			self.apply_pal = false;
			return;
		}

		if self.apply_pal {
			self.clear_palette();
			self.force_blit(false);
			self.set_palette();
			self.invalidated.clear();
			self.no_invalidated = true;
			self.apply_pal = false;
			return;
		}

		for rect in std::mem::take(&mut self.invalidated) {
			self.front.blit(&self.back, rect.left, rect.top, rect.right, rect.bottom, rect.left, rect.top, -1);
			self.video.dirty_rects_add(rect.left, rect.top, rect.right, rect.bottom);
		}

		self.no_invalidated = true;
		self.apply_pal = false;
	}

	/// Copies the whole back surface to the front one, or the other way round.
	pub fn force_blit(&mut self, backwards: bool) {
		if backwards {
			self.back.blit_at(&self.front, 0, 0, -1);
		} else {
			self.front.blit_at(&self.back, 0, 0, -1);
			self.video.dirty_rects_all();
		}
	}

	/// Draws a cursor sprite over the front surface.
	///
	/// The region it covers is restored from the back surface by
	/// [`Draw::blit_cursor`], which the next flush runs when `index` is
	/// [`CURSOR_PENDING`].
	pub fn set_cursor(&mut self, index: i16, sprite: &Surface, x: i16, y: i16) {
		self.front.blit_at(sprite, x, y, 0);
		let rect = Rect::from_size(x, y, saturate(i32::from(sprite.width())), saturate(i32::from(sprite.height())));
		self.video.dirty_rects_add(rect.left, rect.top, rect.right, rect.bottom);
		self.cursor_rect = rect;
		self.cursor_index = index;
	}

	/// Removes the cursor from the front surface.
	pub fn blit_cursor(&mut self) {
		if self.cursor_index == -1 {
			return;
		}
		self.cursor_index = -1;

		let Rect {
			left,
			top,
			right,
			bottom,
		} = self.cursor_rect;

		if self.no_invalidated {
			self.front.blit(&self.back, left, top, right, bottom, left, top, -1);
			self.video.dirty_rects_add(left, top, right, bottom);
		} else {
			self.invalidate_rect(left, top, right, bottom);
		}
	}

	/// Pushes the palette to the display.
	pub fn set_palette(&mut self) {
		self.video.set_full_palette(&self.palette);
		self.palette_cleared = false;
	}

	/// Blacks out the display palette, once until the next [`Draw::set_palette`].
	pub fn clear_palette(&mut self) {
		if !self.palette_cleared {
			self.palette_cleared = true;
			self.video.clear_palette();
		}
	}

	/// Presents the front surface.
	pub fn retrace(&mut self) {
		self.video.retrace(&self.front);
	}
}
