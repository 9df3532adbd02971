//! Inclusive rectangles and the shared clipping rules for blits and fills.

/// An inclusive rectangle in surface pixel space.
///
/// `right` and `bottom` are part of the rectangle, so a single pixel is
/// `(x, y, x, y)`. A rectangle whose `left > right` or `top > bottom` is
/// degenerate; loaders use that on purpose to say "nothing to draw".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
	/// Leftmost column
	pub left: i16,
	/// Topmost row
	pub top: i16,
	/// Rightmost column (inclusive)
	pub right: i16,
	/// Bottommost row (inclusive)
	pub bottom: i16,
}

impl Rect {
	/// Creates a rectangle from its four edges.
	pub const fn new(left: i16, top: i16, right: i16, bottom: i16) -> Self {
		Self {
			left,
			top,
			right,
			bottom,
		}
	}

	/// Creates a rectangle from a position and a size.
	///
	/// Edges past the `i16` range saturate.
	pub const fn from_size(x: i16, y: i16, width: i16, height: i16) -> Self {
		Self::new(x, y, saturate(x as i32 + width as i32 - 1), saturate(y as i32 + height as i32 - 1))
	}

	/// The "empty area" accumulator start value used for frame bounding boxes.
	pub const fn empty_area() -> Self {
		Self::new(0x7FFF, 0x7FFF, -0x7FFF, -0x7FFF)
	}

	/// Returns `true` if the rectangle spans at least one pixel.
	pub fn is_valid(&self) -> bool {
		self.left <= self.right && self.top <= self.bottom
	}

	/// Width in pixels, `0` for degenerate rectangles.
	pub fn width(&self) -> u16 {
		if self.is_valid() {
			(i32::from(self.right) - i32::from(self.left) + 1) as u16
		} else {
			0
		}
	}

	/// Height in pixels, `0` for degenerate rectangles.
	pub fn height(&self) -> u16 {
		if self.is_valid() {
			(i32::from(self.bottom) - i32::from(self.top) + 1) as u16
		} else {
			0
		}
	}

	/// Grows `self` so it also covers `other`.
	///
	/// Unlike a set union this does not special-case degenerate inputs, which
	/// is what the bounding-box accumulators rely on.
	pub fn union(&self, other: &Rect) -> Rect {
		Rect::new(
			self.left.min(other.left),
			self.top.min(other.top),
			self.right.max(other.right),
			self.bottom.max(other.bottom),
		)
	}

	/// Returns `true` if the point lies inside the rectangle.
	pub fn contains(&self, x: i16, y: i16) -> bool {
		x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
	}

	/// Returns `true` if the two rectangles share at least one pixel.
	pub fn intersects(&self, other: &Rect) -> bool {
		self.left <= other.right &&
			other.left <= self.right &&
			self.top <= other.bottom &&
			other.top <= self.bottom
	}

	/// Returns the rectangle with inverted edge pairs swapped into order.
	pub fn normalized(&self) -> Rect {
		Rect::new(
			self.left.min(self.right),
			self.top.min(self.bottom),
			self.left.max(self.right),
			self.top.max(self.bottom),
		)
	}
}

/// Narrows a coordinate to `i16`, saturating at the bounds.
pub const fn saturate(value: i32) -> i16 {
	if value > i16::MAX as i32 {
		i16::MAX
	} else if value < i16::MIN as i32 {
		i16::MIN
	} else {
		value as i16
	}
}

/// Clips a blit of `src` (in source surface space) to position `(x, y)` of the destination.
///
/// Returns the clipped source rectangle and the adjusted destination position,
/// or `None` if nothing remains to copy.
pub fn clip_blit_rect(
	src: Rect,
	x: i16,
	y: i16,
	src_size: (u16, u16),
	dst_size: (u16, u16),
) -> Option<(Rect, i16, i16)> {
	let (src_width, src_height) = (i32::from(src_size.0), i32::from(src_size.1));
	let (dst_width, dst_height) = (i32::from(dst_size.0), i32::from(dst_size.1));

	let (mut left, mut top) = (i32::from(src.left), i32::from(src.top));
	let (mut right, mut bottom) = (i32::from(src.right), i32::from(src.bottom));
	let (mut x, mut y) = (i32::from(x), i32::from(y));

	if x >= dst_width || y >= dst_height {
		return None;
	}

	if x < 0 {
		left -= x;
		x = 0;
	}
	if y < 0 {
		top -= y;
		y = 0;
	}

	if left >= src_width || top >= src_height || right < 0 || bottom < 0 {
		return None;
	}

	if left < 0 {
		x -= left;
		left = 0;
	}
	if top < 0 {
		y -= top;
		top = 0;
	}

	right = right.min(src_width - 1).min(left + dst_width - x - 1);
	bottom = bottom.min(src_height - 1).min(top + dst_height - y - 1);

	if right < left || bottom < top {
		return None;
	}

	Some((
		Rect::new(left as i16, top as i16, right as i16, bottom as i16),
		x as i16,
		y as i16,
	))
}

/// Swaps inverted edges and clamps a rectangle into a `width`×`height` surface.
///
/// Returns `None` when the rectangle lies entirely outside.
pub fn clamp_to_surface(rect: Rect, width: u16, height: u16) -> Option<Rect> {
	if width == 0 || height == 0 {
		return None;
	}

	let rect = rect.normalized();
	let max_x = (i32::from(width) - 1) as i16;
	let max_y = (i32::from(height) - 1) as i16;

	if rect.left > max_x || rect.top > max_y || rect.right < 0 || rect.bottom < 0 {
		return None;
	}

	Some(Rect::new(
		rect.left.max(0),
		rect.top.max(0),
		rect.right.min(max_x),
		rect.bottom.min(max_y),
	))
}
