//! Pixel buffers and drawing primitives.

pub mod font;
pub mod packed;
pub mod palette;
pub mod rect;
pub mod surface;

pub use font::Font;
pub use packed::{draw_packed_sprite, encode_packed_sprite};
pub use palette::{PALETTE_COLORS, PALETTE_SIZE, Palette};
pub use rect::{Rect, clamp_to_surface, clip_blit_rect, saturate};
pub use surface::Surface;
