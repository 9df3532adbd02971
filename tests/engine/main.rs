//! End-to-end tests for `gob-rs`
//!
//! Every test builds its game files in memory and drives the public API the
//! way the game loop does: load through a [`MemoryArchive`], draw into
//! surfaces and flush through a [`MemoryDisplay`].

mod animation;
mod builders;
mod compose;
mod invalidation;
mod playback;

use gob_rs::prelude::*;

/// A 16×8 screen with an empty invalidation list.
fn small_screen() -> Draw<MemoryDisplay> {
	Draw::new(Video::new(MemoryDisplay::new(16, 8), 16, 8))
}
