#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `gob-rs` brings the sprite, animation and video engine of Coktel Vision's Gob games to Rust.
//!
//! The crate is a thin facade over:
//! - [`gob_vfs`]: case-insensitive access to game resource files
//! - [`gob_types`]: codecs and the RXY/CMP/ANI/DEC/IMD file formats
//! - [`gob_engine`]: dirty-rect screen flushing, animated objects and IMD playback
//!
pub use gob_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use gob_dylib;
