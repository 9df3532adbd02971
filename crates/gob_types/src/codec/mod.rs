//! Decompressors shared by sprites, frames and packed resources.

pub mod lz77;

pub use lz77::{Mode as Lz77Mode, decompress, unpack_data, uncompress_sprite};
