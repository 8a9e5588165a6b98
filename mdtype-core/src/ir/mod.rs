//! Document tree consumed by the Typst conversion engine.
//!
//! The tree is produced by the Markdown adapter (see [`crate::formats::markdown`]) and is
//! read-only from then on: the converter only walks it and emits text.

pub mod nodes;
