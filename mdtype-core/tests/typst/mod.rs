//! Typst conversion tests
//!
//! End-to-end tests from Markdown text to Typst markup.

mod blocks;
mod kitchensink;
