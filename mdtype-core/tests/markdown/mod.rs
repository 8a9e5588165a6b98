//! Markdown adapter tests
//!
//! Tests for Markdown → document tree conversion.

mod import;
