//! Common utilities for the h5 tokenizer workspace.
//!
//! This crate provides shared infrastructure used by the tokenizer and the CLI:
//! - **Warning System** - deduplicated, coloured diagnostics on stderr

pub mod warning;
