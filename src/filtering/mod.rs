// src/filtering/mod.rs

//! Provides standalone functions for tree path filtering.
//!
//! These functions are used by providers when narrowing a cached, unfiltered
//! tree listing to the caller's extensions. They are exposed publicly to allow
//! for their use in other contexts.

mod extension;

pub use extension::{filter_paths, matches_extensions};
