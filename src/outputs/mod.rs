//! Output generation for assembled feeds.
//!
//! # Submodules
//!
//! - [`json`]: Serializes a [`crate::models::Feed`] to stdout or a file
//!
//! Rendering to RSS or Atom is left to whatever consumes the JSON.

pub mod json;
