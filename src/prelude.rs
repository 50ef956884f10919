//! Prelude module for loose_date crate.
//!
//! Re-exports the derive macros the crate uses from derive_more.

pub use derive_more::Display;
