//! Common utilities for the quokka parsing core.
//!
//! This crate provides shared infrastructure used by every other crate in
//! the workspace:
//! - **Warning System** - deduplicated, colored terminal output for
//!   non-fatal parse oddities

pub mod warning;
