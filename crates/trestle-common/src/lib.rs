//! Common utilities for the Trestle table layout engine.
//!
//! This crate provides shared infrastructure used by every Trestle crate:
//! - **Warning System** - deduplicated authoring warnings routed through `tracing`

pub mod warning;
