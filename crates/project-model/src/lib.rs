//! Recut Project Model
//!
//! Defines the core data contracts for Recut projects:
//! - **Events:** Recorded user input in source time (clicks, drags, typing, ...)
//! - **Timeline:** Output windows over the recording plus zoom and spotlight tracks
//! - **Project:** Metadata, source media references, editor settings and storage
//!
//! Times are milliseconds; ids are opaque strings.

pub mod event;
pub mod project;
pub mod timeline;
pub mod viewport;

pub use event::*;
pub use project::*;
pub use timeline::*;
pub use viewport::*;
