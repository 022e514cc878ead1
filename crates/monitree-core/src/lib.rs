//! monitree core: a thread-safe hierarchical metrics registry.
//!
//! A [`Registry`] is a tree of named nodes. Each slot holds either a scalar
//! metric (anything implementing [`Value`]) or a nested sub-registry, and is
//! addressable by a dot-separated path from any ancestor. Every node guards
//! its own entries with its own lock; operations that span several nodes take
//! those locks one at a time, top-down.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Absence is reported as `None`; collisions as `MonitreeError`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod default;
pub mod error;
pub mod metrics;
pub mod mode;
pub mod registry;
pub mod snapshot;
pub mod value;
pub mod visitor;

/// Shared result type.
pub use error::{ErrorKind, MonitreeError, Result};
pub use metrics::{Bool, Float, Func, Int, Str, Uint};
pub use mode::Mode;
pub use registry::Registry;
pub use snapshot::{collect_flat, collect_structured, FlatSnapshot};
pub use value::{Snapshot, Value};
pub use visitor::Visitor;
