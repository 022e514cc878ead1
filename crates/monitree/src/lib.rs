//! Top-level facade crate for monitree.
//!
//! Re-exports the core registry and the agent library so users can depend on a single crate.

pub mod core {
    pub use monitree_core::*;
}

pub mod agent {
    pub use monitree_agent::*;
}
