//! Periodic reporting of registry contents.
//!
//! Only the log reporter exists: it writes the metrics that moved since the
//! previous tick as one JSON log line.

pub mod log;

pub use log::LogReporter;
