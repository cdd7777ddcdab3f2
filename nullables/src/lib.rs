//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies are abstracted behind traits in `vestgate-types`.
//! This crate provides test-friendly implementations that return
//! deterministic values and can be controlled programmatically.

pub mod clock;

pub use clock::NullClock;
