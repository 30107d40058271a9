//! Common types and utilities for the tycomp crates.
//!
//! This crate provides foundational types used across all tycomp crates:
//! - String interning (`Atom`, `Interner`)
//! - Solver and completion limits

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Centralized limits and thresholds
pub mod limits;
