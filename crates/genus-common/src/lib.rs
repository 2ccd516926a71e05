//! Common types and utilities for the genus inference engine.
//!
//! This crate provides foundational types used across the genus crates:
//! - String interning (`Atom`, `Interner`, `ShardedInterner`)
//! - Centralized limits and thresholds

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner, ShardedInterner};

// Centralized limits and thresholds
pub mod limits;
