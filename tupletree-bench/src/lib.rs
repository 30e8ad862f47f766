//! # Tuple Tree Bench
//!
//! Synthetic schemas for benchmarking resolution and generation.

pub mod schemas;
