//! Integration test crate for SnapEdit.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple snapedit crates to verify they work together.

#[cfg(test)]
mod compositing;

#[cfg(test)]
mod editing;

#[cfg(test)]
mod live;

#[cfg(test)]
mod pipeline;
