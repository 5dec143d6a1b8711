//! Stowage operations.
//!
//! This module contains the implementations of all facade operations,
//! organized into submodules by category. Each submodule exposes methods
//! on [`crate::provider::Stowage`].

pub mod bucket;
pub mod delete;
pub mod download;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;
