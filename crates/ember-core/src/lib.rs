//! Core types for the Ember renderer.
//!
//! This crate provides the foundational pieces used throughout the engine:
//! - The engine-wide error type
//! - Process-wide object identity

pub mod error;
pub mod id;

pub use error::{Error, Result};
pub use id::ObjectId;
