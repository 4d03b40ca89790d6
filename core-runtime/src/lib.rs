//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the audio player core:
//! - Logging and tracing infrastructure
//! - Runtime error types
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the player crates depend on. It
//! establishes the logging conventions used throughout the workspace; the
//! player itself lives in `core-player`.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
