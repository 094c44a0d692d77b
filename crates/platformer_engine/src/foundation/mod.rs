//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and axis-aligned boxes
//! - Logging utilities

pub mod math;
pub mod logging;
