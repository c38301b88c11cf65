//! Foundation module - Core utilities and types
//!
//! - Frame timing
//! - Logging setup

pub mod logging;
pub mod time;
