//! STACKS Application Library
//!
//! This library provides the application modules for the STACKS bookstore
//! service.

pub mod modules;

/// Re-export commonly used types
pub use modules::register_all;
