//! Platform abstraction layer for filesystem and process operations.
//!
//! This crate provides a unified interface for the operations rtdist needs
//! from the host:
//! - Filesystem operations (directory preparation, recursive copy, permissions)
//! - Process execution with proper event emission and error handling
//!
//! Every operation reports `PlatformEvent`s through the `PlatformContext` it
//! is given, so callers see the same event stream whichever implementation
//! is plugged in.

pub mod core;
pub mod filesystem;
pub mod fs;
pub mod implementations;
pub mod process;

pub use core::{Platform, PlatformContext};
pub use implementations::native::NativePlatform;

/// Re-export commonly used types
pub use filesystem::{CopyFilter, CopyOptions, FilesystemOperations, HardLinkPolicy};
pub use process::{CommandOutput, PlatformCommand, ProcessOperations};
