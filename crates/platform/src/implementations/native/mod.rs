//! Host platform implementation backed by tokio

pub mod filesystem;
pub mod process;

use std::sync::Arc;

/// Platform implementation for the host operating system
pub struct NativePlatform;

impl NativePlatform {
    /// Create a new native platform instance
    #[allow(clippy::new_ret_no_self)]
    #[must_use]
    pub fn new() -> crate::core::Platform {
        use filesystem::NativeFilesystemOperations;
        use process::NativeProcessOperations;

        crate::core::Platform::new(
            Arc::new(NativeFilesystemOperations::new()),
            Arc::new(NativeProcessOperations::new()),
        )
    }
}
