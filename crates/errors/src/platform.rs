//! Platform-specific operation errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors that can occur during platform-specific operations
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("filesystem operation failed: {operation} - {message}")]
    FilesystemOperationFailed { operation: String, message: String },

    #[error("process execution failed: {command} - {message}")]
    ProcessExecutionFailed { command: String, message: String },

    #[error("platform capability not available: {capability}")]
    CapabilityUnavailable { capability: String },

    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("invalid permission mode: {mode}")]
    InvalidMode { mode: String },

    #[error("permission denied: {operation} - {message}")]
    PermissionDenied { operation: String, message: String },
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CommandNotFound { .. } => {
                Some("Install p7zip or point extract.program at a 7za binary.")
            }
            Self::PermissionDenied { .. } => {
                Some("Adjust filesystem permissions on the output directory and retry.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::FilesystemOperationFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::FilesystemOperationFailed { .. } => "platform.filesystem_failed",
            Self::ProcessExecutionFailed { .. } => "platform.process_failed",
            Self::CapabilityUnavailable { .. } => "platform.capability_unavailable",
            Self::CommandNotFound { .. } => "platform.command_not_found",
            Self::InvalidMode { .. } => "platform.invalid_mode",
            Self::PermissionDenied { .. } => "platform.permission_denied",
        };
        Some(code)
    }
}
