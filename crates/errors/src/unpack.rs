//! Distribution acquisition error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum UnpackError {
    #[error("extraction of {archive} failed with exit code {exit_code:?}: {stderr}")]
    ExtractionFailed {
        archive: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("local distribution not found: {path}")]
    SourceNotFound { path: String },
}

impl UserFacingError for UnpackError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ExtractionFailed { .. } => {
                Some("The output directory may hold a partial tree; remove it or rerun.")
            }
            Self::SourceNotFound { .. } => {
                Some("Check dist-dir in the configuration points at an unpacked distribution.")
            }
        }
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ExtractionFailed { .. } => "unpack.extraction_failed",
            Self::SourceNotFound { .. } => "unpack.source_not_found",
        };
        Some(code)
    }
}
