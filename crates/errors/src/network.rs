//! Network-related error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    #[error("connection timeout to {url}")]
    Timeout { url: String },

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error {status} for {url}")]
    HttpError { status: u16, url: String },

    #[error("SSL/TLS error: {0}")]
    TlsError(String),
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::HttpError { status: 404, .. } => {
                Some("Check the version, platform and arch, or the configured mirror.")
            }
            Self::TlsError(_) => Some("Set strict-ssl = false if the mirror uses a private CA."),
            Self::InvalidUrl(_) => Some("Check the mirror URL in the download options."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::ConnectionRefused(_) | Self::DownloadFailed(_) => true,
            Self::HttpError { status, .. } => *status >= 500,
            Self::InvalidUrl(_) | Self::TlsError(_) => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Timeout { .. } => "network.timeout",
            Self::DownloadFailed(_) => "network.download_failed",
            Self::ConnectionRefused(_) => "network.connection_refused",
            Self::InvalidUrl(_) => "network.invalid_url",
            Self::HttpError { .. } => "network.http_error",
            Self::TlsError(_) => "network.tls_error",
        };
        Some(code)
    }
}
