use serde::{Deserialize, Serialize};

use crate::EventSource;
use rtdist_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code, when the error carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod acquisition;
pub mod config;
pub mod download;
pub mod platform;

pub use acquisition::*;
pub use config::*;
pub use download::*;
pub use platform::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Configuration normalization notices (deprecations, overrides)
    Config(ConfigEvent),

    /// Archive download events
    Download(DownloadEvent),

    /// Distribution acquisition events (download+extract or copy)
    Acquisition(AcquisitionEvent),

    /// Filesystem and process operation events
    Platform(PlatformEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::Config(_) => EventSource::CONFIG,
            Self::Download(_) => EventSource::DOWNLOAD,
            Self::Acquisition(_) => EventSource::ACQUISITION,
            Self::Platform(_) => EventSource::PLATFORM,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::Download(DownloadEvent::Failed { .. })
            | Self::Acquisition(AcquisitionEvent::Failed { .. })
            | Self::Platform(PlatformEvent::OperationFailed { .. }) => Level::ERROR,

            Self::Config(_) => Level::WARN,

            Self::Platform(
                PlatformEvent::OperationStarted { .. } | PlatformEvent::OperationCompleted { .. },
            )
            | Self::Download(DownloadEvent::CacheHit { .. }) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::Config(_) => "rtdist::events::config",
            Self::Download(_) => "rtdist::events::download",
            Self::Acquisition(_) => "rtdist::events::acquisition",
            Self::Platform(_) => "rtdist::events::platform",
        }
    }
}
