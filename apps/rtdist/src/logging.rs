//! Structured logging integration for events
//!
//! Converts domain events into tracing records with structured fields so
//! JSON logs can be consumed by observability tools.

use rtdist_events::{
    AcquisitionEvent, AppEvent, ConfigEvent, DownloadEvent, EventMessage, PlatformEvent,
};
use tracing::{debug, error, info, warn};

/// Log an event at its own level with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    match &message.event {
        AppEvent::Config(config) => {
            let (option, key) = match config {
                ConfigEvent::DeprecatedOption { option, .. } => (option.as_str(), None),
                ConfigEvent::OptionOverridden { option, key, .. } => {
                    (option.as_str(), Some(key.as_str()))
                }
            };
            warn!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                option = option,
                key = ?key,
                "{}",
                config.message()
            );
        }

        AppEvent::Download(download) => match download {
            DownloadEvent::CacheHit { url, path } => {
                debug!(
                    source = meta.source.as_str(),
                    url = %url,
                    path = %path.display(),
                    "Archive served from cache"
                );
            }
            DownloadEvent::Started { url, total_bytes } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    url = %url,
                    total_bytes = ?total_bytes,
                    "Download started"
                );
            }
            DownloadEvent::Completed {
                url,
                path,
                bytes_downloaded,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    url = %url,
                    path = %path.display(),
                    bytes_downloaded = bytes_downloaded,
                    "Download completed"
                );
            }
            DownloadEvent::Failed { url, failure } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    url = %url,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Download failed"
                );
            }
        },

        AppEvent::Acquisition(acquisition) => match acquisition {
            AcquisitionEvent::Started {
                variant,
                platform,
                arch,
                version,
                method,
                output_dir,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    variant = %variant,
                    platform = %platform,
                    arch = %arch,
                    version = %version,
                    method = ?method,
                    output_dir = %output_dir.display(),
                    "Acquisition started"
                );
            }
            AcquisitionEvent::ArchiveResolved { archive } => {
                info!(source = meta.source.as_str(), archive = %archive.display(), "Archive resolved");
            }
            AcquisitionEvent::ExtractionStarted {
                archive,
                destination,
            } => {
                info!(
                    source = meta.source.as_str(),
                    archive = %archive.display(),
                    destination = %destination.display(),
                    "Extraction started"
                );
            }
            AcquisitionEvent::CopyStarted {
                source,
                destination,
            } => {
                info!(
                    source = meta.source.as_str(),
                    from = %source.display(),
                    to = %destination.display(),
                    "Copying distribution"
                );
            }
            AcquisitionEvent::PermissionsNormalized { paths, mode } => {
                info!(
                    source = meta.source.as_str(),
                    paths = ?paths,
                    mode = %mode,
                    "Permissions normalized"
                );
            }
            AcquisitionEvent::Completed {
                method,
                output_dir,
                duration_ms,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    method = ?method,
                    output_dir = %output_dir.display(),
                    duration_ms = duration_ms,
                    "Acquisition completed"
                );
            }
            AcquisitionEvent::Failed {
                method,
                output_dir,
                failure,
            } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    method = ?method,
                    output_dir = %output_dir.display(),
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Acquisition failed"
                );
            }
        },

        AppEvent::Platform(platform) => match platform {
            PlatformEvent::OperationStarted { context } => {
                debug!(
                    source = meta.source.as_str(),
                    operation = %context.operation,
                    kind = ?context.kind,
                    target = ?context.target,
                    command = ?context.command.as_ref().map(|c| &c.program),
                    "Platform operation started"
                );
            }
            PlatformEvent::OperationCompleted { context, metrics } => {
                debug!(
                    source = meta.source.as_str(),
                    operation = %context.operation,
                    kind = ?context.kind,
                    target = ?context.target,
                    duration_ms = ?metrics.as_ref().and_then(|m| m.duration_ms),
                    exit_code = ?metrics.as_ref().and_then(|m| m.exit_code),
                    "Platform operation completed"
                );
            }
            PlatformEvent::OperationFailed {
                context,
                failure,
                metrics,
            } => {
                error!(
                    source = meta.source.as_str(),
                    operation = %context.operation,
                    kind = ?context.kind,
                    target = ?context.target,
                    duration_ms = ?metrics.as_ref().and_then(|m| m.duration_ms),
                    code = ?failure.code,
                    message = %failure.message,
                    "Platform operation failed"
                );
            }
        },
    }
}
