//! The two ways of materializing a distribution into the output directory

use rtdist_errors::{Error, UnpackError};
use rtdist_events::{AcquisitionEvent, AppEvent, EventEmitter};
use rtdist_net::{ArchiveFetcher, FetchOptions};
use rtdist_platform::{fs as platform_fs, CopyOptions, Platform, PlatformContext};
use std::path::{Path, PathBuf};

use crate::extract::ArchiveExtractor;

/// Fetch the archive while clearing `out`, then extract it into `out`.
///
/// Both concurrent steps run to completion, so `out` is always cleared (or
/// created) even when the fetch fails. Either step failing aborts before
/// extraction and the fetch error wins when both fail. `out` is not restored
/// after a fetch failure.
///
/// # Errors
///
/// Propagates fetcher, filesystem and extractor errors unchanged.
pub async fn download_and_extract(
    fetcher: &dyn ArchiveFetcher,
    extractor: &dyn ArchiveExtractor,
    platform: &Platform,
    ctx: &PlatformContext,
    options: &FetchOptions,
    out: &Path,
) -> Result<PathBuf, Error> {
    let (fetched, prepared) = tokio::join!(
        fetcher.fetch(options),
        platform_fs::ensure_empty_dir(platform, ctx, out),
    );
    let archive = fetched?;
    prepared?;

    ctx.emit(AppEvent::Acquisition(AcquisitionEvent::ArchiveResolved {
        archive: archive.clone(),
    }));
    ctx.emit(AppEvent::Acquisition(AcquisitionEvent::ExtractionStarted {
        archive: archive.clone(),
        destination: out.to_path_buf(),
    }));

    extractor.extract(&archive, out).await?;
    Ok(archive)
}

/// Replace the contents of `out` with an independent copy of `source`
/// placed at `destination`.
///
/// # Errors
///
/// Returns `UnpackError::SourceNotFound` when `source` is not a directory;
/// filesystem errors propagate unchanged.
pub async fn copy_local(
    platform: &Platform,
    ctx: &PlatformContext,
    source: &Path,
    destination: &Path,
    out: &Path,
) -> Result<(), Error> {
    if !platform.filesystem().is_dir(ctx, source).await {
        return Err(UnpackError::SourceNotFound {
            path: source.display().to_string(),
        }
        .into());
    }

    ctx.emit(AppEvent::Acquisition(AcquisitionEvent::CopyStarted {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
    }));

    platform_fs::ensure_empty_dir(platform, ctx, out).await?;
    platform_fs::copy_directory(
        platform,
        ctx,
        source,
        destination,
        &CopyOptions::independent(),
    )
    .await
}
