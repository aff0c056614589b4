//! Filesystem operations implemented with `tokio::fs`

use async_trait::async_trait;
use rtdist_errors::PlatformError;
use rtdist_events::{
    events::{
        FailureContext, PlatformEvent, PlatformOperationContext, PlatformOperationKind,
        PlatformOperationMetrics,
    },
    AppEvent,
};
use std::convert::TryFrom;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;

use crate::core::PlatformContext;
use crate::filesystem::{CopyOptions, FilesystemOperations, HardLinkPolicy};

/// Native implementation of filesystem operations
pub struct NativeFilesystemOperations;

impl NativeFilesystemOperations {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeFilesystemOperations {
    fn default() -> Self {
        Self::new()
    }
}

fn filesystem_context(
    operation: &str,
    source: Option<&Path>,
    target: &Path,
) -> PlatformOperationContext {
    PlatformOperationContext {
        kind: PlatformOperationKind::Filesystem,
        operation: operation.to_string(),
        target: Some(target.to_path_buf()),
        source: source.map(Path::to_path_buf),
        command: None,
    }
}

fn filesystem_metrics(duration: Duration, changes: Option<Vec<String>>) -> PlatformOperationMetrics {
    PlatformOperationMetrics {
        duration_ms: Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)),
        exit_code: None,
        stdout_bytes: None,
        stderr_bytes: None,
        changes,
    }
}

/// Run a filesystem operation between started/completed/failed platform events
async fn instrumented<T, F>(
    ctx: &PlatformContext,
    operation: &str,
    source: Option<&Path>,
    target: &Path,
    fut: F,
) -> Result<T, PlatformError>
where
    F: std::future::Future<Output = io::Result<T>>,
{
    let start = Instant::now();
    ctx.emit_event(AppEvent::Platform(PlatformEvent::OperationStarted {
        context: filesystem_context(operation, source, target),
    }));

    let result = fut.await.map_err(|e| match e.kind() {
        io::ErrorKind::PermissionDenied => PlatformError::PermissionDenied {
            operation: operation.to_string(),
            message: format!("{}: {e}", target.display()),
        },
        _ => PlatformError::FilesystemOperationFailed {
            operation: operation.to_string(),
            message: format!("{}: {e}", target.display()),
        },
    });

    let duration = start.elapsed();
    match &result {
        Ok(_) => ctx.emit_event(AppEvent::Platform(PlatformEvent::OperationCompleted {
            context: filesystem_context(operation, source, target),
            metrics: Some(filesystem_metrics(duration, None)),
        })),
        Err(e) => ctx.emit_event(AppEvent::Platform(PlatformEvent::OperationFailed {
            context: filesystem_context(operation, source, target),
            failure: FailureContext::from_error(e),
            metrics: Some(filesystem_metrics(duration, None)),
        })),
    }

    result
}

async fn clear_directory(path: &Path) -> io::Result<()> {
    let mut entries = fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let entry_path = entry.path();
        if entry.file_type().await?.is_dir() {
            fs::remove_dir_all(&entry_path).await?;
        } else {
            fs::remove_file(&entry_path).await?;
        }
    }
    Ok(())
}

/// A symlinked `path` is followed and its target directory is cleared
async fn ensure_empty(path: &Path) -> io::Result<()> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => clear_directory(path).await,
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "path exists and is not a directory",
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => fs::create_dir_all(path).await,
        Err(e) => Err(e),
    }
}

async fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let link_target = fs::read_link(src).await?;
    #[cfg(unix)]
    {
        fs::symlink(&link_target, dst).await
    }
    #[cfg(windows)]
    {
        if fs::metadata(src).await.map(|m| m.is_dir()).unwrap_or(false) {
            fs::symlink_dir(&link_target, dst).await
        } else {
            fs::symlink_file(&link_target, dst).await
        }
    }
}

async fn copy_file(src: &Path, dst: &Path, policy: HardLinkPolicy) -> io::Result<()> {
    if policy == HardLinkPolicy::Allow && fs::hard_link(src, dst).await.is_ok() {
        return Ok(());
    }
    fs::copy(src, dst).await.map(|_| ())
}

/// Walk `src` depth first, mirroring directories, files and symlinks into `dst`
async fn copy_tree(src: &Path, dst: &Path, options: &CopyOptions) -> io::Result<u64> {
    let mut copied = 0u64;
    let mut pending: Vec<(PathBuf, PathBuf)> = vec![(src.to_path_buf(), dst.to_path_buf())];

    fs::create_dir_all(dst).await?;

    while let Some((from_dir, to_dir)) = pending.pop() {
        let mut entries = fs::read_dir(&from_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let from = entry.path();
            if !options.includes(&from) {
                continue;
            }
            let to = to_dir.join(entry.file_name());
            let file_type = entry.file_type().await?;

            if file_type.is_symlink() {
                copy_symlink(&from, &to).await?;
            } else if file_type.is_dir() {
                fs::create_dir_all(&to).await?;
                pending.push((from, to));
            } else {
                copy_file(&from, &to, options.hard_links).await?;
            }
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(unix)]
async fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await
}

#[cfg(not(unix))]
async fn apply_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "unix permission bits are not supported on this platform",
    ))
}

#[async_trait]
impl FilesystemOperations for NativeFilesystemOperations {
    async fn ensure_empty_dir(
        &self,
        ctx: &PlatformContext,
        path: &Path,
    ) -> Result<(), PlatformError> {
        instrumented(ctx, "ensure_empty_dir", None, path, ensure_empty(path)).await
    }

    async fn copy_directory(
        &self,
        ctx: &PlatformContext,
        src: &Path,
        dst: &Path,
        options: &CopyOptions,
    ) -> Result<(), PlatformError> {
        instrumented(
            ctx,
            "copy_directory",
            Some(src),
            dst,
            copy_tree(src, dst, options),
        )
        .await
        .map(|_| ())
    }

    async fn set_permissions(
        &self,
        ctx: &PlatformContext,
        path: &Path,
        mode: u32,
    ) -> Result<(), PlatformError> {
        if cfg!(not(unix)) {
            return Err(PlatformError::CapabilityUnavailable {
                capability: "unix permissions".to_string(),
            });
        }
        instrumented(ctx, "set_permissions", None, path, apply_mode(path, mode)).await
    }

    async fn is_dir(&self, _ctx: &PlatformContext, path: &Path) -> bool {
        fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
    }
}
