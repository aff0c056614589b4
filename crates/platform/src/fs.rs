//! Filesystem convenience helpers backed by the platform abstraction.
//!
//! These functions provide a stable API returning `rtdist_errors::Error`
//! while delegating to whichever `FilesystemOperations` the `Platform` carries.

use crate::core::{Platform, PlatformContext};
use crate::filesystem::CopyOptions;
use rtdist_errors::{Error, PlatformError};
use std::path::Path;

/// Result type for filesystem operations
pub type Result<T> = std::result::Result<T, Error>;

/// Parse an octal permission string such as `"0755"` or `"755"`
///
/// # Errors
///
/// Returns `PlatformError::InvalidMode` when the string is not octal or sets
/// bits beyond `0o7777`.
pub fn parse_mode(mode: &str) -> Result<u32> {
    let digits = mode.trim();
    let digits = digits.strip_prefix("0o").unwrap_or(digits);
    let invalid = || PlatformError::InvalidMode {
        mode: mode.to_string(),
    };

    if digits.is_empty() {
        return Err(invalid().into());
    }
    let value = u32::from_str_radix(digits, 8).map_err(|_| invalid())?;
    if value > 0o7777 {
        return Err(invalid().into());
    }
    Ok(value)
}

/// Change the permission bits of `path` using an octal mode string
///
/// # Errors
///
/// Returns an error if the mode is invalid or the underlying call fails.
pub async fn chmod(
    platform: &Platform,
    ctx: &PlatformContext,
    path: &Path,
    mode: &str,
) -> Result<()> {
    let mode = parse_mode(mode)?;
    platform
        .filesystem()
        .set_permissions(ctx, path, mode)
        .await
        .map_err(Error::from)
}

/// Ensure `path` is an existing empty directory
///
/// # Errors
///
/// Returns an error if the directory cannot be created or cleared.
pub async fn ensure_empty_dir(
    platform: &Platform,
    ctx: &PlatformContext,
    path: &Path,
) -> Result<()> {
    platform
        .filesystem()
        .ensure_empty_dir(ctx, path)
        .await
        .map_err(Error::from)
}

/// Recursively copy `src` into `dst`
///
/// # Errors
///
/// Returns an error if any entry cannot be copied.
pub async fn copy_directory(
    platform: &Platform,
    ctx: &PlatformContext,
    src: &Path,
    dst: &Path,
    options: &CopyOptions,
) -> Result<()> {
    platform
        .filesystem()
        .copy_directory(ctx, src, dst, options)
        .await
        .map_err(Error::from)
}
