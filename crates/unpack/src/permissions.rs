//! Post-acquisition permission fixes
//!
//! 7-Zip creates directories without access for other users; on linux the
//! bundled `locales` and `resources` directories must be readable by them.

use rtdist_errors::Error;
use rtdist_platform::{fs as platform_fs, Platform, PlatformContext};
use std::path::{Path, PathBuf};

/// Mode applied to the directories in [`LINUX_READABLE_DIRS`]
pub const LINUX_DIR_MODE: &str = "0755";

/// Directories under the output root that must be world readable on linux
pub const LINUX_READABLE_DIRS: [&str; 2] = ["locales", "resources"];

async fn chmod_dir(
    platform: &Platform,
    ctx: &PlatformContext,
    path: PathBuf,
) -> Result<PathBuf, Error> {
    platform_fs::chmod(platform, ctx, &path, LINUX_DIR_MODE).await?;
    Ok(path)
}

/// Normalize directory permissions for `target_platform`.
///
/// Returns the paths that were changed; empty when the platform needs no fix.
///
/// # Errors
///
/// Returns the platform error of the first chmod that fails, unchanged.
pub async fn normalize_permissions(
    platform: &Platform,
    ctx: &PlatformContext,
    out: &Path,
    target_platform: &str,
) -> Result<Vec<PathBuf>, Error> {
    if target_platform != "linux" {
        return Ok(Vec::new());
    }

    let [locales, resources] = LINUX_READABLE_DIRS.map(|dir| out.join(dir));
    let (locales, resources) = tokio::try_join!(
        chmod_dir(platform, ctx, locales),
        chmod_dir(platform, ctx, resources),
    )?;
    Ok(vec![locales, resources])
}
