//! Filesystem operations used to prepare and populate output directories

use async_trait::async_trait;
use rtdist_errors::PlatformError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::core::PlatformContext;

/// Whether a recursive copy may share inodes with its source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HardLinkPolicy {
    /// Hard link files when the filesystem allows it, copying otherwise
    Allow,
    /// Always write an independent copy of every file
    #[default]
    Disabled,
}

/// Predicate deciding whether a source path takes part in a copy
pub type CopyFilter = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Options for [`FilesystemOperations::copy_directory`]
#[derive(Clone, Default)]
pub struct CopyOptions {
    /// `None` copies every entry
    pub filter: Option<CopyFilter>,
    pub hard_links: HardLinkPolicy,
}

impl CopyOptions {
    /// Copy everything, never hard linking
    #[must_use]
    pub fn independent() -> Self {
        Self {
            filter: None,
            hard_links: HardLinkPolicy::Disabled,
        }
    }

    pub(crate) fn includes(&self, path: &Path) -> bool {
        self.filter.as_ref().is_none_or(|filter| filter(path))
    }
}

impl fmt::Debug for CopyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyOptions")
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .field("hard_links", &self.hard_links)
            .finish()
    }
}

/// Trait for filesystem operations
#[async_trait]
pub trait FilesystemOperations: Send + Sync {
    /// Make sure `path` is an existing, empty directory.
    ///
    /// Creates it (with parents) when absent; otherwise deletes everything
    /// inside it while keeping the directory itself.
    async fn ensure_empty_dir(
        &self,
        ctx: &PlatformContext,
        path: &Path,
    ) -> Result<(), PlatformError>;

    /// Recursively copy the tree at `src` into `dst`
    async fn copy_directory(
        &self,
        ctx: &PlatformContext,
        src: &Path,
        dst: &Path,
        options: &CopyOptions,
    ) -> Result<(), PlatformError>;

    /// Set unix permission bits on a path
    async fn set_permissions(
        &self,
        ctx: &PlatformContext,
        path: &Path,
        mode: u32,
    ) -> Result<(), PlatformError>;

    /// Check if a path points to a directory.
    async fn is_dir(&self, ctx: &PlatformContext, path: &Path) -> bool;
}
