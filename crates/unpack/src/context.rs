//! The packaging pipeline's view exposed to the unpacker

use rtdist_config::Config;
use std::path::{Path, PathBuf};

/// Packaging state the unpacker needs: configuration and the mapping from
/// distribution roots to the directories actually copied
pub trait PackagingContext: Send + Sync {
    fn config(&self) -> &Config;

    /// Directory to copy from, given the configured local distribution root
    fn dist_source_dir(&self, dist: &Path) -> PathBuf;

    /// Directory to copy into, given the output directory
    fn dist_dest_dir(&self, out: &Path) -> PathBuf;
}

/// Default packaging context.
///
/// Relative distribution roots resolve against the project directory. For
/// `darwin` and `mas`, a bundle name points both sides at `<name>.app`.
#[derive(Debug, Clone)]
pub struct Packager {
    config: Config,
    project_dir: PathBuf,
    platform: String,
    bundle_name: Option<String>,
}

impl Packager {
    #[must_use]
    pub fn new(
        config: Config,
        project_dir: impl Into<PathBuf>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            config,
            project_dir: project_dir.into(),
            platform: platform.into(),
            bundle_name: None,
        }
    }

    #[must_use]
    pub fn with_bundle_name(mut self, name: impl Into<String>) -> Self {
        self.bundle_name = Some(name.into());
        self
    }

    fn app_bundle(&self) -> Option<String> {
        match self.platform.as_str() {
            "darwin" | "mas" => self.bundle_name.as_ref().map(|name| format!("{name}.app")),
            _ => None,
        }
    }
}

impl PackagingContext for Packager {
    fn config(&self) -> &Config {
        &self.config
    }

    fn dist_source_dir(&self, dist: &Path) -> PathBuf {
        let root = self.project_dir.join(dist);
        match self.app_bundle() {
            Some(bundle) => root.join(bundle),
            None => root,
        }
    }

    fn dist_dest_dir(&self, out: &Path) -> PathBuf {
        match self.app_bundle() {
            Some(bundle) => out.join(bundle),
            None => out.to_path_buf(),
        }
    }
}
