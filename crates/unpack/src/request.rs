//! Per-invocation acquisition inputs

use rtdist_config::Config;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which distribution build is being acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionVariant {
    /// The upstream runtime from its release mirror
    Standard,
    /// The rebranded fork, published under a different mirror and file name
    Fork,
}

impl DistributionVariant {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Fork => "fork",
        }
    }
}

impl fmt::Display for DistributionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything identifying one acquisition run
#[derive(Debug, Clone)]
pub struct AcquisitionRequest {
    pub output_dir: PathBuf,
    pub platform: String,
    pub arch: String,
    pub version: String,
    pub variant: DistributionVariant,
}

impl AcquisitionRequest {
    #[must_use]
    pub fn new(
        output_dir: impl Into<PathBuf>,
        platform: impl Into<String>,
        arch: impl Into<String>,
        version: impl Into<String>,
        variant: DistributionVariant,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            platform: platform.into(),
            arch: arch.into(),
            version: version.into(),
            variant,
        }
    }
}

/// An already unpacked distribution on disk, used instead of a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDistributionSource {
    root: PathBuf,
}

impl LocalDistributionSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured `dist-dir`, if any
    #[must_use]
    pub fn from_config(config: &Config) -> Option<Self> {
        config.dist_dir.as_ref().map(Self::new)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
