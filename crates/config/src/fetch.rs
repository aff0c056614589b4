//! Options handed to the archive fetcher

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Named settings that tell a fetcher which archive to resolve and how.
///
/// The same shape is used for the user's download override block and for
/// the fully normalized options, so layers can be combined with
/// [`FetchOptions::overlay`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetchOptions {
    pub cache: Option<PathBuf>,
    pub strict_ssl: Option<bool>,
    /// Base URL; the version and file name are appended to it
    pub mirror: Option<String>,
    pub custom_filename: Option<String>,
    pub verify_checksum: Option<bool>,
    pub platform: Option<String>,
    pub arch: Option<String>,
    pub version: Option<String>,
}

impl FetchOptions {
    /// Shallow merge: every field set in `upper` replaces the one in `self`.
    #[must_use]
    pub fn overlay(self, upper: &FetchOptions) -> Self {
        Self {
            cache: upper.cache.clone().or(self.cache),
            strict_ssl: upper.strict_ssl.or(self.strict_ssl),
            mirror: upper.mirror.clone().or(self.mirror),
            custom_filename: upper.custom_filename.clone().or(self.custom_filename),
            verify_checksum: upper.verify_checksum.or(self.verify_checksum),
            platform: upper.platform.clone().or(self.platform),
            arch: upper.arch.clone().or(self.arch),
            version: upper.version.clone().or(self.version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_prefers_upper() {
        let lower = FetchOptions {
            mirror: Some("https://lower/v".into()),
            verify_checksum: Some(false),
            ..FetchOptions::default()
        };
        let upper = FetchOptions {
            mirror: Some("https://upper/v".into()),
            ..FetchOptions::default()
        };

        let merged = lower.overlay(&upper);
        assert_eq!(merged.mirror.as_deref(), Some("https://upper/v"));
        assert_eq!(merged.verify_checksum, Some(false));
        assert_eq!(merged.platform, None);
    }
}
