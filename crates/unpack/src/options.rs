//! Normalization of user configuration into a single [`FetchOptions`] set
//!
//! Three layers are combined, lowest precedence first: built-in defaults
//! (only the fork variant has any), the user's download override block, and
//! the identity of the current run (platform, arch, version).

use rtdist_config::Config;
use rtdist_events::{AppEvent, ConfigEvent, EventEmitter};
use rtdist_net::FetchOptions;

/// Name of the current download override block
pub const DOWNLOAD_OPTION: &str = "dist-download";

/// Deprecated name of the download override block
pub const DEPRECATED_DOWNLOAD_OPTION: &str = "download";

/// Mirror serving the forked distribution's releases
pub const FORK_MIRROR: &str = "https://github.com/brave/muon/releases/download/v";

/// Build fetch options for the standard distribution.
///
/// Emits a [`ConfigEvent::DeprecatedOption`] when the deprecated block is
/// present, and a [`ConfigEvent::OptionOverridden`] for every identity key
/// the override block tries to set. Identity values always win.
pub fn create_fetch_options(
    config: &Config,
    platform: &str,
    arch: &str,
    version: &str,
    emitter: &impl EventEmitter,
) -> FetchOptions {
    if config.download.is_some() {
        emitter.emit(AppEvent::Config(ConfigEvent::DeprecatedOption {
            option: DEPRECATED_DOWNLOAD_OPTION.to_string(),
            replacement: DOWNLOAD_OPTION.to_string(),
        }));
    }

    let globals = FetchOptions {
        cache: config.cache.clone(),
        strict_ssl: config.strict_ssl,
        ..FetchOptions::default()
    };
    let merged = match config.download_overrides() {
        Some(overrides) => globals.overlay(overrides),
        None => globals,
    };

    for (key, existing, value) in [
        ("platform", &merged.platform, platform),
        ("arch", &merged.arch, arch),
        ("version", &merged.version, version),
    ] {
        if existing.is_some() {
            emitter.emit(AppEvent::Config(ConfigEvent::OptionOverridden {
                option: DEPRECATED_DOWNLOAD_OPTION.to_string(),
                key: key.to_string(),
                value: value.to_string(),
            }));
        }
    }

    merged.overlay(&run_identity(platform, arch, version))
}

/// Build fetch options for the forked distribution.
///
/// Same as [`create_fetch_options`], layered over [`fork_defaults`].
pub fn create_fork_fetch_options(
    config: &Config,
    platform: &str,
    arch: &str,
    version: &str,
    emitter: &impl EventEmitter,
) -> FetchOptions {
    fork_defaults(version, platform, arch).overlay(&create_fetch_options(
        config, platform, arch, version, emitter,
    ))
}

/// Built-in defaults for the forked distribution
#[must_use]
pub fn fork_defaults(version: &str, platform: &str, arch: &str) -> FetchOptions {
    FetchOptions {
        mirror: Some(FORK_MIRROR.to_string()),
        custom_filename: Some(format!("brave-v{version}-{platform}-{arch}.zip")),
        verify_checksum: Some(false),
        ..FetchOptions::default()
    }
}

fn run_identity(platform: &str, arch: &str, version: &str) -> FetchOptions {
    FetchOptions {
        platform: Some(platform.to_string()),
        arch: Some(arch.to_string()),
        version: Some(version.to_string()),
        ..FetchOptions::default()
    }
}
