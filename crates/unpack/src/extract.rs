//! Archive extraction through an external 7-Zip process

use async_trait::async_trait;
use rtdist_config::ExtractConfig;
use rtdist_errors::{Error, UnpackError};
use rtdist_events::EventSender;
use rtdist_platform::Platform;
use std::path::{Path, PathBuf};

/// Extracts an archive into a directory
#[async_trait]
pub trait ArchiveExtractor: Send + Sync {
    async fn extract(&self, archive: &Path, out: &Path) -> Result<(), Error>;
}

/// Arguments for `7za`: `x -bd [-bb3] <archive> -o<out>`
#[must_use]
pub fn seven_zip_args(archive: &Path, out: &Path, debug: bool) -> Vec<String> {
    let mut args = vec!["x".to_string(), "-bd".to_string()];
    if debug {
        args.push("-bb3".to_string());
    }
    args.push(archive.display().to_string());
    args.push(format!("-o{}", out.display()));
    args
}

/// Extractor spawning `7za` (or a configured replacement)
#[derive(Clone)]
pub struct SevenZipExtractor {
    platform: Platform,
    program: PathBuf,
    debug: bool,
    tx: Option<EventSender>,
}

impl SevenZipExtractor {
    #[must_use]
    pub fn new(platform: Platform, program: impl Into<PathBuf>, debug: bool) -> Self {
        Self {
            platform,
            program: program.into(),
            debug,
            tx: None,
        }
    }

    #[must_use]
    pub fn from_config(platform: Platform, config: &ExtractConfig) -> Self {
        Self::new(platform, config.program.clone(), config.debug)
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }
}

#[async_trait]
impl ArchiveExtractor for SevenZipExtractor {
    async fn extract(&self, archive: &Path, out: &Path) -> Result<(), Error> {
        let ctx = self.platform.create_context(self.tx.clone());
        let mut cmd = self.platform.command(&self.program.to_string_lossy());
        cmd.args(seven_zip_args(archive, out, self.debug));

        let output = self.platform.execute_command(&ctx, cmd).await?;
        if output.status.success() {
            return Ok(());
        }

        Err(UnpackError::ExtractionFailed {
            archive: archive.display().to_string(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into())
    }
}
