#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Runtime distribution acquisition
//!
//! Materializes a platform specific runtime distribution into an output
//! directory, either by downloading and extracting a release archive or by
//! copying a distribution that already exists on disk.

pub mod acquire;
pub mod context;
pub mod extract;
pub mod options;
pub mod permissions;
pub mod request;

pub use context::{Packager, PackagingContext};
pub use extract::{ArchiveExtractor, SevenZipExtractor};
pub use options::{create_fetch_options, create_fork_fetch_options, fork_defaults};
pub use request::{AcquisitionRequest, DistributionVariant, LocalDistributionSource};

use rtdist_config::Config;
use rtdist_errors::Error;
use rtdist_events::{
    AcquisitionEvent, AcquisitionMethod, AppEvent, EventEmitter, EventSender, FailureContext,
};
use rtdist_net::{ArchiveFetcher, HttpFetcher, NetConfig};
use rtdist_platform::Platform;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Acquires distributions using a fetcher, an extractor and a platform
#[derive(Clone)]
pub struct Unpacker {
    fetcher: Arc<dyn ArchiveFetcher>,
    extractor: Arc<dyn ArchiveExtractor>,
    platform: Platform,
    tx: Option<EventSender>,
}

impl Unpacker {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn ArchiveFetcher>,
        extractor: Arc<dyn ArchiveExtractor>,
        platform: Platform,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            platform,
            tx: None,
        }
    }

    /// Build an unpacker with the HTTP fetcher, the 7-Zip extractor and the
    /// host platform
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &Config, tx: Option<EventSender>) -> Result<Self, Error> {
        let platform = Platform::current();
        let fetcher = HttpFetcher::new(NetConfig::from(&config.network), tx.clone())?;
        let mut extractor = SevenZipExtractor::from_config(platform.clone(), &config.extract);
        if let Some(tx) = &tx {
            extractor = extractor.with_event_sender(tx.clone());
        }

        Ok(Self {
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
            platform,
            tx,
        })
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Acquire the standard distribution into `out`
    ///
    /// # Errors
    ///
    /// Returns the first fetch, extraction, copy or permission error.
    pub async fn unpack_standard(
        &self,
        packager: &dyn PackagingContext,
        out: &Path,
        platform: &str,
        arch: &str,
        version: &str,
    ) -> Result<(), Error> {
        let request =
            AcquisitionRequest::new(out, platform, arch, version, DistributionVariant::Standard);
        self.unpack(packager, &request).await
    }

    /// Acquire the forked distribution into `out`
    ///
    /// # Errors
    ///
    /// Returns the first fetch, extraction, copy or permission error.
    pub async fn unpack_fork(
        &self,
        packager: &dyn PackagingContext,
        out: &Path,
        platform: &str,
        arch: &str,
        version: &str,
    ) -> Result<(), Error> {
        let request =
            AcquisitionRequest::new(out, platform, arch, version, DistributionVariant::Fork);
        self.unpack(packager, &request).await
    }

    /// Acquire the distribution described by `request`, then normalize
    /// permissions
    ///
    /// # Errors
    ///
    /// Returns the first fetch, extraction, copy or permission error.
    pub async fn unpack(
        &self,
        packager: &dyn PackagingContext,
        request: &AcquisitionRequest,
    ) -> Result<(), Error> {
        let config = packager.config();
        let options = match request.variant {
            DistributionVariant::Standard => create_fetch_options(
                config,
                &request.platform,
                &request.arch,
                &request.version,
                self,
            ),
            DistributionVariant::Fork => create_fork_fetch_options(
                config,
                &request.platform,
                &request.arch,
                &request.version,
                self,
            ),
        };
        let local = LocalDistributionSource::from_config(config);
        let method = if local.is_some() {
            AcquisitionMethod::Copy
        } else {
            AcquisitionMethod::Download
        };
        let out = request.output_dir.as_path();

        self.emit(AppEvent::Acquisition(AcquisitionEvent::Started {
            variant: request.variant.to_string(),
            platform: request.platform.clone(),
            arch: request.arch.clone(),
            version: request.version.clone(),
            method,
            output_dir: out.to_path_buf(),
        }));

        let start = Instant::now();
        let ctx = self.platform.create_context(self.tx.clone());
        let result = async {
            match &local {
                Some(source) => {
                    acquire::copy_local(
                        &self.platform,
                        &ctx,
                        &packager.dist_source_dir(source.root()),
                        &packager.dist_dest_dir(out),
                        out,
                    )
                    .await?;
                }
                None => {
                    acquire::download_and_extract(
                        self.fetcher.as_ref(),
                        self.extractor.as_ref(),
                        &self.platform,
                        &ctx,
                        &options,
                        out,
                    )
                    .await?;
                }
            }

            let fixed =
                permissions::normalize_permissions(&self.platform, &ctx, out, &request.platform)
                    .await?;
            if !fixed.is_empty() {
                self.emit(AppEvent::Acquisition(AcquisitionEvent::PermissionsNormalized {
                    paths: fixed,
                    mode: permissions::LINUX_DIR_MODE.to_string(),
                }));
            }
            Ok::<(), Error>(())
        }
        .await;

        match &result {
            Ok(()) => self.emit(AppEvent::Acquisition(AcquisitionEvent::Completed {
                method,
                output_dir: out.to_path_buf(),
                duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            })),
            Err(e) => self.emit(AppEvent::Acquisition(AcquisitionEvent::Failed {
                method,
                output_dir: out.to_path_buf(),
                failure: FailureContext::from_error(e),
            })),
        }

        result
    }
}

impl EventEmitter for Unpacker {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}
