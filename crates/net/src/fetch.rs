//! Resolving fetch options to a cached archive on disk

use async_trait::async_trait;
use futures::StreamExt;
use rtdist_errors::{Error, NetworkError};
use rtdist_events::{AppEvent, DownloadEvent, EventEmitter, EventSender, FailureContext};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::client::{NetClient, NetConfig};
use crate::FetchOptions;

/// Release mirror used when no `mirror` option is given
pub const DEFAULT_MIRROR: &str = "https://github.com/electron/electron/releases/download/v";

/// Resolves a [`FetchOptions`] set to a local archive path
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    /// Return the path of an archive matching `options`, downloading it if needed
    async fn fetch(&self, options: &FetchOptions) -> Result<PathBuf, Error>;
}

fn required<'a>(value: Option<&'a String>, field: &str) -> Result<&'a str, Error> {
    value
        .map(String::as_str)
        .ok_or_else(|| NetworkError::InvalidUrl(format!("fetch options are missing {field}")).into())
}

/// Archive file name for `options`: `custom_filename` or the default release name
///
/// # Errors
///
/// Returns an error when no custom filename is set and any of version,
/// platform or arch is missing.
pub fn archive_file_name(options: &FetchOptions) -> Result<String, Error> {
    if let Some(name) = &options.custom_filename {
        return Ok(name.clone());
    }
    let version = required(options.version.as_ref(), "version")?;
    let platform = required(options.platform.as_ref(), "platform")?;
    let arch = required(options.arch.as_ref(), "arch")?;
    Ok(format!("electron-v{version}-{platform}-{arch}.zip"))
}

/// Download URL for `options`: `mirror + version + "/" + file name`
///
/// # Errors
///
/// Returns an error when the version is missing or the result is not a valid URL.
pub fn archive_url(options: &FetchOptions) -> Result<String, Error> {
    let mirror = options.mirror.as_deref().unwrap_or(DEFAULT_MIRROR);
    let version = required(options.version.as_ref(), "version")?;
    let url = format!("{mirror}{version}/{}", archive_file_name(options)?);
    crate::parse_url(&url)?;
    Ok(url)
}

/// Per-user cache directory for downloaded archives
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("rtdist")
}

/// Fetcher that downloads archives over HTTP into a cache directory
#[derive(Clone)]
pub struct HttpFetcher {
    strict: NetClient,
    lenient: NetClient,
    default_cache: PathBuf,
    tx: Option<EventSender>,
}

impl HttpFetcher {
    /// Create a fetcher; `strict_ssl = false` in fetch options selects a
    /// client that accepts invalid certificates
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client cannot be built.
    pub fn new(config: NetConfig, tx: Option<EventSender>) -> Result<Self, Error> {
        let strict = NetClient::new(NetConfig {
            accept_invalid_certs: false,
            ..config.clone()
        })?;
        let lenient = NetClient::new(NetConfig {
            accept_invalid_certs: true,
            ..config
        })?;
        Ok(Self {
            strict,
            lenient,
            default_cache: default_cache_dir(),
            tx,
        })
    }

    /// Cache directory used when fetch options do not name one
    #[must_use]
    pub fn with_default_cache(mut self, dir: impl Into<PathBuf>) -> Self {
        self.default_cache = dir.into();
        self
    }

    fn client_for(&self, options: &FetchOptions) -> &NetClient {
        if options.strict_ssl == Some(false) {
            &self.lenient
        } else {
            &self.strict
        }
    }

    async fn download(&self, client: &NetClient, url: &str, dest: &Path) -> Result<u64, Error> {
        let response = client.get(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        self.emit(AppEvent::Download(DownloadEvent::Started {
            url: url.to_string(),
            total_bytes: response.content_length(),
        }));

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io_with_path(&e, parent))?;
        }

        let partial = dest.with_extension("partial");
        let mut file = tokio::fs::File::create(&partial)
            .await
            .map_err(|e| Error::io_with_path(&e, &partial))?;
        let mut stream = response.bytes_stream();
        let mut downloaded = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| NetworkError::DownloadFailed(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| Error::io_with_path(&e, &partial))?;
            downloaded += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| Error::io_with_path(&e, &partial))?;
        drop(file);

        tokio::fs::rename(&partial, dest)
            .await
            .map_err(|e| Error::io_with_path(&e, dest))?;

        Ok(downloaded)
    }
}

impl EventEmitter for HttpFetcher {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

#[async_trait]
impl ArchiveFetcher for HttpFetcher {
    async fn fetch(&self, options: &FetchOptions) -> Result<PathBuf, Error> {
        let url = archive_url(options)?;
        let cache_dir = options.cache.as_ref().unwrap_or(&self.default_cache);
        let dest = cache_dir.join(archive_file_name(options)?);

        if tokio::fs::try_exists(&dest).await.unwrap_or(false) {
            self.emit(AppEvent::Download(DownloadEvent::CacheHit {
                url,
                path: dest.clone(),
            }));
            return Ok(dest);
        }

        match self.download(self.client_for(options), &url, &dest).await {
            Ok(bytes_downloaded) => {
                self.emit(AppEvent::Download(DownloadEvent::Completed {
                    url,
                    path: dest.clone(),
                    bytes_downloaded,
                }));
                Ok(dest)
            }
            Err(e) => {
                self.emit(AppEvent::Download(DownloadEvent::Failed {
                    url,
                    failure: FailureContext::from_error(&e),
                }));
                Err(e)
            }
        }
    }
}
