#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for rtdist
//!
//! This crate resolves fetch options to a download URL, serves archives from
//! the local cache when present and downloads them otherwise.

mod client;
mod fetch;

pub use client::{NetClient, NetConfig};
pub use fetch::{
    archive_file_name, archive_url, default_cache_dir, ArchiveFetcher, HttpFetcher,
    DEFAULT_MIRROR,
};
pub use rtdist_config::FetchOptions;

use rtdist_errors::{Error, NetworkError};
use url::Url;

/// Parse and validate a URL
///
/// # Errors
///
/// Returns an error if the URL string is malformed or invalid according to RFC 3986.
pub fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| NetworkError::InvalidUrl(format!("{url}: {e}")).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        assert!(parse_url("https://example.com").is_ok());
        assert!(parse_url("not a url").is_err());
    }
}
