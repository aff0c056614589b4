use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Archive download events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    /// Archive already present in the cache; no request was made
    CacheHit { url: String, path: PathBuf },

    /// Download started
    Started {
        url: String,
        total_bytes: Option<u64>,
    },

    /// Download completed and moved into the cache
    Completed {
        url: String,
        path: PathBuf,
        bytes_downloaded: u64,
    },

    /// Download failed
    Failed {
        url: String,
        failure: FailureContext,
    },
}
