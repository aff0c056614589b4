use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// How a distribution is materialized into the output directory
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionMethod {
    /// Fetch an archive and extract it
    Download,
    /// Copy a distribution that already exists on disk
    Copy,
}

/// Distribution acquisition domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AcquisitionEvent {
    /// Acquisition started
    Started {
        variant: String,
        platform: String,
        arch: String,
        version: String,
        method: AcquisitionMethod,
        output_dir: PathBuf,
    },

    /// Fetcher resolved the archive to a local file
    ArchiveResolved { archive: PathBuf },

    /// Extraction of the resolved archive started
    ExtractionStarted {
        archive: PathBuf,
        destination: PathBuf,
    },

    /// Local distribution copy started
    CopyStarted {
        source: PathBuf,
        destination: PathBuf,
    },

    /// Directory permissions were normalized after acquisition
    PermissionsNormalized { paths: Vec<PathBuf>, mode: String },

    /// Acquisition completed successfully
    Completed {
        method: AcquisitionMethod,
        output_dir: PathBuf,
        duration_ms: u64,
    },

    /// Acquisition failed
    Failed {
        method: AcquisitionMethod,
        output_dir: PathBuf,
        failure: FailureContext,
    },
}
