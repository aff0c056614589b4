//! Platform-specific operation events

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Kind of platform operation being reported
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlatformOperationKind {
    Filesystem,
    Process,
}

/// Program and arguments of a spawned process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessCommandDescriptor {
    pub program: String,
    pub args: Vec<String>,
}

/// What a platform operation acted on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformOperationContext {
    pub kind: PlatformOperationKind,
    /// Operation name (e.g. `ensure_empty_dir`, `execute_command`)
    pub operation: String,
    pub target: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub command: Option<ProcessCommandDescriptor>,
}

/// Measurements captured when a platform operation finishes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformOperationMetrics {
    pub duration_ms: Option<u64>,
    pub exit_code: Option<i32>,
    pub stdout_bytes: Option<u64>,
    pub stderr_bytes: Option<u64>,
    pub changes: Option<Vec<String>>,
}

/// Platform operation events for tracking filesystem and process operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PlatformEvent {
    OperationStarted {
        context: PlatformOperationContext,
    },
    OperationCompleted {
        context: PlatformOperationContext,
        metrics: Option<PlatformOperationMetrics>,
    },
    OperationFailed {
        context: PlatformOperationContext,
        failure: FailureContext,
        metrics: Option<PlatformOperationMetrics>,
    },
}
