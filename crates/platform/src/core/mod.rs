//! Core platform abstractions and context management

use rtdist_events::{AppEvent, EventEmitter, EventSender};
use std::sync::Arc;

use crate::filesystem::FilesystemOperations;
use crate::process::ProcessOperations;

/// Context for platform operations, providing event emission
#[derive(Clone, Default)]
pub struct PlatformContext {
    event_sender: Option<EventSender>,
}

impl PlatformContext {
    /// Create a new platform context with event emission capabilities
    #[must_use]
    pub fn new(event_sender: Option<EventSender>) -> Self {
        Self { event_sender }
    }

    /// Emit a platform event if event sender is available
    pub fn emit_event(&self, event: AppEvent) {
        self.emit(event);
    }
}

impl EventEmitter for PlatformContext {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

/// Main platform abstraction providing access to all platform operations
#[derive(Clone)]
pub struct Platform {
    filesystem_ops: Arc<dyn FilesystemOperations>,
    process_ops: Arc<dyn ProcessOperations>,
}

impl Platform {
    /// Create a new platform instance with the specified implementations
    pub fn new(
        filesystem_ops: Arc<dyn FilesystemOperations>,
        process_ops: Arc<dyn ProcessOperations>,
    ) -> Self {
        Self {
            filesystem_ops,
            process_ops,
        }
    }

    /// Get the platform for the host this binary runs on
    #[must_use]
    pub fn current() -> Self {
        crate::implementations::native::NativePlatform::new()
    }

    /// Access filesystem operations
    #[must_use]
    pub fn filesystem(&self) -> &dyn FilesystemOperations {
        &*self.filesystem_ops
    }

    /// Access process operations
    #[must_use]
    pub fn process(&self) -> &dyn ProcessOperations {
        &*self.process_ops
    }

    /// Create a platform context with event emission
    #[must_use]
    pub fn create_context(&self, event_sender: Option<EventSender>) -> PlatformContext {
        PlatformContext::new(event_sender)
    }

    /// Convenience method: Create a new command builder
    #[must_use]
    pub fn command(&self, program: &str) -> crate::process::PlatformCommand {
        self.process().create_command(program)
    }

    /// Convenience method: Execute a command and get output
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    pub async fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: crate::process::PlatformCommand,
    ) -> Result<crate::process::CommandOutput, rtdist_errors::Error> {
        self.process().execute_command(ctx, cmd).await
    }
}
