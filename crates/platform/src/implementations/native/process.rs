//! Process operations implemented with `tokio::process`

use async_trait::async_trait;
use rtdist_errors::{Error, PlatformError};
use rtdist_events::{
    events::{
        FailureContext, PlatformEvent, PlatformOperationContext, PlatformOperationKind,
        PlatformOperationMetrics, ProcessCommandDescriptor,
    },
    AppEvent,
};
use std::convert::TryFrom;
use std::io::ErrorKind;
use std::time::{Duration, Instant};
use tokio::process::Command;

use crate::core::PlatformContext;
use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};

/// Native implementation of process operations
pub struct NativeProcessOperations;

impl NativeProcessOperations {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeProcessOperations {
    fn default() -> Self {
        Self::new()
    }
}

fn process_context(descriptor: ProcessCommandDescriptor) -> PlatformOperationContext {
    PlatformOperationContext {
        kind: PlatformOperationKind::Process,
        operation: "execute_command".to_string(),
        target: None,
        source: None,
        command: Some(descriptor),
    }
}

fn process_metrics(duration: Duration, output: Option<&CommandOutput>) -> PlatformOperationMetrics {
    PlatformOperationMetrics {
        duration_ms: Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)),
        exit_code: output.and_then(|o| o.status.code()),
        stdout_bytes: output.and_then(|o| u64::try_from(o.stdout.len()).ok()),
        stderr_bytes: output.and_then(|o| u64::try_from(o.stderr.len()).ok()),
        changes: None,
    }
}

fn emit_process_started(ctx: &PlatformContext, descriptor: &ProcessCommandDescriptor) {
    ctx.emit_event(AppEvent::Platform(PlatformEvent::OperationStarted {
        context: process_context(descriptor.clone()),
    }));
}

fn emit_process_completed(
    ctx: &PlatformContext,
    descriptor: &ProcessCommandDescriptor,
    output: &CommandOutput,
    duration: Duration,
) {
    ctx.emit_event(AppEvent::Platform(PlatformEvent::OperationCompleted {
        context: process_context(descriptor.clone()),
        metrics: Some(process_metrics(duration, Some(output))),
    }));
}

fn emit_process_failed(
    ctx: &PlatformContext,
    descriptor: &ProcessCommandDescriptor,
    error: &PlatformError,
    duration: Duration,
) {
    ctx.emit_event(AppEvent::Platform(PlatformEvent::OperationFailed {
        context: process_context(descriptor.clone()),
        failure: FailureContext::from_error(error),
        metrics: Some(process_metrics(duration, None)),
    }));
}

#[async_trait]
impl ProcessOperations for NativeProcessOperations {
    async fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, Error> {
        let start = Instant::now();
        let descriptor = ProcessCommandDescriptor {
            program: cmd.program().to_string(),
            args: cmd.get_args().to_vec(),
        };

        emit_process_started(ctx, &descriptor);

        let result: Result<CommandOutput, PlatformError> = async {
            let mut command = Command::new(cmd.program());
            command.args(cmd.get_args());

            let output = command.output().await.map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    PlatformError::CommandNotFound {
                        command: cmd.program().to_string(),
                    }
                } else {
                    PlatformError::ProcessExecutionFailed {
                        command: cmd.program().to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

            Ok(CommandOutput {
                status: output.status,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        }
        .await;

        let duration = start.elapsed();

        match &result {
            Ok(output) => emit_process_completed(ctx, &descriptor, output, duration),
            Err(e) => emit_process_failed(ctx, &descriptor, e, duration),
        }

        result.map_err(Error::from)
    }

    fn create_command(&self, program: &str) -> PlatformCommand {
        PlatformCommand::new(program)
    }
}
