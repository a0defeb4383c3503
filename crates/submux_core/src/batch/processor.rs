//! Batch processor: one ordered pass over all registered pairs.
//!
//! Each pair drives one external-tool invocation. A pair's failure is
//! isolated to that pair; only tool-unavailability aborts the whole run,
//! because it means the environment is unusable rather than that one
//! input was bad.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::logging::RunLogger;
use crate::models::{PairStatus, RunState, TrackLanguage};
use crate::mux::{format_tokens, MuxOptionsBuilder};
use crate::pairing::PairRegistry;

use super::invoker::{InvokeError, ToolInvoker, ToolOutput};

/// Errors that reject a run up front, before any pair is attempted.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The registry holds no pairs.
    #[error("no media-subtitle pairs have been added for processing")]
    EmptyBatch,

    /// The configured tool could not be located.
    #[error("muxing tool unavailable: {reason}")]
    ToolUnavailable { reason: String },
}

/// Options for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Path to the muxing tool executable.
    pub tool_path: PathBuf,
    /// Directory receiving one output file per pair.
    pub output_dir: PathBuf,
    /// Track language applied uniformly to every pair in the run.
    pub language: TrackLanguage,
}

/// Final outcome of a single pair within a run.
#[derive(Debug, Clone, Serialize)]
pub struct PairOutcome {
    pub id: u64,
    pub media: String,
    pub subtitle: String,
    pub status: PairStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

/// Report of a finished (or stopped) batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Terminal run state: Completed, Aborted, or Cancelled.
    pub state: RunState,
    /// Pairs for which the tool was invoked.
    pub attempted: usize,
    /// Pairs that resolved to Success.
    pub succeeded: usize,
    /// Pairs that resolved to Failed.
    pub failed: usize,
    /// Pairs already resolved before the run (not re-attempted).
    pub skipped: usize,
    /// Per-pair outcomes in id order.
    pub outcomes: Vec<PairOutcome>,
    /// Reason the run aborted, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,
}

impl BatchReport {
    /// Whether the run completed with every attempted pair succeeding.
    pub fn all_succeeded(&self) -> bool {
        self.state == RunState::Completed && self.failed == 0
    }
}

/// Handle to request cancellation of a running batch.
///
/// The flag is polled only between invocations, so cancelling never
/// interrupts an in-flight tool run.
#[derive(Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Request cancellation at the next pair boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Drives one sequential pass over the registry in ascending id order.
pub struct BatchProcessor {
    invoker: Box<dyn ToolInvoker>,
    options: BatchOptions,
    logger: Option<Arc<RunLogger>>,
    cancelled: Arc<AtomicBool>,
    state: RunState,
}

impl BatchProcessor {
    /// Create a processor with the given invoker and options.
    pub fn new(invoker: Box<dyn ToolInvoker>, options: BatchOptions) -> Self {
        Self {
            invoker,
            options,
            logger: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            state: RunState::NotStarted,
        }
    }

    /// Attach a per-run log file writer.
    pub fn with_logger(mut self, logger: Arc<RunLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Get a cancellation handle for this run.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancelled),
        }
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the batch over every pair in the registry, in id order.
    ///
    /// Rejected up front with `EmptyBatch` when the registry is empty and
    /// with `ToolUnavailable` when the tool cannot be located. Mid-run
    /// aborts and cancellations are reported through the returned
    /// `BatchReport`, preserving the per-pair outcomes gathered so far.
    pub fn run(&mut self, registry: &mut PairRegistry) -> Result<BatchReport, BatchError> {
        if registry.is_empty() {
            return Err(BatchError::EmptyBatch);
        }
        self.invoker
            .locate()
            .map_err(|e| BatchError::ToolUnavailable {
                reason: e.to_string(),
            })?;

        self.state = RunState::Running;
        let ids = registry.ids();
        self.log_info(&format!(
            "Starting subtitle embedding for {} pairs (language: {})",
            ids.len(),
            self.options.language
        ));

        let mut attempted = 0;
        let mut succeeded = 0;
        let mut failed = 0;
        let mut skipped = 0;
        let mut abort_reason = None;

        for id in ids {
            if self.cancelled.load(Ordering::SeqCst) {
                self.log_warn(&format!("Run cancelled before pair id {}", id));
                self.state = RunState::Cancelled;
                break;
            }

            // Defensive: the single-writer discipline means pairs cannot
            // vanish mid-run, but a missing id must not corrupt the pass.
            let pair = match registry.get(id) {
                Ok(pair) => pair.clone(),
                Err(_) => {
                    tracing::warn!("Pair id {} disappeared from the registry; skipping", id);
                    continue;
                }
            };

            if pair.status.is_resolved() {
                self.log_info(&format!(
                    "Pair id {} already {}; skipping",
                    id, pair.status
                ));
                skipped += 1;
                continue;
            }

            self.log_info(&format!(
                "Processing pair id {}: '{}' + '{}'",
                id,
                pair.media_display(),
                pair.subtitle_display()
            ));

            let output_name = match pair.media_path.file_name() {
                Some(name) => name.to_os_string(),
                None => {
                    attempted += 1;
                    failed += 1;
                    self.record_failure(
                        registry,
                        id,
                        format!(
                            "media path has no file name: {}",
                            pair.media_path.display()
                        ),
                    );
                    continue;
                }
            };
            let output_path = self.options.output_dir.join(output_name);

            let command = MuxOptionsBuilder::new(
                &self.options.tool_path,
                &pair.media_path,
                &pair.subtitle_path,
                &output_path,
                self.options.language,
            )
            .build();
            self.log_command(&format_tokens(&command));

            match self.invoker.invoke(&command) {
                Ok(output) if output.success() => {
                    attempted += 1;
                    succeeded += 1;
                    if let Err(e) = registry.set_status(id, PairStatus::Success) {
                        tracing::warn!("Could not record success for pair {}: {}", id, e);
                    }
                    self.log_info(&format!(
                        "Successfully processed pair id {} -> {}",
                        id,
                        output_path.display()
                    ));
                }
                Ok(output) => {
                    attempted += 1;
                    failed += 1;
                    self.record_failure(registry, id, compose_diagnostic(&output));
                }
                Err(InvokeError::ToolNotFound { program }) => {
                    let reason = format!(
                        "'{}' could not be launched; remaining pairs were not attempted",
                        program
                    );
                    self.log_error(&reason);
                    self.state = RunState::Aborted;
                    abort_reason = Some(reason);
                    break;
                }
                Err(e) => {
                    attempted += 1;
                    failed += 1;
                    self.record_failure(registry, id, e.to_string());
                }
            }
        }

        if self.state == RunState::Running {
            self.state = RunState::Completed;
        }
        self.log_info(&format!(
            "Batch {}: {} of {} pairs processed successfully",
            self.state, succeeded, attempted
        ));

        let outcomes = registry
            .list_ordered()
            .into_iter()
            .map(|pair| PairOutcome {
                id: pair.id,
                media: pair.media_display(),
                subtitle: pair.subtitle_display(),
                status: pair.status,
                diagnostic: pair.diagnostic.clone(),
            })
            .collect();

        Ok(BatchReport {
            state: self.state,
            attempted,
            succeeded,
            failed,
            skipped,
            outcomes,
            abort_reason,
        })
    }

    fn record_failure(&self, registry: &mut PairRegistry, id: u64, diagnostic: String) {
        self.log_error(&format!("Pair id {} failed: {}", id, first_line(&diagnostic)));
        if let Err(e) = registry.set_failed(id, diagnostic) {
            tracing::warn!("Could not record failure for pair {}: {}", id, e);
        }
    }

    fn log_info(&self, message: &str) {
        tracing::info!("{}", message);
        if let Some(logger) = &self.logger {
            logger.info(message);
        }
    }

    fn log_warn(&self, message: &str) {
        tracing::warn!("{}", message);
        if let Some(logger) = &self.logger {
            logger.warn(message);
        }
    }

    fn log_error(&self, message: &str) {
        tracing::error!("{}", message);
        if let Some(logger) = &self.logger {
            logger.error(message);
        }
    }

    fn log_command(&self, command: &str) {
        tracing::debug!("Running: {}", command);
        if let Some(logger) = &self.logger {
            logger.command(command);
        }
    }
}

/// Build the diagnostic text recorded on a failed pair.
fn compose_diagnostic(output: &ToolOutput) -> String {
    let stderr = output.stderr.trim();
    let stdout = output.stdout.trim();
    let detail = if !stderr.is_empty() { stderr } else { stdout };
    if detail.is_empty() {
        format!("tool exited with code {}", output.exit_code)
    } else {
        format!("exit code {}: {}", output.exit_code, detail)
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text)
}
