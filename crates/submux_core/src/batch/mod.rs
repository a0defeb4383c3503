//! Batch orchestration over the pair registry.
//!
//! This module provides:
//! - `ToolInvoker`: the synchronous seam to the external muxing tool,
//!   with `ProcessInvoker` as the real implementation
//! - `BatchProcessor`: one ordered pass over all registered pairs with
//!   per-pair failure isolation and abort-on-tool-unavailable
//! - `BatchReport`: per-pair outcomes plus aggregate counts

mod invoker;
mod processor;

pub use invoker::{locate_tool, InvokeError, ProcessInvoker, ToolInvoker, ToolOutput};
pub use processor::{
    BatchError, BatchOptions, BatchProcessor, BatchReport, CancelHandle, PairOutcome,
};
