// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for processor construction and execution events.

use std::fmt::{Display, Formatter};

use super::StructuredLog;

/// Processor execution started.
///
/// # Log Level
/// `debug!` - Emitted for every stage of every run
///
/// # Example
/// ```
/// use pocketchemist::observability::messages::processor::ProcessorExecutionStarted;
///
/// let msg = ProcessorExecutionStarted {
///     processor_id: "baseline",
///     context_entries: 3,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ProcessorExecutionStarted<'a> {
    pub processor_id: &'a str,
    pub context_entries: usize,
}

impl Display for ProcessorExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' execution started: context_entries={}",
            self.processor_id, self.context_entries
        )
    }
}

impl StructuredLog for ProcessorExecutionStarted<'_> {
    fn log(&self) {
        tracing::debug!("{}", self);
    }
}

/// Processor execution completed successfully.
///
/// # Log Level
/// `debug!` - Emitted for every stage of every run
pub struct ProcessorExecutionCompleted<'a> {
    pub processor_id: &'a str,
    pub context_entries: usize,
    pub duration: std::time::Duration,
}

impl Display for ProcessorExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' completed: context_entries={}, duration={:?}",
            self.processor_id, self.context_entries, self.duration
        )
    }
}

impl StructuredLog for ProcessorExecutionCompleted<'_> {
    fn log(&self) {
        tracing::debug!("{}", self);
    }
}

/// Processor execution failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use pocketchemist::observability::messages::processor::ProcessorExecutionFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
/// let msg = ProcessorExecutionFailed {
///     processor_id: "baseline",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ProcessorExecutionFailed<'a> {
    pub processor_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ProcessorExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' execution failed: {}",
            self.processor_id, self.error
        )
    }
}

impl StructuredLog for ProcessorExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!("{}", self);
    }
}

/// Supplied parameters the processor does not recognize were dropped.
///
/// # Log Level
/// `debug!` - Dropping unknown parameters is expected behavior
pub struct ParametersIgnored<'a> {
    pub processor: &'a str,
    pub names: &'a [&'a str],
}

impl Display for ParametersIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' ignored unrecognized parameters: {}",
            self.processor,
            self.names.join(", ")
        )
    }
}

impl StructuredLog for ParametersIgnored<'_> {
    fn log(&self) {
        tracing::debug!("{}", self);
    }
}

/// Processor instantiation from configuration failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use pocketchemist::observability::messages::processor::ProcessorInstantiationFailed;
///
/// let msg = ProcessorInstantiationFailed {
///     path: "pipeline/1",
///     processor_type: "call_module",
///     reason: "missing parameters",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ProcessorInstantiationFailed<'a> {
    pub path: &'a str,
    pub processor_type: &'a str,
    pub reason: &'a str,
}

impl Display for ProcessorInstantiationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to instantiate '{}' processor at '{}': {}",
            self.processor_type, self.path, self.reason
        )
    }
}

impl StructuredLog for ProcessorInstantiationFailed<'_> {
    fn log(&self) {
        tracing::error!("{}", self);
    }
}
