// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while a pipeline runs, and the policy a group applies to
//! them.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use super::UnitError;

/// How a group processor reacts when one of its children fails.
///
/// # Variants
/// * `FailFast` - Stop at the first failing child and return its error
/// * `ContinueOnError` - Run every child, then report all failures together
/// * `BestEffort` - Run every child, log failures and report success
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    #[default]
    FailFast,
    ContinueOnError,
    BestEffort,
}

impl fmt::Display for FailureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureStrategy::FailFast => "fail_fast",
            FailureStrategy::ContinueOnError => "continue_on_error",
            FailureStrategy::BestEffort => "best_effort",
        };
        f.write_str(label)
    }
}

/// One failed child of a group run under `ContinueOnError`.
#[derive(Debug)]
pub struct ChildFailure {
    /// 1-based position of the child in its group.
    pub index: usize,
    pub child: String,
    pub error: ProcessError,
}

#[derive(Error, Debug)]
pub enum ProcessError {
    /// A processor failed with a domain-specific reason.
    #[error("Processor '{processor}' failed: {reason}")]
    Failed { processor: String, reason: String },

    /// An expected context entry is absent.
    #[error("Processor '{processor}' requires context entry '{key}'")]
    MissingInput { processor: String, key: String },

    /// A context entry or parameter holds a value of the wrong kind.
    #[error("Processor '{processor}' cannot use '{key}': {reason}")]
    InvalidInput {
        processor: String,
        key: String,
        reason: String,
    },

    /// An optional capability the processor needs is not installed.
    #[error("Processor '{processor}' requires '{module}.{callable}', which is not available")]
    CapabilityUnavailable {
        processor: String,
        module: String,
        callable: String,
    },

    /// An external callable returned an error.
    #[error("Processor '{processor}' call failed: {source}")]
    Call {
        processor: String,
        #[source]
        source: UnitError,
    },

    /// A child of a `FailFast` group failed; later siblings did not run.
    #[error("Group '{group}' stopped at child {index} ('{child}'): {source}")]
    ChildFailed {
        group: String,
        index: usize,
        child: String,
        #[source]
        source: Box<ProcessError>,
    },

    /// One or more children of a `ContinueOnError` group failed.
    #[error("Group '{group}' had {} failed children: {}", failures.len(), describe_failures(failures))]
    ChildrenFailed {
        group: String,
        failures: Vec<ChildFailure>,
    },
}

fn describe_failures(failures: &[ChildFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}. {} ({})", f.index, f.child, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}
