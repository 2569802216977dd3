// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for group processor execution.

use std::fmt::{Display, Formatter};
use std::time::Duration;

use super::StructuredLog;
use crate::errors::FailureStrategy;

/// A group started running its children.
///
/// # Log Level
/// `info!` - Important operational event
pub struct GroupExecutionStarted<'a> {
    pub group: &'a str,
    pub child_count: usize,
    pub failure_strategy: FailureStrategy,
}

impl Display for GroupExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Group '{}' started: children={}, failure_strategy={}",
            self.group, self.child_count, self.failure_strategy
        )
    }
}

impl StructuredLog for GroupExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!("{}", self);
    }
}

/// A group finished running its children.
///
/// # Log Level
/// `info!` - Important operational event
pub struct GroupExecutionCompleted<'a> {
    pub group: &'a str,
    pub child_count: usize,
    pub failed_count: usize,
    pub duration: Duration,
}

impl Display for GroupExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Group '{}' completed: children={}, failed={}, duration={:?}",
            self.group, self.child_count, self.failed_count, self.duration
        )
    }
}

impl StructuredLog for GroupExecutionCompleted<'_> {
    fn log(&self) {
        tracing::info!("{}", self);
    }
}

/// A child of a group failed.
///
/// # Log Level
/// `warn!` - The group's failure strategy decides what happens next
///
/// # Example
/// ```
/// use pocketchemist::errors::FailureStrategy;
/// use pocketchemist::observability::messages::group::GroupChildFailed;
///
/// let msg = GroupChildFailed {
///     group: "Main",
///     index: 2,
///     child: "Baseline",
///     failure_strategy: FailureStrategy::ContinueOnError,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Group 'Main' child 2 ('Baseline') failed; continuing under continue_on_error"
/// );
/// ```
pub struct GroupChildFailed<'a> {
    pub group: &'a str,
    pub index: usize,
    pub child: &'a str,
    pub failure_strategy: FailureStrategy,
}

impl Display for GroupChildFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let action = match self.failure_strategy {
            FailureStrategy::FailFast => "stopping",
            FailureStrategy::ContinueOnError | FailureStrategy::BestEffort => "continuing",
        };
        write!(
            f,
            "Group '{}' child {} ('{}') failed; {} under {}",
            self.group, self.index, self.child, action, self.failure_strategy
        )
    }
}

impl StructuredLog for GroupChildFailed<'_> {
    fn log(&self) {
        tracing::warn!("{}", self);
    }
}
