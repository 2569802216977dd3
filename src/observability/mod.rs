// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! Every diagnostic and operational log line in pocketchemist comes from a
//! message type in [`messages`]. Message types follow a struct-based pattern
//! with a `Display` implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep log wording in one place per subsystem
//! * Provide consistent, structured logging output
//!
//! # Usage
//!
//! ```rust
//! use pocketchemist::observability::messages::processor::ProcessorExecutionFailed;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
//! let msg = ProcessorExecutionFailed {
//!     processor_id: "baseline",
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```
//!
//! Subscriber installation is left to the binary (see `main.rs`); the
//! library only emits `tracing` events.

pub mod messages;
