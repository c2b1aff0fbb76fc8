// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for diorama
//! diagnostics.
//!
//! This crate provides [`TraceSink`](diorama_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: in-memory recording as
//!   [`recorder::RecordedEvent`] values.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   events.

pub mod chrome;
pub mod pretty;
pub mod recorder;
