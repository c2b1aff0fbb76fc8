// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Each [`Scene`](crate::scene::Scene) keeps a multi-channel
//! [`understory_dirty`] tracker alongside its plain repaint flag. The flag
//! decides *whether* a surface repaints; the tracker records *what* changed
//! so each repaint can report it.
//!
//! # Propagation semantics
//!
//! - **Upward**: [`PAINT`] is marked with
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and has dependency edges
//!   from parent to child. Marking a leaf marks every container above it,
//!   mirroring how a node's change invalidates everything that paints it.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on insert, attach, detach, and
//!   destroy. It does not propagate.

use understory_dirty::Channel;

/// Something about the node's own output changed.
pub const PAINT: Channel = Channel::new(0);

/// Tree topology changed.
pub const TOPOLOGY: Channel = Channel::new(1);
