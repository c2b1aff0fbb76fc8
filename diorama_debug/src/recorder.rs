// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and appends every event to a
//! `Vec<RecordedEvent>`. The events are plain `Copy` values, so a recording
//! can be inspected in tests or handed to [`chrome::export`](crate::chrome::export).
//!
//! Changed-node lists ([`on_node_changes`](TraceSink::on_node_changes)) store
//! only the count.

use diorama_core::surface::SurfaceId;
use diorama_core::trace::{
    AnimationTickEvent, DispatchEvent, FrameBeginEvent, FrameEndEvent, HitTestEvent,
    SkippedTargetEvent, SurfaceRepaintEvent, TraceSink,
};

/// A recorded event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A [`FrameBeginEvent`].
    FrameBegin(FrameBeginEvent),
    /// A [`FrameEndEvent`].
    FrameEnd(FrameEndEvent),
    /// A [`SurfaceRepaintEvent`].
    SurfaceRepaint(SurfaceRepaintEvent),
    /// A [`HitTestEvent`].
    HitTest(HitTestEvent),
    /// A [`DispatchEvent`].
    Dispatch(DispatchEvent),
    /// A [`SkippedTargetEvent`].
    SkippedTarget(SkippedTargetEvent),
    /// An [`AnimationTickEvent`].
    AnimationTick(AnimationTickEvent),
    /// Changed-node count for a surface repaint.
    NodeChangesCount {
        /// Frame counter.
        frame_index: u64,
        /// Which surface.
        surface: SurfaceId,
        /// Number of changed nodes.
        count: usize,
    },
}

impl RecordedEvent {
    /// Returns the frame counter the event belongs to, if it carries one.
    #[must_use]
    pub fn frame_index(&self) -> Option<u64> {
        match self {
            Self::FrameBegin(e) => Some(e.frame_index),
            Self::FrameEnd(e) => Some(e.frame_index),
            Self::SurfaceRepaint(e) => Some(e.frame_index),
            Self::SkippedTarget(e) => Some(e.frame_index),
            Self::AnimationTick(e) => Some(e.frame_index),
            Self::NodeChangesCount { frame_index, .. } => Some(*frame_index),
            Self::HitTest(_) | Self::Dispatch(_) => None,
        }
    }
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.events.push(RecordedEvent::FrameBegin(*e));
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        self.events.push(RecordedEvent::FrameEnd(*e));
    }

    fn on_surface_repaint(&mut self, e: &SurfaceRepaintEvent) {
        self.events.push(RecordedEvent::SurfaceRepaint(*e));
    }

    fn on_hit_test(&mut self, e: &HitTestEvent) {
        self.events.push(RecordedEvent::HitTest(*e));
    }

    fn on_dispatch(&mut self, e: &DispatchEvent) {
        self.events.push(RecordedEvent::Dispatch(*e));
    }

    fn on_skipped_target(&mut self, e: &SkippedTargetEvent) {
        self.events.push(RecordedEvent::SkippedTarget(*e));
    }

    fn on_animation_tick(&mut self, e: &AnimationTickEvent) {
        self.events.push(RecordedEvent::AnimationTick(*e));
    }

    fn on_node_changes(&mut self, frame_index: u64, surface: SurfaceId, nodes: &[u32]) {
        self.events.push(RecordedEvent::NodeChangesCount {
            frame_index,
            surface,
            count: nodes.len(),
        });
    }
}
