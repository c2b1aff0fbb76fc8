// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use diorama_core::scene::NodeId;
use diorama_core::surface::SurfaceId;
use diorama_core::time::{HostTime, Timebase};
use diorama_core::trace::{
    AnimationTickEvent, DispatchEvent, FrameBeginEvent, FrameEndEvent, HitTestEvent,
    SkippedTargetEvent, SurfaceRepaintEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn host_ms(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1_000_000.0
    }
}

fn node_or_none(node: Option<NodeId>) -> String {
    node.map_or_else(|| "-".to_owned(), |n| n.to_string())
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[frame:begin] frame={} now={:.3}ms mode={}",
            e.frame_index,
            self.host_ms(e.now),
            e.mode.name(),
        );
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        let next = if e.next_frame_requested { "requested" } else { "idle" };
        let _ = writeln!(
            self.writer,
            "[frame:end] frame={} playing={} next={next}",
            e.frame_index, e.animations_playing,
        );
    }

    fn on_surface_repaint(&mut self, e: &SurfaceRepaintEvent) {
        let _ = writeln!(
            self.writer,
            "[repaint] frame={} {} changed={} topology={}{}",
            e.frame_index,
            e.surface,
            e.changed_nodes,
            e.topology_changed,
            if e.immediate { " (immediate)" } else { "" },
        );
    }

    fn on_hit_test(&mut self, e: &HitTestEvent) {
        let _ = writeln!(
            self.writer,
            "[hit] {} at ({:.1}, {:.1}) -> {}",
            e.surface,
            e.point.x,
            e.point.y,
            node_or_none(e.hit),
        );
    }

    fn on_dispatch(&mut self, e: &DispatchEvent) {
        let _ = writeln!(
            self.writer,
            "[dispatch] {} {} target={} listeners={}",
            e.surface,
            e.kind.name(),
            node_or_none(e.target),
            e.invoked,
        );
    }

    fn on_skipped_target(&mut self, e: &SkippedTargetEvent) {
        let _ = writeln!(
            self.writer,
            "[skip] frame={} {} target {} is gone",
            e.frame_index, e.animation, e.node,
        );
    }

    fn on_animation_tick(&mut self, e: &AnimationTickEvent) {
        let value = e
            .value
            .map_or_else(|| "-".to_owned(), |v| format!("{v:.3}"));
        let _ = writeln!(
            self.writer,
            "[anim] frame={} {} {} playing={} value={value}",
            e.frame_index,
            e.animation,
            e.kind.name(),
            e.playing,
        );
    }

    fn on_node_changes(&mut self, frame_index: u64, surface: SurfaceId, nodes: &[u32]) {
        let _ = writeln!(
            self.writer,
            "[nodes] frame={frame_index} {surface} changed={nodes:?}",
        );
    }
}
