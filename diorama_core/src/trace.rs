// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Engine`](crate::engine::Engine) calls at each stage of a frame and of
//! pointer dispatch. All method bodies default to no-ops, so implementing only
//! the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! A sink installed on an engine must be `'static`. To read results back
//! afterwards, install an `Rc<RefCell<S>>` and keep a clone of the handle.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates per-animation tick events and
//!   per-surface changed-node lists, plus the corresponding `TraceSink`
//!   methods.

use alloc::rc::Rc;
use core::cell::RefCell;

use kurbo::Point;

use crate::animation::AnimationId;
#[cfg(feature = "trace-rich")]
use crate::animation::AnimationKind;
use crate::engine::FrameMode;
use crate::event::EventKind;
use crate::scene::NodeId;
use crate::surface::SurfaceId;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a frame (scheduled or immediate) begins.
#[derive(Clone, Copy, Debug)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host time the frame runs at.
    pub now: HostTime,
    /// Scheduling mode of the engine.
    pub mode: FrameMode,
}

/// Emitted when a frame has updated every animation and repainted every
/// surface.
#[derive(Clone, Copy, Debug)]
pub struct FrameEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time the frame ran at.
    pub now: HostTime,
    /// How many animations were playing when the frame began.
    pub animations_playing: usize,
    /// Whether this frame asked the host for another one.
    pub next_frame_requested: bool,
}

/// Emitted after a surface repaints.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceRepaintEvent {
    /// Frame counter of the enclosing frame.
    pub frame_index: u64,
    /// Which surface repainted.
    pub surface: SurfaceId,
    /// How many nodes changed since the previous repaint.
    pub changed_nodes: usize,
    /// Whether the tree structure changed since the previous repaint.
    pub topology_changed: bool,
    /// Whether this was an out-of-frame repaint after an edit or event.
    pub immediate: bool,
}

/// Emitted after a pointer position is hit-tested.
#[derive(Clone, Copy, Debug)]
pub struct HitTestEvent {
    /// Which surface was tested.
    pub surface: SurfaceId,
    /// Pointer position in surface coordinates.
    pub point: Point,
    /// The node found, if any.
    pub hit: Option<NodeId>,
}

/// Emitted after listeners for a pointer gesture ran.
#[derive(Clone, Copy, Debug)]
pub struct DispatchEvent {
    /// Which surface received the input.
    pub surface: SurfaceId,
    /// Gesture dispatched. A release reports [`EventKind::Release`] and also
    /// covers click listeners.
    pub kind: EventKind,
    /// The hit node, if any.
    pub target: Option<NodeId>,
    /// How many listeners ran.
    pub invoked: usize,
}

/// Emitted when a property animation stops because its target node was
/// destroyed or no longer has the animated property.
#[derive(Clone, Copy, Debug)]
pub struct SkippedTargetEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The animation.
    pub animation: AnimationId,
    /// The destroyed target.
    pub node: NodeId,
}

/// Emitted for every animation the engine updates.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct AnimationTickEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The animation.
    pub animation: AnimationId,
    /// Property or callback.
    pub kind: AnimationKind,
    /// Whether the animation is still playing after this update.
    pub playing: bool,
    /// Current value, for property animations.
    pub value: Option<f64>,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame begins.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called when a frame ends.
    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        _ = e;
    }

    /// Called after a surface repaints.
    fn on_surface_repaint(&mut self, e: &SurfaceRepaintEvent) {
        _ = e;
    }

    /// Called after a pointer hit test.
    fn on_hit_test(&mut self, e: &HitTestEvent) {
        _ = e;
    }

    /// Called after listeners for a gesture ran.
    fn on_dispatch(&mut self, e: &DispatchEvent) {
        _ = e;
    }

    /// Called when an animation's target can no longer be written.
    fn on_skipped_target(&mut self, e: &SkippedTargetEvent) {
        _ = e;
    }

    /// Called for every animation update (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_animation_tick(&mut self, e: &AnimationTickEvent) {
        _ = e;
    }

    /// Called with the node indices that changed on a surface since its
    /// previous repaint (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_changes(&mut self, frame_index: u64, surface: SurfaceId, nodes: &[u32]) {
        _ = (frame_index, surface, nodes);
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Rc<RefCell<S>> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.borrow_mut().on_frame_begin(e);
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        self.borrow_mut().on_frame_end(e);
    }

    fn on_surface_repaint(&mut self, e: &SurfaceRepaintEvent) {
        self.borrow_mut().on_surface_repaint(e);
    }

    fn on_hit_test(&mut self, e: &HitTestEvent) {
        self.borrow_mut().on_hit_test(e);
    }

    fn on_dispatch(&mut self, e: &DispatchEvent) {
        self.borrow_mut().on_dispatch(e);
    }

    fn on_skipped_target(&mut self, e: &SkippedTargetEvent) {
        self.borrow_mut().on_skipped_target(e);
    }

    #[cfg(feature = "trace-rich")]
    fn on_animation_tick(&mut self, e: &AnimationTickEvent) {
        self.borrow_mut().on_animation_tick(e);
    }

    #[cfg(feature = "trace-rich")]
    fn on_node_changes(&mut self, frame_index: u64, surface: SurfaceId, nodes: &[u32]) {
        self.borrow_mut().on_node_changes(frame_index, surface, nodes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEndEvent`].
    #[inline]
    pub fn frame_end(&mut self, e: &FrameEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SurfaceRepaintEvent`].
    #[inline]
    pub fn surface_repaint(&mut self, e: &SurfaceRepaintEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_surface_repaint(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`HitTestEvent`].
    #[inline]
    pub fn hit_test(&mut self, e: &HitTestEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_hit_test(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DispatchEvent`].
    #[inline]
    pub fn dispatch(&mut self, e: &DispatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_dispatch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SkippedTargetEvent`].
    #[inline]
    pub fn skipped_target(&mut self, e: &SkippedTargetEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_skipped_target(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AnimationTickEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn animation_tick(&mut self, e: &AnimationTickEvent) {
        if let Some(s) = &mut self.sink {
            s.on_animation_tick(e);
        }
    }

    /// Emits a surface's changed-node list (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_changes(&mut self, frame_index: u64, surface: SurfaceId, nodes: &[u32]) {
        if let Some(s) = &mut self.sink {
            s.on_node_changes(frame_index, surface, nodes);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn begin() -> FrameBeginEvent {
        FrameBeginEvent {
            frame_index: 3,
            now: HostTime(1_000),
            mode: FrameMode::OnDemand,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_frame_begin(&begin());
        sink.on_hit_test(&HitTestEvent {
            surface: SurfaceId(0),
            point: Point::ORIGIN,
            hit: None,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame_begin(&begin());
        tracer.frame_end(&FrameEndEvent {
            frame_index: 3,
            now: HostTime(1_000),
            animations_playing: 0,
            next_frame_requested: false,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        #[derive(Default)]
        struct Count {
            begins: u32,
            dispatches: u32,
        }

        impl TraceSink for Count {
            fn on_frame_begin(&mut self, _: &FrameBeginEvent) {
                self.begins += 1;
            }

            fn on_dispatch(&mut self, _: &DispatchEvent) {
                self.dispatches += 1;
            }
        }

        let mut sink = Count::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            tracer.frame_begin(&begin());
            tracer.frame_begin(&begin());
            tracer.dispatch(&DispatchEvent {
                surface: SurfaceId(0),
                kind: EventKind::Press,
                target: None,
                invoked: 0,
            });
        }
        assert_eq!(sink.begins, 2, "both frame begins reach the sink");
        assert_eq!(sink.dispatches, 1, "dispatch reaches the sink");
    }

    #[cfg(feature = "trace")]
    #[test]
    fn shared_sink_forwards_through_handle() {
        #[derive(Default)]
        struct Last(Option<u64>);

        impl TraceSink for Last {
            fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
                self.0 = Some(e.frame_index);
            }
        }

        let shared = Rc::new(RefCell::new(Last::default()));
        let mut handle = Rc::clone(&shared);
        Tracer::new(&mut handle).frame_begin(&begin());
        assert_eq!(shared.borrow().0, Some(3), "shared handle sees the event");
    }
}
