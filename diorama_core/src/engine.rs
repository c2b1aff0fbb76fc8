// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame loop tying animations to surface repaints.
//!
//! An [`Engine`] owns every [`Surface`] and every [`Animation`]. One frame
//! ([`Engine::repaint`]) updates all animations in registration order, then
//! repaints every surface, so a value written by an animation shows up in
//! the same frame.
//!
//! Frames are requested from a [`FrameHost`], the platform's "call me before
//! the next display refresh" primitive. The host later calls
//! [`Engine::on_frame`]. How often frames are requested depends on the
//! [`FrameMode`]:
//!
//! - **On-demand** (default): a frame requests a follow-up only if some
//!   animation was playing when it began. With nothing playing the loop goes
//!   idle. Starting or toggling an animation re-arms it, and edits made
//!   through [`Engine::edit`] or pointer listeners repaint their surface
//!   immediately.
//! - **Continuous**: once [`started`](Engine::start), every frame requests the
//!   next one until [`stop`](Engine::stop).

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Size};

use crate::animation::{
    Animation, AnimationFrame, AnimationId, CallbackAnimation, PropertyAnimation, SceneLookup,
};
use crate::draw::DrawingSurface;
use crate::error::EngineError;
use crate::event::{Dispatch, EventKind};
use crate::paint::ImageKey;
use crate::scene::{NodeId, Scene, SceneChanges};
use crate::surface::{Surface, SurfaceId};
use crate::time::{Duration, HostTime, Timebase};
#[cfg(feature = "trace-rich")]
use crate::trace::AnimationTickEvent;
use crate::trace::{
    DispatchEvent, FrameBeginEvent, FrameEndEvent, HitTestEvent, SkippedTargetEvent,
    SurfaceRepaintEvent, TraceSink, Tracer,
};

/// The platform's frame-presentation primitive.
pub trait FrameHost {
    /// Returns the current host time.
    fn now(&self) -> HostTime;

    /// Asks for one call to [`Engine::on_frame`] before the next refresh.
    fn request_frame(&mut self);

    /// Withdraws an outstanding frame request.
    fn cancel_frame(&mut self);
}

/// How the engine schedules frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FrameMode {
    /// Request frames only while animations play.
    #[default]
    OnDemand,
    /// Request a frame every refresh while running.
    Continuous,
}

impl FrameMode {
    /// Returns a lowercase name for display.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OnDemand => "on-demand",
            Self::Continuous => "continuous",
        }
    }
}

/// Configuration for the [`Engine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Frame scheduling mode.
    pub mode: FrameMode,
    /// Conversion from host ticks to nanoseconds, used to turn animation
    /// durations in seconds into ticks.
    pub timebase: Timebase,
}

impl EngineConfig {
    /// Frames only while something animates; nanosecond ticks.
    #[must_use]
    pub const fn on_demand() -> Self {
        Self {
            mode: FrameMode::OnDemand,
            timebase: Timebase::NANOS,
        }
    }

    /// A frame every refresh; nanosecond ticks.
    #[must_use]
    pub const fn continuous() -> Self {
        Self {
            mode: FrameMode::Continuous,
            timebase: Timebase::NANOS,
        }
    }

    /// Replaces the timebase.
    #[must_use]
    pub const fn with_timebase(mut self, timebase: Timebase) -> Self {
        self.timebase = timebase;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::on_demand()
    }
}

impl<D: DrawingSurface> SceneLookup for Vec<Surface<D>> {
    fn scene_mut(&mut self, surface: SurfaceId) -> Option<&mut Scene> {
        self.get_mut(surface.0 as usize).map(Surface::scene_mut)
    }
}

/// Owns surfaces and animations and drives the frame loop.
pub struct Engine<D, H> {
    config: EngineConfig,
    host: H,
    surfaces: Vec<Surface<D>>,
    animations: Vec<Animation>,
    frame_pending: bool,
    running: bool,
    frame_index: u64,
    sink: Option<Box<dyn TraceSink>>,
}

impl<D, H: fmt::Debug> fmt::Debug for Engine<D, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("host", &self.host)
            .field("surfaces", &self.surfaces)
            .field("animations", &self.animations)
            .field("frame_pending", &self.frame_pending)
            .field("running", &self.running)
            .field("frame_index", &self.frame_index)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl<D: DrawingSurface, H: FrameHost> Engine<D, H> {
    /// Creates an engine with no surfaces or animations.
    pub fn new(host: H, config: EngineConfig) -> Self {
        Self {
            config,
            host,
            surfaces: Vec::new(),
            animations: Vec::new(),
            frame_pending: false,
            running: false,
            frame_index: 0,
            sink: None,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the frame host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the frame host mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Installs a trace sink, replacing any previous one.
    pub fn set_trace_sink(&mut self, sink: impl TraceSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Removes and returns the trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.sink.take()
    }

    /// Returns how many frames have run.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Returns whether a frame request is outstanding.
    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Returns whether [`start`](Self::start) was called without a later
    /// [`stop`](Self::stop).
    pub fn is_running(&self) -> bool {
        self.running
    }

    // -- Surfaces --

    /// Adds a surface painting into `drawing`.
    pub fn add_surface(&mut self, drawing: D) -> SurfaceId {
        let id = next_index(self.surfaces.len());
        self.surfaces.push(Surface::new(drawing));
        SurfaceId(id)
    }

    /// Returns how many surfaces the engine owns.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns a surface.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSurface`] for an id from another engine.
    pub fn surface(&self, id: SurfaceId) -> Result<&Surface<D>, EngineError> {
        self.surfaces
            .get(id.0 as usize)
            .ok_or(EngineError::UnknownSurface(id))
    }

    /// Returns a surface mutably.
    ///
    /// Changes made here are painted by the next frame or by
    /// [`flush`](Self::flush).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSurface`] for an id from another engine.
    pub fn surface_mut(&mut self, id: SurfaceId) -> Result<&mut Surface<D>, EngineError> {
        self.surfaces
            .get_mut(id.0 as usize)
            .ok_or(EngineError::UnknownSurface(id))
    }

    /// Runs `f` on a surface's scene, then, in on-demand mode, repaints the
    /// surface right away if `f` changed anything.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSurface`] for an id from another engine.
    pub fn edit<R>(
        &mut self,
        surface: SurfaceId,
        f: impl FnOnce(&mut Scene) -> R,
    ) -> Result<R, EngineError> {
        let out = f(self.surface_mut(surface)?.scene_mut());
        self.with_tracer(|engine, tracer| engine.repaint_if_dirty(surface, tracer));
        Ok(out)
    }

    /// In on-demand mode, repaints every dirty surface right away.
    pub fn flush(&mut self) {
        self.with_tracer(|engine, tracer| {
            for id in (0_u32..).take(engine.surfaces.len()) {
                engine.repaint_if_dirty(SurfaceId(id), tracer);
            }
        });
    }

    /// Reports that the host finished loading `image`.
    ///
    /// Every shape waiting for it, through an
    /// [`ImageView`](crate::scene::ImageView) or a
    /// [`PatternFill`](crate::paint::PatternFill), is updated and marked
    /// changed. In on-demand mode the affected surfaces repaint right away.
    /// Returns how many shapes were marked.
    pub fn image_loaded(&mut self, image: ImageKey, size: Size) -> usize {
        let marked = self
            .surfaces
            .iter_mut()
            .map(|surface| surface.scene_mut().image_loaded(image, size))
            .sum();
        self.flush();
        marked
    }

    // -- Animations --

    /// Registers an animation. It does not play until started.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSurface`] if a property animation is
    /// bound to a surface this engine does not own.
    pub fn add_animation(&mut self, animation: Animation) -> Result<AnimationId, EngineError> {
        if let Animation::Property(surface, _) = &animation {
            self.surface(*surface)?;
        }
        let id = next_index(self.animations.len());
        self.animations.push(animation);
        Ok(AnimationId(id))
    }

    /// Registers a tween of the property called `name` on `node`, running
    /// from `start` to `end` over `secs` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSurface`] for a foreign surface id and
    /// [`EngineError::Property`] if the property cannot be bound.
    pub fn add_property_animation(
        &mut self,
        surface: SurfaceId,
        node: NodeId,
        name: &str,
        start: f64,
        end: f64,
        secs: f64,
    ) -> Result<AnimationId, EngineError> {
        let duration = Duration::from_secs_f64(secs, self.config.timebase);
        let scene = self.surface(surface)?.scene();
        let tween = PropertyAnimation::by_name(scene, node, name, start, end, duration)?;
        self.add_animation(Animation::Property(surface, tween))
    }

    /// Registers a per-frame callback.
    pub fn add_callback_animation(
        &mut self,
        callback: impl FnMut(&mut AnimationFrame<'_>) + 'static,
    ) -> AnimationId {
        let id = next_index(self.animations.len());
        self.animations
            .push(Animation::Callback(CallbackAnimation::new(callback)));
        AnimationId(id)
    }

    /// Returns an animation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAnimation`] for a foreign id.
    pub fn animation(&self, id: AnimationId) -> Result<&Animation, EngineError> {
        self.animations
            .get(id.0 as usize)
            .ok_or(EngineError::UnknownAnimation(id))
    }

    /// Returns an animation mutably, for example to change its loop flag.
    ///
    /// Playback changes made here do not re-arm the frame loop; use
    /// [`start_animation`](Self::start_animation) and friends for that.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAnimation`] for a foreign id.
    pub fn animation_mut(&mut self, id: AnimationId) -> Result<&mut Animation, EngineError> {
        self.animations
            .get_mut(id.0 as usize)
            .ok_or(EngineError::UnknownAnimation(id))
    }

    /// Starts an animation and re-arms the frame loop.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAnimation`] for a foreign id.
    pub fn start_animation(&mut self, id: AnimationId) -> Result<(), EngineError> {
        self.animation_mut(id)?.start();
        self.animation_changed();
        Ok(())
    }

    /// Flips an animation between playing and paused and re-arms the frame
    /// loop.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAnimation`] for a foreign id.
    pub fn toggle_animation(&mut self, id: AnimationId) -> Result<(), EngineError> {
        self.animation_mut(id)?.toggle();
        self.animation_changed();
        Ok(())
    }

    /// Pauses an animation. The loop idles on its own once nothing plays.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAnimation`] for a foreign id.
    pub fn pause_animation(&mut self, id: AnimationId) -> Result<(), EngineError> {
        self.animation_mut(id)?.pause();
        Ok(())
    }

    /// Reacts to a playback change.
    ///
    /// In on-demand mode with no frame outstanding, runs a frame now so the
    /// loop re-arms itself if anything plays. Otherwise the pending or next
    /// continuous frame picks the change up.
    pub fn animation_changed(&mut self) {
        if self.config.mode == FrameMode::OnDemand && !self.frame_pending {
            let now = self.host.now();
            self.repaint(now);
        }
    }

    // -- Frame loop --

    /// Paints once and marks the loop running. In continuous mode this also
    /// requests the first frame.
    pub fn start(&mut self) {
        self.running = true;
        let now = self.host.now();
        self.repaint(now);
    }

    /// Marks the loop stopped and cancels an outstanding frame request.
    pub fn stop(&mut self) {
        self.running = false;
        if self.frame_pending {
            self.host.cancel_frame();
            self.frame_pending = false;
        }
    }

    /// The host's frame callback.
    pub fn on_frame(&mut self, now: HostTime) {
        self.frame_pending = false;
        self.repaint(now);
    }

    /// Runs one frame at `now`: updates every animation, repaints every
    /// surface, and requests a follow-up frame if the mode calls for one.
    pub fn repaint(&mut self, now: HostTime) {
        self.with_tracer(|engine, tracer| engine.run_frame(now, tracer));
    }

    fn run_frame(&mut self, now: HostTime, tracer: &mut Tracer<'_>) {
        self.frame_index += 1;
        let frame_index = self.frame_index;
        tracer.frame_begin(&FrameBeginEvent {
            frame_index,
            now,
            mode: self.config.mode,
        });

        let mut playing = 0;
        for (animation, index) in self.animations.iter_mut().zip(0_u32..) {
            if animation.is_playing() {
                playing += 1;
            }
            match animation {
                Animation::Property(surface, tween) => {
                    let applied = match self.surfaces.get_mut(surface.0 as usize) {
                        Some(surface) => tween.update(now, surface.scene_mut()),
                        None => false,
                    };
                    if !applied {
                        tracer.skipped_target(&SkippedTargetEvent {
                            frame_index,
                            animation: AnimationId(index),
                            node: tween.target(),
                        });
                    }
                }
                Animation::Callback(callback) => {
                    let mut frame = AnimationFrame {
                        now,
                        frame_index,
                        scenes: &mut self.surfaces,
                    };
                    callback.update(&mut frame);
                }
            }
            #[cfg(feature = "trace-rich")]
            tracer.animation_tick(&AnimationTickEvent {
                frame_index,
                animation: AnimationId(index),
                kind: animation.kind(),
                playing: animation.is_playing(),
                value: animation.value(),
            });
        }

        for (surface, index) in self.surfaces.iter_mut().zip(0_u32..) {
            let changes = surface.repaint();
            trace_repaint(tracer, frame_index, SurfaceId(index), changes, false);
        }

        let wants_next = match self.config.mode {
            FrameMode::OnDemand => playing > 0,
            FrameMode::Continuous => self.running,
        };
        let next_frame_requested = wants_next && !self.frame_pending;
        if next_frame_requested {
            self.host.request_frame();
            self.frame_pending = true;
        }

        tracer.frame_end(&FrameEndEvent {
            frame_index,
            now,
            animations_playing: playing,
            next_frame_requested,
        });
    }

    // -- Pointer input --

    /// Delivers a button press at `pt` on `surface`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSurface`] for a foreign id.
    pub fn press(&mut self, surface: SurfaceId, pt: Point) -> Result<Dispatch, EngineError> {
        let dispatch = self.deliver(surface, pt, EventKind::Press, |s, pt| Some(s.press(pt)))?;
        Ok(dispatch.unwrap_or(Dispatch {
            hit: None,
            invoked: 0,
        }))
    }

    /// Delivers pointer motion to `pt` on `surface`. Returns `Ok(None)` if no
    /// button is held there.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSurface`] for a foreign id.
    pub fn pointer_move(
        &mut self,
        surface: SurfaceId,
        pt: Point,
    ) -> Result<Option<Dispatch>, EngineError> {
        self.deliver(surface, pt, EventKind::Drag, Surface::pointer_move)
    }

    /// Delivers a button release at `pt` on `surface`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSurface`] for a foreign id.
    pub fn release(&mut self, surface: SurfaceId, pt: Point) -> Result<Dispatch, EngineError> {
        let dispatch =
            self.deliver(surface, pt, EventKind::Release, |s, pt| Some(s.release(pt)))?;
        Ok(dispatch.unwrap_or(Dispatch {
            hit: None,
            invoked: 0,
        }))
    }

    fn deliver(
        &mut self,
        id: SurfaceId,
        pt: Point,
        kind: EventKind,
        f: impl FnOnce(&mut Surface<D>, Point) -> Option<Dispatch>,
    ) -> Result<Option<Dispatch>, EngineError> {
        let surface = self.surface_mut(id)?;
        let Some(dispatch) = f(surface, pt) else {
            return Ok(None);
        };
        self.with_tracer(|engine, tracer| {
            tracer.hit_test(&HitTestEvent {
                surface: id,
                point: pt,
                hit: dispatch.hit,
            });
            tracer.dispatch(&DispatchEvent {
                surface: id,
                kind,
                target: dispatch.hit,
                invoked: dispatch.invoked,
            });
            engine.repaint_if_dirty(id, tracer);
        });
        Ok(Some(dispatch))
    }

    /// Repaints one surface outside the frame loop, in on-demand mode only.
    fn repaint_if_dirty(&mut self, id: SurfaceId, tracer: &mut Tracer<'_>) {
        if self.config.mode != FrameMode::OnDemand {
            return;
        }
        let frame_index = self.frame_index;
        if let Some(surface) = self.surfaces.get_mut(id.0 as usize)
            && surface.is_dirty()
        {
            let changes = surface.repaint();
            trace_repaint(tracer, frame_index, id, changes, true);
        }
    }

    fn with_tracer<R>(&mut self, f: impl FnOnce(&mut Self, &mut Tracer<'_>) -> R) -> R {
        let mut sink = self.sink.take();
        let out = {
            let mut tracer = match sink.as_deref_mut() {
                Some(sink) => Tracer::new(sink),
                None => Tracer::none(),
            };
            f(self, &mut tracer)
        };
        self.sink = sink;
        out
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "surfaces and animations beyond u32::MAX are not addressable"
)]
fn next_index(len: usize) -> u32 {
    len as u32
}

fn trace_repaint(
    tracer: &mut Tracer<'_>,
    frame_index: u64,
    surface: SurfaceId,
    changes: &SceneChanges,
    immediate: bool,
) {
    tracer.surface_repaint(&SurfaceRepaintEvent {
        frame_index,
        surface,
        changed_nodes: changes.nodes.len(),
        topology_changed: changes.topology_changed,
        immediate,
    });
    #[cfg(feature = "trace-rich")]
    tracer.node_changes(frame_index, surface, &changes.nodes);
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::Cell;

    use kurbo::Rect;

    use super::*;
    use crate::paint::{Brush, Fill, PatternFill, Repeat};
    use crate::record::{DisplayList, DrawOp};
    use crate::scene::{Group, Property, Shape};

    /// Frame host with a hand-driven clock.
    #[derive(Debug, Default)]
    pub(crate) struct ManualHost {
        pub(crate) now: u64,
        pub(crate) requests: u32,
        pub(crate) cancels: u32,
    }

    impl FrameHost for ManualHost {
        fn now(&self) -> HostTime {
            HostTime(self.now)
        }

        fn request_frame(&mut self) {
            self.requests += 1;
        }

        fn cancel_frame(&mut self) {
            self.cancels += 1;
        }
    }

    type TestEngine = Engine<DisplayList, ManualHost>;

    fn engine(config: EngineConfig) -> (TestEngine, SurfaceId) {
        let mut engine = Engine::new(
            ManualHost::default(),
            config.with_timebase(Timebase::MILLIS),
        );
        let surface = engine.add_surface(DisplayList::new(Size::new(100.0, 100.0)));
        (engine, surface)
    }

    /// Runs the frame the host was asked for, at `now`.
    fn tick(engine: &mut TestEngine, now: u64) {
        assert!(engine.is_frame_pending(), "no frame was requested");
        engine.host_mut().now = now;
        engine.on_frame(HostTime(now));
    }

    fn scene_with_group(engine: &mut TestEngine, surface: SurfaceId) -> NodeId {
        engine
            .edit(surface, |scene| {
                let group = scene.insert(Group::new());
                scene.add_root(group);
                group
            })
            .unwrap()
    }

    /// Counts full-surface background fills, one per repaint.
    fn repaints(engine: &TestEngine, surface: SurfaceId) -> usize {
        let background = DrawOp::FillRect(Rect::new(0.0, 0.0, 100.0, 100.0));
        let list = engine.surface(surface).unwrap().drawing();
        list.items().iter().filter(|item| item.op == background).count()
    }

    #[test]
    fn idle_engine_schedules_nothing() {
        let (mut engine, _) = engine(EngineConfig::on_demand());
        engine.start();
        engine.repaint(HostTime(10));
        assert_eq!(engine.host().requests, 0, "nothing plays, so no frame");
        assert!(!engine.is_frame_pending());
    }

    #[test]
    fn tween_drives_frames_until_done() {
        let (mut engine, surface) = engine(EngineConfig::on_demand());
        let group = scene_with_group(&mut engine, surface);
        let anim = engine
            .add_property_animation(surface, group, "x", 0.0, 150.0, 5.0)
            .unwrap();

        engine.start_animation(anim).unwrap();
        assert_eq!(engine.host().requests, 1, "starting re-arms the loop");
        assert!(engine.animation(anim).unwrap().is_started());

        tick(&mut engine, 2_500);
        let value = engine.animation(anim).unwrap().value().unwrap();
        assert!((value - 75.0).abs() < 1e-9, "halfway through, got {value}");
        let scene = engine.surface(surface).unwrap().scene();
        assert_eq!(scene.property(group, Property::X), Some(value));

        tick(&mut engine, 5_001);
        assert!(!engine.animation(anim).unwrap().is_playing(), "finished");
        let requests = engine.host().requests;
        assert!(engine.is_frame_pending(), "the finishing frame still saw it playing");

        tick(&mut engine, 5_020);
        assert_eq!(engine.host().requests, requests, "loop went idle");
        assert!(!engine.is_frame_pending());
    }

    #[test]
    fn looping_tween_keeps_the_loop_alive() {
        let (mut engine, surface) = engine(EngineConfig::on_demand());
        let group = scene_with_group(&mut engine, surface);
        let anim = engine
            .add_property_animation(surface, group, "opacity", 0.0, 1.0, 0.1)
            .unwrap();
        engine
            .animation_mut(anim)
            .unwrap()
            .as_property_mut()
            .unwrap()
            .set_loop(true);
        engine.start_animation(anim).unwrap();

        for now in (16..=400).step_by(16) {
            tick(&mut engine, now);
            assert!(engine.animation(anim).unwrap().is_playing(), "loops forever");
        }
    }

    #[test]
    fn animation_updates_land_in_the_same_frame() {
        let (mut engine, surface) = engine(EngineConfig::on_demand());
        let rect = engine
            .edit(surface, |scene| {
                let rect = scene.insert(Shape::rect(0.0, 0.0, 10.0, 10.0));
                scene.add_root(rect);
                rect
            })
            .unwrap();
        let anim = engine
            .add_property_animation(surface, rect, "width", 10.0, 20.0, 1.0)
            .unwrap();
        engine.start_animation(anim).unwrap();
        tick(&mut engine, 500);

        let items = engine.surface(surface).unwrap().drawing().items().to_vec();
        let last = items.last().expect("rect was painted");
        assert_eq!(
            last.op,
            crate::record::DrawOp::FillRect(kurbo::Rect::new(0.0, 0.0, 15.0, 10.0)),
            "this frame's paint sees this frame's value"
        );
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let (mut engine, surface) = engine(EngineConfig::on_demand());
        let group = scene_with_group(&mut engine, surface);
        let anim = engine
            .add_property_animation(surface, group, "y", 0.0, 10.0, 10.0)
            .unwrap();
        engine.start_animation(anim).unwrap();
        tick(&mut engine, 100);

        engine.pause_animation(anim).unwrap();
        tick(&mut engine, 200);
        assert!(!engine.is_frame_pending(), "paused animation lets the loop idle");

        engine.toggle_animation(anim).unwrap();
        assert!(engine.animation(anim).unwrap().is_playing());
        assert!(engine.is_frame_pending(), "toggling back on re-arms");
    }

    #[test]
    fn continuous_mode_requests_every_frame() {
        let (mut engine, _) = engine(EngineConfig::continuous());
        engine.start();
        assert_eq!(engine.host().requests, 1);
        tick(&mut engine, 16);
        tick(&mut engine, 32);
        assert_eq!(engine.host().requests, 3, "one request per frame");

        engine.stop();
        assert_eq!(engine.host().cancels, 1, "stop withdraws the pending frame");
        assert!(!engine.is_frame_pending());
    }

    #[test]
    fn continuous_mode_without_animations_keeps_requesting() {
        let (mut engine, _) = engine(EngineConfig::continuous());
        engine.start();
        for (requested, now) in (1_u32..).zip([16, 32, 48, 64]) {
            assert_eq!(engine.host().requests, requested, "one request per frame so far");
            tick(&mut engine, now);
        }
        assert_eq!(engine.host().requests, 5, "every frame asked for the next");
        assert!(engine.is_frame_pending(), "the loop is still armed");
    }

    #[test]
    fn animation_changed_with_frame_pending_waits() {
        let (mut engine, surface) = engine(EngineConfig::on_demand());
        let group = scene_with_group(&mut engine, surface);
        let first = engine
            .add_property_animation(surface, group, "x", 0.0, 10.0, 1.0)
            .unwrap();
        let second = engine
            .add_property_animation(surface, group, "y", 0.0, 10.0, 1.0)
            .unwrap();

        engine.start_animation(first).unwrap();
        assert_eq!(engine.host().requests, 1, "first start arms the loop");
        let frame = engine.frame_index();
        let painted = repaints(&engine, surface);

        engine.start_animation(second).unwrap();
        engine.animation_changed();
        assert_eq!(engine.host().requests, 1, "the pending frame is reused");
        assert_eq!(engine.frame_index(), frame, "no frame ran early");
        assert_eq!(repaints(&engine, surface), painted, "no early repaint");

        tick(&mut engine, 16);
        assert_eq!(engine.host().requests, 2, "the pending frame re-arms once");
    }

    #[test]
    fn pattern_load_repaints_idle_surface_once() {
        let (mut engine, surface) = engine(EngineConfig::on_demand());
        let tile = DrawOp::FillRect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let pattern = Rc::new(PatternFill::new(ImageKey(4), Repeat::Repeat));
        engine
            .edit(surface, |scene| {
                let fill = Fill::generator(Rc::clone(&pattern));
                let rect = scene.insert(Shape::rect(0.0, 0.0, 10.0, 10.0).with_fill(fill));
                scene.add_root(rect);
            })
            .unwrap();
        let last_tile_brush = |engine: &TestEngine| {
            let list = engine.surface(surface).unwrap().drawing();
            let item = list.items().iter().rev().find(|item| item.op == tile);
            item.map(|item| item.brush.clone())
        };
        assert_eq!(repaints(&engine, surface), 1, "the edit painted once");
        assert_eq!(
            last_tile_brush(&engine),
            Some(Brush::Solid(PatternFill::FALLBACK)),
            "unloaded pattern paints the fallback"
        );

        let size = Size::new(8.0, 8.0);
        assert_eq!(engine.image_loaded(ImageKey(4), size), 1, "one shape waited");
        assert_eq!(repaints(&engine, surface), 2, "the load repainted exactly once");
        assert_eq!(
            last_tile_brush(&engine),
            Some(Brush::Pattern {
                image: ImageKey(4),
                repeat: Repeat::Repeat,
            }),
            "loaded pattern paints the image"
        );
        assert!(!engine.surface(surface).unwrap().is_dirty(), "repaint drained");
        assert_eq!(engine.host().requests, 0, "no frame is scheduled");

        assert_eq!(engine.image_loaded(ImageKey(4), size), 0, "nothing waits twice");
        assert_eq!(repaints(&engine, surface), 2, "a repeated load paints nothing");
    }

    #[test]
    fn callback_animation_edits_scenes() {
        let (mut engine, surface) = engine(EngineConfig::on_demand());
        let group = scene_with_group(&mut engine, surface);
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let anim = engine.add_callback_animation(move |frame: &mut AnimationFrame<'_>| {
            seen.set(seen.get() + 1);
            let x = frame_x(frame.frame_index());
            if let Some(scene) = frame.scene_mut(surface) {
                scene.group_mut(group).set_x(x);
            }
        });

        engine.start_animation(anim).unwrap();
        tick(&mut engine, 16);
        assert_eq!(calls.get(), 2, "ran on the re-arm frame and the next");
        assert!(engine.is_frame_pending(), "callbacks never finish");

        let x = engine.surface(surface).unwrap().scene().property(group, Property::X);
        assert_eq!(x, Some(frame_x(engine.frame_index())));
    }

    fn frame_x(frame_index: u64) -> f64 {
        if frame_index % 2 == 0 { 2.0 } else { 1.0 }
    }

    #[test]
    fn skipped_target_does_not_stall_others() {
        let (mut engine, surface) = engine(EngineConfig::on_demand());
        let doomed = scene_with_group(&mut engine, surface);
        let kept = scene_with_group(&mut engine, surface);
        let a = engine
            .add_property_animation(surface, doomed, "x", 0.0, 10.0, 1.0)
            .unwrap();
        let b = engine
            .add_property_animation(surface, kept, "x", 0.0, 10.0, 1.0)
            .unwrap();
        engine.edit(surface, |scene| scene.destroy(doomed)).unwrap();

        engine.start_animation(b).unwrap();
        engine.start_animation(a).unwrap();
        tick(&mut engine, 500);
        let x = engine.surface(surface).unwrap().scene().property(kept, Property::X);
        assert_eq!(x, Some(5.0), "later animations still run");
        assert!(!engine.animation(a).unwrap().is_playing(), "orphaned tween stops");
    }

    #[test]
    fn binding_errors_surface_at_registration() {
        let (mut engine, surface) = engine(EngineConfig::on_demand());
        let group = scene_with_group(&mut engine, surface);
        assert!(matches!(
            engine.add_property_animation(surface, group, "radius", 0.0, 1.0, 1.0),
            Err(EngineError::Property(_))
        ));
        assert_eq!(
            engine
                .add_property_animation(SurfaceId(9), group, "x", 0.0, 1.0, 1.0)
                .unwrap_err(),
            EngineError::UnknownSurface(SurfaceId(9))
        );
        assert_eq!(
            engine.start_animation(AnimationId(3)).unwrap_err(),
            EngineError::UnknownAnimation(AnimationId(3))
        );
    }

    #[test]
    fn press_listener_fires_once_and_repaints() {
        let (mut engine, surface) = engine(EngineConfig::on_demand());
        let node = engine
            .edit(surface, |scene| {
                let node = scene.insert(Shape::rect(0.0, 0.0, 50.0, 50.0));
                scene.add_root(node);
                node
            })
            .unwrap();
        let targets = Rc::new(core::cell::RefCell::new(vec![]));
        let log = Rc::clone(&targets);
        engine.surface_mut(surface).unwrap().on_press(node, move |scene, e| {
            log.borrow_mut().push(e.target);
            scene.shape_mut(e.target).set_stroke_width(3.0);
        });

        let dispatch = engine.press(surface, Point::new(25.0, 25.0)).unwrap();
        assert_eq!(dispatch.hit, Some(node));
        assert_eq!(*targets.borrow(), [node], "fired exactly once");
        assert!(
            !engine.surface(surface).unwrap().is_dirty(),
            "on-demand repaint ran after the listener"
        );
        assert_eq!(engine.host().requests, 0, "immediate repaint does not schedule");
    }

    #[test]
    fn move_without_press_is_ignored() {
        let (mut engine, surface) = engine(EngineConfig::on_demand());
        assert_eq!(engine.pointer_move(surface, Point::ORIGIN).unwrap(), None);
        engine.press(surface, Point::ORIGIN).unwrap();
        assert!(engine.pointer_move(surface, Point::ORIGIN).unwrap().is_some());
        engine.release(surface, Point::ORIGIN).unwrap();
        assert_eq!(engine.pointer_move(surface, Point::ORIGIN).unwrap(), None);
    }

    #[test]
    fn continuous_mode_defers_edits_to_the_next_frame() {
        let (mut engine, surface) = engine(EngineConfig::continuous());
        engine.start();
        engine
            .edit(surface, |scene| {
                let node = scene.insert(Group::new());
                scene.add_root(node);
            })
            .unwrap();
        assert!(engine.surface(surface).unwrap().is_dirty(), "waits for a frame");
        tick(&mut engine, 16);
        assert!(!engine.surface(surface).unwrap().is_dirty());
    }

    #[test]
    fn flush_repaints_background_changes() {
        let (mut engine, surface) = engine(EngineConfig::on_demand());
        engine
            .surface_mut(surface)
            .unwrap()
            .set_background(crate::paint::Color::BLACK);
        assert!(engine.surface(surface).unwrap().is_dirty());
        engine.flush();
        assert!(!engine.surface(surface).unwrap().is_dirty());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn trace_sink_sees_frames_and_dispatch() {
        use core::cell::RefCell;

        #[derive(Default)]
        struct Counts {
            begins: u32,
            ends_requesting: u32,
            repaints: u32,
            immediate: u32,
            dispatches: u32,
        }

        impl TraceSink for Counts {
            fn on_frame_begin(&mut self, _: &FrameBeginEvent) {
                self.begins += 1;
            }

            fn on_frame_end(&mut self, e: &FrameEndEvent) {
                if e.next_frame_requested {
                    self.ends_requesting += 1;
                }
            }

            fn on_surface_repaint(&mut self, e: &SurfaceRepaintEvent) {
                self.repaints += 1;
                if e.immediate {
                    self.immediate += 1;
                }
            }

            fn on_dispatch(&mut self, _: &DispatchEvent) {
                self.dispatches += 1;
            }
        }

        let (mut engine, surface) = engine(EngineConfig::on_demand());
        let counts = Rc::new(RefCell::new(Counts::default()));
        engine.set_trace_sink(Rc::clone(&counts));

        let group = scene_with_group(&mut engine, surface);
        let anim = engine
            .add_property_animation(surface, group, "x", 0.0, 1.0, 1.0)
            .unwrap();
        engine.start_animation(anim).unwrap();
        engine.press(surface, Point::ORIGIN).unwrap();

        let counts = counts.borrow();
        assert_eq!(counts.begins, 1, "one frame from the re-arm");
        assert_eq!(counts.ends_requesting, 1, "that frame asked for another");
        assert_eq!(counts.immediate, 1, "the edit repainted immediately");
        assert_eq!(counts.repaints, 2);
        assert_eq!(counts.dispatches, 1);
    }
}
