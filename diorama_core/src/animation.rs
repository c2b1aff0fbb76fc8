// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tweens and per-frame callbacks.
//!
//! Both kinds share a small play/pause state machine. `started` records
//! whether the current run has captured its start time; `playing` records
//! whether the engine should keep updating it.
//!
//! A [`PropertyAnimation`] linearly interpolates one numeric property of one
//! node. The property is resolved against the node's registry when the
//! animation is built, so a bad name fails there rather than mid-frame.
//!
//! ```text
//!            start()              elapsed > duration, !looping
//!   idle ──────────────▶ running ──────────────────────────────▶ finished
//!                         │   ▲
//!                         └───┘ elapsed > duration, looping
//!                                (restarts from `start` next tick)
//! ```
//!
//! A finished animation keeps the last value it computed, which need not be
//! exactly `end`.

use alloc::boxed::Box;
use core::fmt;

use crate::error::PropertyError;
use crate::scene::{NodeId, Property, Scene};
use crate::surface::SurfaceId;
use crate::time::{Duration, HostTime};

/// Identifies an animation registered with an
/// [`Engine`](crate::engine::Engine).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationId(pub(crate) u32);

impl AnimationId {
    /// Returns the raw index, which is also the update order.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnimationId({})", self.0)
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "animation {}", self.0)
    }
}

/// Which variant an animation is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// A [`PropertyAnimation`].
    Property,
    /// A [`CallbackAnimation`].
    Callback,
}

impl AnimationKind {
    /// Returns a lowercase name for display.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Callback => "callback",
        }
    }
}

// ---------------------------------------------------------------------------
// PropertyAnimation
// ---------------------------------------------------------------------------

/// Linear tween of one node property from `start` to `end`.
#[derive(Clone, Debug)]
pub struct PropertyAnimation {
    target: NodeId,
    property: Property,
    start: f64,
    end: f64,
    duration: Duration,
    looping: bool,
    started: bool,
    playing: bool,
    start_time: HostTime,
    value: f64,
}

impl PropertyAnimation {
    /// Binds a tween to `property` of `node`.
    ///
    /// The animation is created idle; call [`start`](Self::start) to run it.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`] if `node` is not alive in `scene`
    /// and [`PropertyError::Unsupported`] if its type lacks the property.
    pub fn new(
        scene: &Scene,
        node: NodeId,
        property: Property,
        start: f64,
        end: f64,
        duration: Duration,
    ) -> Result<Self, PropertyError> {
        let Some(target) = scene.get(node) else {
            return Err(PropertyError::StaleNode(node));
        };
        let node_type = target.node_type();
        if !node_type.supports(property) {
            return Err(PropertyError::Unsupported {
                property,
                node_type,
            });
        }
        Ok(Self {
            target: node,
            property,
            start,
            end,
            duration,
            looping: false,
            started: false,
            playing: false,
            start_time: HostTime(0),
            value: start,
        })
    }

    /// Like [`new`](Self::new), resolving the property by its registry name
    /// (for example `"x"` or `"translate_x"`).
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::UnknownProperty`] if no property has that
    /// name, plus the errors of [`new`](Self::new).
    pub fn by_name(
        scene: &Scene,
        node: NodeId,
        name: &str,
        start: f64,
        end: f64,
        duration: Duration,
    ) -> Result<Self, PropertyError> {
        let property = Property::from_name(name)
            .ok_or_else(|| PropertyError::UnknownProperty { name: name.into() })?;
        Self::new(scene, node, property, start, end, duration)
    }

    /// Sets whether the tween restarts after reaching the end.
    #[must_use]
    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Sets whether the tween restarts after reaching the end.
    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Returns the target node.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Returns the animated property.
    pub fn property(&self) -> Property {
        self.property
    }

    /// Returns the duration of one run.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns the most recently computed value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns whether the animation is being updated.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Returns whether the current run has captured its start time.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Returns whether the tween restarts after reaching the end.
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Starts (or resumes) playback.
    pub fn start(&mut self) {
        self.playing = true;
    }

    /// Flips between playing and paused.
    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    /// Pauses playback. A paused run keeps its start time, so elapsed time
    /// keeps counting while paused.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Advances the tween to `now` and writes the value to the target.
    ///
    /// Returns `false` if the target node no longer exists in `scene`, or
    /// no longer has the property (its geometry was replaced). The tween
    /// then stops playing without writing anything.
    pub fn update(&mut self, now: HostTime, scene: &mut Scene) -> bool {
        if !self.playing {
            return true;
        }
        if !scene.is_alive(self.target) {
            self.playing = false;
            return false;
        }
        if !self.started {
            self.started = true;
            self.start_time = now;
            self.value = self.start;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        if elapsed > self.duration {
            self.started = false;
            if !self.looping {
                self.playing = false;
            }
            return true;
        }
        self.value = self.start + self.fraction(elapsed) * (self.end - self.start);
        if !scene.set_property(self.target, self.property, self.value) {
            self.playing = false;
            return false;
        }
        true
    }

    fn fraction(&self, elapsed: Duration) -> f64 {
        if self.duration == Duration::ZERO {
            return 1.0;
        }
        elapsed.ticks() as f64 / self.duration.ticks() as f64
    }
}

// ---------------------------------------------------------------------------
// CallbackAnimation
// ---------------------------------------------------------------------------

/// What a [`CallbackAnimation`] sees on each tick.
pub struct AnimationFrame<'a> {
    pub(crate) now: HostTime,
    pub(crate) frame_index: u64,
    pub(crate) scenes: &'a mut dyn SceneLookup,
}

impl fmt::Debug for AnimationFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationFrame")
            .field("now", &self.now)
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl AnimationFrame<'_> {
    /// Returns the host time of this frame.
    pub fn now(&self) -> HostTime {
        self.now
    }

    /// Returns the frame counter.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Returns the scene of `surface` for editing, or `None` if the engine
    /// has no such surface.
    pub fn scene_mut(&mut self, surface: SurfaceId) -> Option<&mut Scene> {
        self.scenes.scene_mut(surface)
    }
}

/// Access to the engine's scenes by surface id.
pub(crate) trait SceneLookup {
    fn scene_mut(&mut self, surface: SurfaceId) -> Option<&mut Scene>;
}

/// Per-frame callback type.
pub type FrameCallback = Box<dyn FnMut(&mut AnimationFrame<'_>)>;

/// Runs a callback on every frame while playing.
///
/// There is no value and no automatic end; the animation runs until paused.
pub struct CallbackAnimation {
    callback: FrameCallback,
    started: bool,
    playing: bool,
}

impl fmt::Debug for CallbackAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackAnimation")
            .field("started", &self.started)
            .field("playing", &self.playing)
            .finish_non_exhaustive()
    }
}

impl CallbackAnimation {
    /// Wraps `callback`. The animation is created idle.
    pub fn new(callback: impl FnMut(&mut AnimationFrame<'_>) + 'static) -> Self {
        Self {
            callback: Box::new(callback),
            started: false,
            playing: false,
        }
    }

    /// Returns whether the animation is being updated.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Returns whether the callback has run at least once.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Starts (or resumes) playback.
    pub fn start(&mut self) {
        self.playing = true;
    }

    /// Flips between playing and paused.
    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    /// Pauses playback.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Runs the callback if playing.
    pub fn update(&mut self, frame: &mut AnimationFrame<'_>) {
        if !self.playing {
            return;
        }
        self.started = true;
        (self.callback)(frame);
    }
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// An animation registered with an engine.
#[derive(Debug)]
pub enum Animation {
    /// A property tween, bound to the surface whose scene holds its target.
    Property(SurfaceId, PropertyAnimation),
    /// A per-frame callback.
    Callback(CallbackAnimation),
}

impl Animation {
    /// Returns which variant this is.
    pub fn kind(&self) -> AnimationKind {
        match self {
            Self::Property(..) => AnimationKind::Property,
            Self::Callback(_) => AnimationKind::Callback,
        }
    }

    /// Returns whether the animation is being updated.
    pub fn is_playing(&self) -> bool {
        match self {
            Self::Property(_, a) => a.is_playing(),
            Self::Callback(a) => a.is_playing(),
        }
    }

    /// Returns whether the current run has started.
    pub fn is_started(&self) -> bool {
        match self {
            Self::Property(_, a) => a.is_started(),
            Self::Callback(a) => a.is_started(),
        }
    }

    /// Returns the current value of a property tween.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Property(_, a) => Some(a.value()),
            Self::Callback(_) => None,
        }
    }

    /// Returns the property tween, if this is one.
    pub fn as_property(&self) -> Option<&PropertyAnimation> {
        match self {
            Self::Property(_, a) => Some(a),
            Self::Callback(_) => None,
        }
    }

    /// Returns the property tween mutably, if this is one.
    pub fn as_property_mut(&mut self) -> Option<&mut PropertyAnimation> {
        match self {
            Self::Property(_, a) => Some(a),
            Self::Callback(_) => None,
        }
    }

    pub(crate) fn start(&mut self) {
        match self {
            Self::Property(_, a) => a.start(),
            Self::Callback(a) => a.start(),
        }
    }

    pub(crate) fn toggle(&mut self) {
        match self {
            Self::Property(_, a) => a.toggle(),
            Self::Callback(a) => a.toggle(),
        }
    }

    pub(crate) fn pause(&mut self) {
        match self {
            Self::Property(_, a) => a.pause(),
            Self::Callback(a) => a.pause(),
        }
    }
}
