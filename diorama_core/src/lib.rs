// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode 2D scene graph with paint, hit testing, and animation.
//!
//! `diorama_core` keeps a tree of drawable nodes per surface, paints it
//! through an abstract [`DrawingSurface`](draw::DrawingSurface), routes
//! pointer input to listeners by hit testing, and runs property tweens and
//! per-frame callbacks from a host-driven frame loop. It is `no_std`
//! compatible (with `alloc`). Nodes live in an arena addressed by
//! generational handles.
//!
//! # Architecture
//!
//! ```text
//!   FrameHost ──► Engine::on_frame(now)
//!                     │
//!                     ├─► Animation::update ──► Scene::set_property
//!                     │                              │ (dirty)
//!                     ▼                              ▼
//!                 Surface::repaint ──► Scene::paint ──► DrawingSurface
//!
//!   pointer input ──► Engine::press/pointer_move/release
//!                     │
//!                     ▼
//!                 Scene::hit_test ──► listener callbacks ──► Scene edits
//! ```
//!
//! **[`scene`]**: node arena, group/transform/shape nodes, topology, the
//! property registry, paint traversal, and hit testing.
//!
//! **[`path`]**: segment paths with fractional sampling.
//!
//! **[`paint`]**: colors, brushes, and paint generators (gradients and
//! image patterns).
//!
//! **[`draw`]** and **[`record`]**: the drawing-surface contract and a
//! recording implementation.
//!
//! **[`dirty`]**: dirty-tracking channels via `understory_dirty`. A change
//! to any node reaches the surface's repaint flag through its ancestors.
//!
//! **[`event`]** and **[`surface`]**: pointer events, listener tables, and
//! the surface that owns a scene.
//!
//! **[`animation`]** and **[`engine`]**: animation state machines and the
//! frame loop.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! **[`time`]**: host time, timebases, and durations.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-animation
//!   tick and changed-node events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animation;
pub mod dirty;
pub mod draw;
pub mod engine;
pub mod error;
pub mod event;
pub mod paint;
pub mod path;
pub mod record;
pub mod scene;
pub mod surface;
pub mod time;
pub mod trace;
