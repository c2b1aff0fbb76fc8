// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph: node storage, topology, paint traversal, and hit testing.
//!
//! Each surface owns one [`Scene`], an arena of [`Node`]s addressed by
//! generational [`NodeId`] handles. Groups and transforms own their children
//! through child lists kept in the arena; the parent link exists only so a
//! change can find its way up to the surface's repaint flag.

mod hit;
mod id;
mod node;
mod paint;
mod property;
mod shape;
mod store;

pub use id::{INVALID, NodeId};
pub use node::{Group, Node, NodeKind, NodeType, Transform};
pub use property::Property;
pub use shape::{Circle, Ellipse, Geometry, ImageView, PathShape, Rect, Shape, Text};
pub use store::{Scene, SceneChanges};
