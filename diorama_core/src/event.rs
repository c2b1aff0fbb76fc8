// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer events and the per-surface listener table.
//!
//! Listeners are registered against a [`NodeId`] and an [`EventKind`].
//! Dispatch first hit-tests the pointer position, then walks the table in
//! registration order and invokes every listener whose node is the hit node
//! and whose kind is one being dispatched. Matching is by handle equality
//! only; containment is not rechecked per listener.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::scene::{NodeId, Scene};

/// Which pointer gesture a listener reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Button went down over the node.
    Press,
    /// Button went up over the node.
    Release,
    /// Button went up over the node; delivered alongside [`Release`].
    ///
    /// [`Release`]: Self::Release
    Click,
    /// Pointer moved over the node while the button is held.
    Drag,
    /// Inertial drag continuation. Accepted for registration; no input
    /// currently produces it.
    MomentumDrag,
}

impl EventKind {
    /// Returns a lowercase name for display.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Press => "press",
            Self::Release => "release",
            Self::Click => "click",
            Self::Drag => "drag",
            Self::MomentumDrag => "momentum-drag",
        }
    }
}

/// What a listener receives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in surface coordinates.
    pub point: Point,
    /// The node under the pointer.
    pub target: NodeId,
}

/// Handle for removing a listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// Callback signature for listeners.
///
/// The callback may edit the scene it belongs to; the surface repaints
/// afterwards if needed.
pub type Callback = Box<dyn FnMut(&mut Scene, &PointerEvent)>;

struct Listener {
    id: ListenerId,
    node: NodeId,
    kind: EventKind,
    callback: Callback,
}

/// Result of one pointer dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatch {
    /// The node under the pointer, if any.
    pub hit: Option<NodeId>,
    /// How many listeners ran.
    pub invoked: usize,
}

/// Ordered table of listeners for one surface.
#[derive(Default)]
pub(crate) struct ListenerTable {
    entries: Vec<Listener>,
    next_id: u32,
}

impl fmt::Debug for ListenerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|l| (l.id, l.node, l.kind)))
            .finish()
    }
}

impl ListenerTable {
    pub(crate) fn add(&mut self, node: NodeId, kind: EventKind, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Listener {
            id,
            node,
            kind,
            callback,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|l| l.id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drops listeners whose node fails `alive`.
    pub(crate) fn retain_nodes(&mut self, mut alive: impl FnMut(NodeId) -> bool) {
        self.entries.retain(|l| alive(l.node));
    }

    /// Invokes every listener on `event.target` whose kind is in `kinds`,
    /// in registration order. Returns how many ran.
    pub(crate) fn dispatch(
        &mut self,
        scene: &mut Scene,
        kinds: &[EventKind],
        event: &PointerEvent,
    ) -> usize {
        let mut invoked = 0;
        for listener in &mut self.entries {
            if listener.node == event.target && kinds.contains(&listener.kind) {
                (listener.callback)(scene, event);
                invoked += 1;
            }
        }
        invoked
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;
    use crate::scene::Shape;

    #[test]
    fn dispatch_runs_matching_listeners_in_order() {
        let mut scene = Scene::new();
        let a = scene.insert(Shape::rect(0.0, 0.0, 1.0, 1.0));
        let b = scene.insert(Shape::rect(0.0, 0.0, 1.0, 1.0));
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut table = ListenerTable::default();
        for (node, kind, tag) in [
            (a, EventKind::Click, "a-click"),
            (b, EventKind::Release, "b-release"),
            (a, EventKind::Release, "a-release"),
            (a, EventKind::Press, "a-press"),
        ] {
            let log = Rc::clone(&log);
            table.add(
                node,
                kind,
                Box::new(move |_: &mut Scene, _: &PointerEvent| {
                    log.borrow_mut().push(tag);
                }),
            );
        }

        let event = PointerEvent {
            point: Point::ORIGIN,
            target: a,
        };
        let invoked = table.dispatch(
            &mut scene,
            &[EventKind::Release, EventKind::Click],
            &event,
        );
        assert_eq!(invoked, 2, "two listeners match");
        assert_eq!(*log.borrow(), vec!["a-click", "a-release"], "table order");
    }

    #[test]
    fn removed_listeners_do_not_run() {
        let mut scene = Scene::new();
        let a = scene.insert(Shape::rect(0.0, 0.0, 1.0, 1.0));
        let mut table = ListenerTable::default();
        let id = table.add(
            a,
            EventKind::Press,
            Box::new(|_: &mut Scene, _: &PointerEvent| panic!("removed")),
        );
        assert!(table.remove(id));
        assert!(!table.remove(id), "second removal is a no-op");
        assert_eq!(table.len(), 0);

        let event = PointerEvent {
            point: Point::ORIGIN,
            target: a,
        };
        assert_eq!(table.dispatch(&mut scene, &[EventKind::Press], &event), 0);
    }

    #[test]
    fn retain_nodes_drops_dead_entries() {
        let mut scene = Scene::new();
        let a = scene.insert(Shape::rect(0.0, 0.0, 1.0, 1.0));
        let b = scene.insert(Shape::rect(0.0, 0.0, 1.0, 1.0));
        let mut table = ListenerTable::default();
        table.add(a, EventKind::Press, Box::new(|_: &mut Scene, _: &PointerEvent| {}));
        let kept = table.add(b, EventKind::Press, Box::new(|_: &mut Scene, _: &PointerEvent| {}));

        scene.destroy(a);
        table.retain_nodes(|node| scene.is_alive(node));
        assert_eq!(table.len(), 1, "listener on the destroyed node is gone");
        assert!(table.remove(kept), "listener on the live node survives");
    }
}
