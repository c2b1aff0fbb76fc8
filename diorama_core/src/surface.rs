// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable areas: a scene, a drawing surface, and pointer wiring.
//!
//! A [`Surface`] pairs a [`Scene`] with the [`DrawingSurface`] it paints
//! into. It owns the background settings and the listener table, and keeps
//! the button state needed to tell drags from plain moves.
//!
//! Pointer positions arrive already in surface coordinates; translating
//! window or page coordinates is the host's job.

use core::fmt;

use kurbo::{Point, Rect};

use crate::draw::DrawingSurface;
use crate::event::{Dispatch, EventKind, ListenerId, ListenerTable, PointerEvent};
use crate::paint::{Brush, Color};
use crate::scene::{NodeId, Scene, SceneChanges};

/// Identifies a surface within an [`Engine`](crate::engine::Engine).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub(crate) u32);

impl SurfaceId {
    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", self.0)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface {}", self.0)
    }
}

/// A scene bound to a drawing surface.
pub struct Surface<D> {
    drawing: D,
    scene: Scene,
    background: Color,
    transparent: bool,
    listeners: ListenerTable,
    pressed: bool,
    changes: SceneChanges,
}

impl<D> fmt::Debug for Surface<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("scene", &self.scene)
            .field("background", &self.background)
            .field("transparent", &self.transparent)
            .field("listeners", &self.listeners)
            .field("pressed", &self.pressed)
            .finish_non_exhaustive()
    }
}

impl<D: DrawingSurface> Surface<D> {
    /// Creates a surface with an empty scene and an opaque white background.
    pub fn new(drawing: D) -> Self {
        Self {
            drawing,
            scene: Scene::new(),
            background: Color::WHITE,
            transparent: false,
            listeners: ListenerTable::default(),
            pressed: false,
            changes: SceneChanges::default(),
        }
    }

    /// Returns the scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the scene for editing.
    ///
    /// Edits made here are picked up by the next repaint. To have an
    /// on-demand engine repaint right away, edit through
    /// [`Engine::edit`](crate::engine::Engine::edit) instead.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Returns the drawing surface.
    pub fn drawing(&self) -> &D {
        &self.drawing
    }

    /// Returns the drawing surface mutably.
    pub fn drawing_mut(&mut self) -> &mut D {
        &mut self.drawing
    }

    /// Returns the background color.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Sets the background color and flags the surface for repaint.
    pub fn set_background(&mut self, color: Color) -> &mut Self {
        self.background = color;
        self.scene.needs_repaint = true;
        self
    }

    /// Returns whether the background fill is skipped.
    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// Skips (or restores) the background fill and flags the surface for
    /// repaint.
    pub fn set_transparent(&mut self, transparent: bool) -> &mut Self {
        self.transparent = transparent;
        self.scene.needs_repaint = true;
        self
    }

    /// Returns whether the surface needs a repaint.
    pub fn is_dirty(&self) -> bool {
        self.scene.is_dirty()
    }

    /// Returns whether a pointer button is held.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Returns the change record of the most recent repaint.
    pub fn last_changes(&self) -> &SceneChanges {
        &self.changes
    }

    /// Fills the background, paints the scene, and clears the dirty flag.
    ///
    /// The whole scene is painted inside one outer save/restore bracket.
    /// The returned record lists what changed since the previous repaint.
    pub fn repaint(&mut self) -> &SceneChanges {
        let size = self.drawing.size();
        self.drawing.set_fill(&Brush::Solid(self.background));
        if !self.transparent {
            self.drawing
                .fill_rect(Rect::from_origin_size(Point::ORIGIN, size));
        }
        self.drawing.save();
        self.scene.paint(&mut self.drawing);
        self.drawing.restore();
        self.scene.drain_changes_into(&mut self.changes);
        &self.changes
    }

    /// Returns the topmost visible node at `pt`.
    pub fn find_node(&self, pt: Point) -> Option<NodeId> {
        self.scene.hit_test(pt)
    }

    // -- Listener registration --

    /// Registers a listener for `kind` events on `node`.
    pub fn add_listener(
        &mut self,
        node: NodeId,
        kind: EventKind,
        callback: impl FnMut(&mut Scene, &PointerEvent) + 'static,
    ) -> ListenerId {
        self.listeners.add(node, kind, alloc::boxed::Box::new(callback))
    }

    /// Registers a press listener.
    pub fn on_press(
        &mut self,
        node: NodeId,
        callback: impl FnMut(&mut Scene, &PointerEvent) + 'static,
    ) -> ListenerId {
        self.add_listener(node, EventKind::Press, callback)
    }

    /// Registers a release listener.
    pub fn on_release(
        &mut self,
        node: NodeId,
        callback: impl FnMut(&mut Scene, &PointerEvent) + 'static,
    ) -> ListenerId {
        self.add_listener(node, EventKind::Release, callback)
    }

    /// Registers a click listener.
    pub fn on_click(
        &mut self,
        node: NodeId,
        callback: impl FnMut(&mut Scene, &PointerEvent) + 'static,
    ) -> ListenerId {
        self.add_listener(node, EventKind::Click, callback)
    }

    /// Registers a drag listener.
    pub fn on_drag(
        &mut self,
        node: NodeId,
        callback: impl FnMut(&mut Scene, &PointerEvent) + 'static,
    ) -> ListenerId {
        self.add_listener(node, EventKind::Drag, callback)
    }

    /// Registers a momentum-drag listener.
    pub fn on_momentum_drag(
        &mut self,
        node: NodeId,
        callback: impl FnMut(&mut Scene, &PointerEvent) + 'static,
    ) -> ListenerId {
        self.add_listener(node, EventKind::MomentumDrag, callback)
    }

    /// Unregisters a listener. Returns `false` if it was already gone.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Returns how many listeners are registered.
    ///
    /// Listeners on destroyed nodes are dropped at the next pointer dispatch.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // -- Pointer input --

    /// Handles a button press at `pt`.
    pub fn press(&mut self, pt: Point) -> Dispatch {
        self.pressed = true;
        self.dispatch(pt, &[EventKind::Press])
    }

    /// Handles pointer motion to `pt`. Returns `None` without hit-testing
    /// unless a button is held.
    pub fn pointer_move(&mut self, pt: Point) -> Option<Dispatch> {
        if !self.pressed {
            return None;
        }
        Some(self.dispatch(pt, &[EventKind::Drag]))
    }

    /// Handles a button release at `pt`, delivering release and click
    /// listeners in table order.
    pub fn release(&mut self, pt: Point) -> Dispatch {
        self.pressed = false;
        self.dispatch(pt, &[EventKind::Release, EventKind::Click])
    }

    fn dispatch(&mut self, pt: Point, kinds: &[EventKind]) -> Dispatch {
        let scene = &self.scene;
        self.listeners.retain_nodes(|node| scene.is_alive(node));
        let hit = self.scene.hit_test(pt);
        let invoked = match hit {
            Some(target) => {
                let event = PointerEvent { point: pt, target };
                self.listeners.dispatch(&mut self.scene, kinds, &event)
            }
            None => 0,
        };
        Dispatch { hit, invoked }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use kurbo::{Affine, Size};

    use super::*;
    use crate::record::{DisplayList, DrawOp};
    use crate::scene::{Group, Shape};

    fn surface() -> Surface<DisplayList> {
        Surface::new(DisplayList::new(Size::new(200.0, 100.0)))
    }

    #[test]
    fn repaint_fills_background_then_scene() {
        let mut s = surface();
        let rect = s.scene_mut().insert(Shape::rect(0.0, 0.0, 10.0, 10.0));
        s.scene_mut().add_root(rect);
        assert!(s.is_dirty());

        let changes = s.repaint().clone();
        assert!(changes.topology_changed);
        assert!(!s.is_dirty(), "repaint clears the flag");

        let items = s.drawing().items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].op, DrawOp::FillRect(Rect::new(0.0, 0.0, 200.0, 100.0)));
        assert_eq!(items[0].brush, Brush::Solid(Color::WHITE));
        assert_eq!(items[1].transform, Affine::IDENTITY);
        assert_eq!(s.drawing().depth(), 0, "outer bracket is balanced");
    }

    #[test]
    fn transparent_surface_skips_background() {
        let mut s = surface();
        s.set_transparent(true).set_background(Color::BLUE);
        s.repaint();
        assert!(s.drawing().items().is_empty());
    }

    #[test]
    fn press_fires_once_with_target() {
        let mut s = surface();
        let node = s.scene_mut().insert(Shape::rect(0.0, 0.0, 50.0, 50.0));
        let other = s.scene_mut().insert(Shape::rect(100.0, 0.0, 50.0, 50.0));
        s.scene_mut().add_root(node).add_root(other);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        s.on_press(node, move |_, e| log.borrow_mut().push(e.target));

        let d = s.press(Point::new(25.0, 25.0));
        assert_eq!(d, Dispatch { hit: Some(node), invoked: 1 });
        assert_eq!(*seen.borrow(), [node], "callback fired exactly once");
        assert!(s.is_pressed());
    }

    #[test]
    fn move_only_drags_while_pressed() {
        let mut s = surface();
        let node = s.scene_mut().insert(Shape::rect(0.0, 0.0, 50.0, 50.0));
        s.scene_mut().add_root(node);
        let drags = Rc::new(Cell::new(0));
        let count = Rc::clone(&drags);
        s.on_drag(node, move |_, _| count.set(count.get() + 1));

        assert_eq!(s.pointer_move(Point::new(10.0, 10.0)), None);
        s.press(Point::new(10.0, 10.0));
        assert_eq!(
            s.pointer_move(Point::new(20.0, 20.0)),
            Some(Dispatch { hit: Some(node), invoked: 1 })
        );
        s.release(Point::new(20.0, 20.0));
        assert_eq!(s.pointer_move(Point::new(30.0, 30.0)), None);
        assert_eq!(drags.get(), 1);
    }

    #[test]
    fn release_routes_to_node_under_pointer() {
        let mut s = surface();
        let a = s.scene_mut().insert(Shape::rect(0.0, 0.0, 50.0, 50.0));
        let b = s.scene_mut().insert(Shape::rect(100.0, 0.0, 50.0, 50.0));
        s.scene_mut().add_root(a).add_root(b);

        let log = Rc::new(RefCell::new(Vec::new()));
        for (node, kind, tag) in [
            (a, EventKind::Release, "a-release"),
            (b, EventKind::Click, "b-click"),
            (b, EventKind::Release, "b-release"),
        ] {
            let log = Rc::clone(&log);
            s.add_listener(node, kind, move |_, _| log.borrow_mut().push(tag));
        }

        s.press(Point::new(10.0, 10.0));
        let d = s.release(Point::new(110.0, 10.0));
        assert_eq!(d.hit, Some(b));
        assert_eq!(*log.borrow(), ["b-click", "b-release"]);
        assert!(!s.is_pressed());
    }

    #[test]
    fn callbacks_can_edit_the_scene() {
        let mut s = surface();
        let group = s.scene_mut().insert(Group::new());
        let rect = s.scene_mut().insert(Shape::rect(0.0, 0.0, 50.0, 50.0));
        s.scene_mut().add_root(group).add_child(group, rect);
        s.repaint();

        s.on_press(rect, move |scene, _| {
            scene.group_mut(group).set_x(5.0);
        });
        s.press(Point::new(1.0, 1.0));
        assert!(s.is_dirty());
        assert_eq!(s.scene().node(group).as_group().map(Group::x), Some(5.0));
    }

    #[test]
    fn momentum_drag_is_registered_but_never_dispatched() {
        let mut s = surface();
        let node = s.scene_mut().insert(Shape::rect(0.0, 0.0, 50.0, 50.0));
        s.scene_mut().add_root(node);
        let fired = Rc::new(Cell::new(0));
        let count = Rc::clone(&fired);
        let id = s.on_momentum_drag(node, move |_, _| count.set(count.get() + 1));
        assert_eq!(s.listener_count(), 1, "registration is accepted");

        assert_eq!(s.press(Point::new(10.0, 10.0)).invoked, 0);
        assert_eq!(
            s.pointer_move(Point::new(20.0, 20.0)).map(|d| d.invoked),
            Some(0)
        );
        assert_eq!(s.release(Point::new(30.0, 30.0)).invoked, 0);
        assert_eq!(fired.get(), 0, "no input produces a momentum drag");
        assert!(s.remove_listener(id));
    }

    #[test]
    fn listeners_of_destroyed_nodes_are_pruned() {
        let mut s = surface();
        let gone = s.scene_mut().insert(Shape::rect(0.0, 0.0, 50.0, 50.0));
        let kept = s.scene_mut().insert(Shape::rect(100.0, 0.0, 50.0, 50.0));
        s.scene_mut().add_root(gone).add_root(kept);
        s.on_press(gone, |_, _| {});
        s.on_click(gone, |_, _| {});
        s.on_press(kept, |_, _| {});
        assert_eq!(s.listener_count(), 3);

        s.scene_mut().destroy(gone);
        let d = s.press(Point::new(110.0, 10.0));
        assert_eq!(d.invoked, 1, "the live node still hears its press");
        assert_eq!(s.listener_count(), 1, "dead node's listeners are dropped");
    }

    #[test]
    fn miss_invokes_nothing() {
        let mut s = surface();
        let d = s.press(Point::new(1.0, 1.0));
        assert_eq!(d, Dispatch { hit: None, invoked: 0 });
    }
}
