// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless host that drives a small scene through the engine.
//!
//! Builds a scene with a tweened group, a circle that follows a path, and a
//! clickable button, then runs simulated frames at 60 Hz while replaying a
//! press, drag, and release. Events go to a
//! [`PrettyPrintSink`](diorama_debug::pretty::PrettyPrintSink) on stdout and
//! a [`RecorderSink`](diorama_debug::recorder::RecorderSink), whose contents
//! are exported as a Chrome trace at the end.
//!
//! Usage: `headless_scene [trace.json]`

use std::cell::RefCell;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use diorama_core::engine::{Engine, EngineConfig, FrameHost};
use diorama_core::paint::{Color, Fill, LinearGradient};
use diorama_core::path::Path;
use diorama_core::record::DisplayList;
use diorama_core::scene::{Group, NodeId, Property, Shape};
use diorama_core::surface::SurfaceId;
use diorama_core::time::{HostTime, Timebase};
use diorama_core::trace::{
    AnimationTickEvent, DispatchEvent, FrameBeginEvent, FrameEndEvent, HitTestEvent,
    SkippedTargetEvent, SurfaceRepaintEvent, TraceSink,
};
use diorama_debug::pretty::PrettyPrintSink;
use diorama_debug::recorder::RecorderSink;
use kurbo::{Point, Size};

/// Host timestamps are milliseconds.
const TIMEBASE: Timebase = Timebase::MILLIS;
const REFRESH_INTERVAL_MS: u64 = 16;
const MAX_FRAMES: u64 = 120;

/// Frame host backed by a simulated clock.
#[derive(Debug, Default)]
struct SimHost {
    now: u64,
    pending: bool,
    requests: u32,
}

impl FrameHost for SimHost {
    fn now(&self) -> HostTime {
        HostTime(self.now)
    }

    fn request_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }

    fn cancel_frame(&mut self) {
        self.pending = false;
    }
}

/// Forwards every event to both sinks.
struct Fanout {
    pretty: PrettyPrintSink,
    recorder: Rc<RefCell<RecorderSink>>,
}

impl TraceSink for Fanout {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.pretty.on_frame_begin(e);
        self.recorder.on_frame_begin(e);
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        self.pretty.on_frame_end(e);
        self.recorder.on_frame_end(e);
    }

    fn on_surface_repaint(&mut self, e: &SurfaceRepaintEvent) {
        self.pretty.on_surface_repaint(e);
        self.recorder.on_surface_repaint(e);
    }

    fn on_hit_test(&mut self, e: &HitTestEvent) {
        self.pretty.on_hit_test(e);
        self.recorder.on_hit_test(e);
    }

    fn on_dispatch(&mut self, e: &DispatchEvent) {
        self.pretty.on_dispatch(e);
        self.recorder.on_dispatch(e);
    }

    fn on_skipped_target(&mut self, e: &SkippedTargetEvent) {
        self.pretty.on_skipped_target(e);
        self.recorder.on_skipped_target(e);
    }

    fn on_animation_tick(&mut self, e: &AnimationTickEvent) {
        self.pretty.on_animation_tick(e);
        self.recorder.on_animation_tick(e);
    }

    fn on_node_changes(&mut self, frame_index: u64, surface: SurfaceId, nodes: &[u32]) {
        self.pretty.on_node_changes(frame_index, surface, nodes);
        self.recorder.on_node_changes(frame_index, surface, nodes);
    }
}

struct Nodes {
    panel: NodeId,
    backdrop: NodeId,
    follower: NodeId,
    button: NodeId,
}

fn build_scene(engine: &mut Engine<DisplayList, SimHost>, surface: SurfaceId) -> Nodes {
    engine
        .edit(surface, |scene| {
            let panel = scene.insert(Group::new().with_offset(20.0, 20.0));
            let backdrop = scene.insert(
                Shape::rect(0.0, 0.0, 200.0, 120.0).with_fill(Fill::generator(
                    LinearGradient::new(Point::ORIGIN, Point::new(200.0, 0.0))
                        .with_stop(0.0, Color::WHITE)
                        .with_stop(1.0, Color::GRAY),
                )),
            );
            let label = scene.insert(Shape::text("diorama", 10.0, 20.0));
            scene
                .add_root(panel)
                .add_child(panel, backdrop)
                .add_child(panel, label);

            let follower = scene.insert(Shape::circle(0.0, 0.0, 8.0).with_fill(Color::BLUE));
            let button = scene.insert(
                Shape::rect(240.0, 20.0, 60.0, 30.0)
                    .with_fill(Color::GREEN)
                    .with_stroke(Color::BLACK),
            );
            scene.add_root(follower).add_root(button);
            Nodes {
                panel,
                backdrop,
                follower,
                button,
            }
        })
        .expect("surface belongs to this engine")
}

fn main() {
    let trace_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "trace.json".to_owned());

    // -- sinks -------------------------------------------------------------
    let recorder = Rc::new(RefCell::new(RecorderSink::new()));
    let sink = Fanout {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout()), TIMEBASE),
        recorder: Rc::clone(&recorder),
    };

    // -- engine and scene --------------------------------------------------
    let host = SimHost {
        now: 1_000,
        ..SimHost::default()
    };
    let mut engine = Engine::new(host, EngineConfig::on_demand().with_timebase(TIMEBASE));
    engine.set_trace_sink(sink);
    let surface = engine.add_surface(DisplayList::new(Size::new(320.0, 200.0)));
    let nodes = build_scene(&mut engine, surface);

    {
        let s = engine.surface_mut(surface).expect("surface exists");
        s.set_background(Color::rgb(30, 30, 40));
        let button = nodes.button;
        let mut clicks = 0_u32;
        s.on_click(button, move |scene, _| {
            clicks += 1;
            let fill = if clicks % 2 == 1 { Color::RED } else { Color::GREEN };
            scene.shape_mut(button).set_fill(fill);
        });
        let panel = nodes.panel;
        // Listeners fire on the hit shape, so dragging the backdrop moves its panel.
        s.on_drag(nodes.backdrop, move |scene, e| {
            scene.set_property(panel, Property::X, e.point.x - 100.0);
        });
    }

    // -- animations --------------------------------------------------------
    let slide = engine
        .add_property_animation(surface, nodes.panel, "y", 20.0, 60.0, 0.5)
        .expect("group supports y");

    let route = Path::builder()
        .move_to(20.0, 180.0)
        .curve_to(80.0, 140.0, 160.0, 220.0, 300.0, 160.0)
        .build();
    let follower = nodes.follower;
    let follow = engine.add_callback_animation(move |frame| {
        let t = (frame.frame_index() % 60) as f64 / 60.0;
        let pt = route.point_at_t(t);
        if let Some(scene) = frame.scene_mut(surface) {
            scene.set_property(follower, Property::X, pt.x);
            scene.set_property(follower, Property::Y, pt.y);
        }
    });

    engine.start_animation(slide).expect("animation exists");
    engine.start_animation(follow).expect("animation exists");

    // -- simulated loop ----------------------------------------------------
    let mut frames = 0;
    while engine.host().pending && frames < MAX_FRAMES {
        let host = engine.host_mut();
        host.pending = false;
        host.now += REFRESH_INTERVAL_MS;
        let now = host.now();
        engine.on_frame(now);
        frames += 1;

        match frames {
            10 => {
                engine
                    .press(surface, Point::new(120.0, 60.0))
                    .expect("surface exists");
            }
            12 => {
                engine
                    .pointer_move(surface, Point::new(140.0, 70.0))
                    .expect("surface exists");
            }
            14 => {
                engine
                    .release(surface, Point::new(140.0, 70.0))
                    .expect("surface exists");
                engine
                    .press(surface, Point::new(260.0, 30.0))
                    .expect("surface exists");
                engine
                    .release(surface, Point::new(260.0, 30.0))
                    .expect("surface exists");
            }
            60 => engine.pause_animation(follow).expect("animation exists"),
            _ => {}
        }
    }

    let ops = engine
        .surface(surface)
        .expect("surface exists")
        .drawing()
        .items()
        .len();
    println!(
        "Ran {frames} frames ({} requested), recorded {ops} draw ops",
        engine.host().requests
    );

    // -- export Chrome trace -----------------------------------------------
    let file = File::create(&trace_path).expect("failed to create trace file");
    let mut writer = BufWriter::new(file);
    diorama_debug::chrome::export(recorder.borrow().events(), TIMEBASE, &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {trace_path}");
}
