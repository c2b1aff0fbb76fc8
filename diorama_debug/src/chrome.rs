// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads events recorded by a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Input events carry no timestamp of their own, so they are stamped with the
//! time of the most recent frame.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use diorama_core::time::Timebase;

use crate::recorder::RecordedEvent;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Each surface gets its own track (`tid`); frame-level events use track 0.
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(
    events: &[RecordedEvent],
    timebase: Timebase,
    writer: &mut dyn Write,
) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::with_capacity(events.len());
    let mut ts = 0.0;

    for recorded in events {
        match recorded {
            RecordedEvent::FrameBegin(e) => {
                ts = ticks_to_us(e.now.ticks(), timebase);
                out.push(json!({
                    "ph": "B",
                    "name": "Frame",
                    "cat": "Frame",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                        "mode": e.mode.name(),
                    }
                }));
            }
            RecordedEvent::FrameEnd(e) => {
                ts = ticks_to_us(e.now.ticks(), timebase);
                out.push(json!({
                    "ph": "E",
                    "name": "Frame",
                    "cat": "Frame",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                        "animations_playing": e.animations_playing,
                        "next_frame_requested": e.next_frame_requested,
                    }
                }));
            }
            RecordedEvent::SurfaceRepaint(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Repaint",
                    "cat": "Surface",
                    "ts": ts,
                    "pid": 0,
                    "tid": surface_track(e.surface.index()),
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "changed_nodes": e.changed_nodes,
                        "topology_changed": e.topology_changed,
                        "immediate": e.immediate,
                    }
                }));
            }
            RecordedEvent::HitTest(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "HitTest",
                    "cat": "Input",
                    "ts": ts,
                    "pid": 0,
                    "tid": surface_track(e.surface.index()),
                    "s": "t",
                    "args": {
                        "x": e.point.x,
                        "y": e.point.y,
                        "hit": e.hit.map(|n| n.to_string()),
                    }
                }));
            }
            RecordedEvent::Dispatch(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": format!("Dispatch:{}", e.kind.name()),
                    "cat": "Input",
                    "ts": ts,
                    "pid": 0,
                    "tid": surface_track(e.surface.index()),
                    "s": "t",
                    "args": {
                        "target": e.target.map(|n| n.to_string()),
                        "invoked": e.invoked,
                    }
                }));
            }
            RecordedEvent::SkippedTarget(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "SkippedTarget",
                    "cat": "Animation",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "animation": e.animation.index(),
                        "node": e.node.to_string(),
                    }
                }));
            }
            RecordedEvent::AnimationTick(e) => {
                out.push(json!({
                    "ph": "C",
                    "name": format!("Animation {}", e.animation.index()),
                    "cat": "Animation",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "value": e.value.unwrap_or(0.0),
                        "playing": u8::from(e.playing),
                    }
                }));
            }
            RecordedEvent::NodeChangesCount {
                frame_index,
                surface,
                count,
            } => {
                out.push(json!({
                    "ph": "i",
                    "name": "NodeChanges",
                    "cat": "Rich",
                    "ts": ts,
                    "pid": 0,
                    "tid": surface_track(surface.index()),
                    "s": "t",
                    "args": {
                        "frame_index": frame_index,
                        "count": count,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}

fn surface_track(index: u32) -> u64 {
    u64::from(index) + 1
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}
