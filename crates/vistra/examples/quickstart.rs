//! Minimal end-to-end usage: feed a session two frames the way a
//! transport would, then read them back like a render loop.
//!
//! Run with `cargo run --example quickstart -p vistra`.

use vistra::codec::FrameView;
use vistra::prelude::*;

fn main() {
    let mut session =
        TrajectorySession::new(PlaybackConfig::default()).expect("default config is valid");

    // Trajectory metadata arrives first (a legacy v1 message here —
    // the session normalizes it).
    let info = serde_json::json!({
        "msgType": 12,
        "version": 1,
        "size": { "x": 100.0, "y": 100.0, "z": 100.0 },
        "spatialUnitFactorMeters": 1.5e-9,
        "timeStepSize": 5.0,
        "totalSteps": 2,
        "typeMapping": { "7": { "name": "Actin" } }
    });
    session
        .handle_message(InboundMessage::Json(info))
        .expect("metadata should load");

    // Then frames, as a JSON bundle.
    let frames = serde_json::json!({
        "msgType": 1,
        "bundleStart": 0,
        "bundleSize": 2,
        "bundleData": [
            { "data": [1000.0, 0.0, 7.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
              "frameNumber": 0, "time": 0.0 },
            { "data": [1000.0, 0.0, 7.0, 2.0, 2.0, 2.0, 0.0, 0.0, 0.0, 1.0, 0.0],
              "frameNumber": 1, "time": 5.0 }
        ],
        "fileName": "quickstart"
    });
    session
        .handle_message(InboundMessage::Json(frames))
        .expect("frame bundles never fail outward");

    let units = session
        .trajectory_info()
        .map(|info| info.spatial_units.name.clone())
        .unwrap_or_default();

    session.playback_mut().goto_frame(0);
    loop {
        let frame = session.playback().current_frame_data();
        println!("frame {} at t={}", frame.frame_number, frame.time);
        for agent in FrameView::new(&frame).iter() {
            let [x, y, z] = agent.position();
            println!("  agent {} at ({x}, {y}, {z}) {units}", agent.instance_id());
        }
        if session.playback().at_latest_frame() {
            break;
        }
        session.playback_mut().goto_next_frame();
    }
}
