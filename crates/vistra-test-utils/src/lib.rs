//! Test fixtures for Vistra development.
//!
//! Builders for agent records, decoded frames of controlled size, and
//! JSON frame bundles, consumed as a dev-dependency by the cache and
//! playback test suites.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use vistra_codec::{encode_agents, records_from_agents, VisDataFrame, VisDataMessage};
use vistra_core::{AgentRecord, CachedFrame, MsgType, VisType};

/// A point-like agent with a recognizable position derived from its id.
pub fn sphere_agent(instance_id: u32, type_id: u32) -> AgentRecord {
    AgentRecord {
        vis_type: VisType::Default,
        instance_id,
        type_id,
        position: [instance_id as f32, 0.0, 0.0],
        rotation: [0.0; 3],
        collision_radius: 1.0,
        subpoints: vec![],
    }
}

/// A fiber agent with `n_points` 3D control points.
pub fn fiber_agent(instance_id: u32, n_points: usize) -> AgentRecord {
    AgentRecord {
        vis_type: VisType::Fiber,
        instance_id,
        type_id: 0,
        position: [0.0; 3],
        rotation: [0.0; 3],
        collision_radius: 0.5,
        subpoints: (0..n_points * 3).map(|i| i as f32).collect(),
    }
}

/// A decoded frame carrying `n_agents` sphere agents.
pub fn test_frame(frame_number: u32, time: f32, n_agents: usize) -> CachedFrame {
    let agents: Vec<AgentRecord> = (0..n_agents)
        .map(|i| sphere_agent(i as u32, 7))
        .collect();
    encode_agents(&agents, frame_number, time)
}

/// A decoded frame whose byte size is at least `min_bytes`, for
/// exercising eviction budgets. The exact size is available from the
/// returned frame's `size` field.
pub fn sized_frame(frame_number: u32, time: f32, min_bytes: usize) -> CachedFrame {
    let base = encode_agents(&[sphere_agent(0, 0)], frame_number, time);
    if base.size >= min_bytes {
        return base;
    }
    let missing_floats = (min_bytes - base.size).div_ceil(4);
    let n_points = missing_floats.div_ceil(3);
    encode_agents(
        &[sphere_agent(0, 0), fiber_agent(1, n_points)],
        frame_number,
        time,
    )
}

/// The flat wire floats for a single sphere agent.
pub fn sphere_floats(instance_id: u32, type_id: u32) -> Vec<f32> {
    records_from_agents(&[sphere_agent(instance_id, type_id)])
}

/// A JSON frame bundle with one sphere agent per `(frame_number, time)`.
pub fn bundle(frames: &[(u32, f32)]) -> VisDataMessage {
    let bundle_data: Vec<VisDataFrame> = frames
        .iter()
        .map(|&(frame_number, time)| VisDataFrame {
            data: sphere_floats(0, 7),
            frame_number,
            time,
        })
        .collect();
    VisDataMessage {
        msg_type: MsgType::VisDataArrive.id(),
        bundle_start: frames.first().map(|f| f.0).unwrap_or(0),
        bundle_size: bundle_data.len() as u32,
        bundle_data,
        file_name: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sized_frame_meets_its_minimum() {
        for min in [0, 100, 1000, 65_536] {
            let f = sized_frame(0, 0.0, min);
            assert!(f.size >= min, "size {} below requested {min}", f.size);
        }
    }

    #[test]
    fn bundle_numbers_frames_in_order() {
        let msg = bundle(&[(0, 0.0), (1, 5.0)]);
        assert_eq!(msg.bundle_size, 2);
        assert_eq!(msg.bundle_data[1].frame_number, 1);
    }
}
