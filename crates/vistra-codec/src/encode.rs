//! Encoding structured agents into the packed wire layout.

use vistra_core::{
    AgentRecord, CachedFrame, CodecError, AGENT_FIXED_FLOATS, FLOAT_BYTES, FRAME_HEADER_FLOATS,
};

use crate::walk::walk_records;

/// Byte size of the packed buffer a record sequence will occupy,
/// computed without building agent objects.
///
/// Performs the same header/subpoints walk as decoding, then sizes the
/// result as `(header + records) * 4`. This runs per network frame,
/// potentially tens of times per second, so it allocates nothing.
///
/// # Errors
///
/// [`CodecError::MalformedFrame`] when the walk fails; a buffer size
/// for an unparseable frame would be meaningless.
pub fn calculate_buffer_size(records: &[f32]) -> Result<usize, CodecError> {
    let _ = walk_records(records)?;
    Ok((FRAME_HEADER_FLOATS + records.len()) * FLOAT_BYTES)
}

/// Flatten agent records into the wire float sequence.
pub fn records_from_agents(agents: &[AgentRecord]) -> Vec<f32> {
    let total: usize = agents
        .iter()
        .map(|a| AGENT_FIXED_FLOATS + a.subpoints.len())
        .sum();
    let mut floats = Vec::with_capacity(total);
    for agent in agents {
        floats.push(agent.vis_type.as_wire());
        floats.push(agent.instance_id as f32);
        floats.push(agent.type_id as f32);
        floats.extend_from_slice(&agent.position);
        floats.extend_from_slice(&agent.rotation);
        floats.push(agent.collision_radius);
        floats.push(agent.subpoints.len() as f32);
        floats.extend_from_slice(&agent.subpoints);
    }
    floats
}

/// Encode agents into a packed [`CachedFrame`].
///
/// The inverse of decoding: `decode` over the result yields the same
/// agents back, field for field.
pub fn encode_agents(agents: &[AgentRecord], frame_number: u32, time: f32) -> CachedFrame {
    let records = records_from_agents(agents);
    let mut data = Vec::with_capacity(FRAME_HEADER_FLOATS + records.len());
    data.push(frame_number as f32);
    data.push(time);
    data.push(agents.len() as f32);
    data.extend_from_slice(&records);
    CachedFrame::from_packed(frame_number, time, agents.len() as u32, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::FrameView;
    use vistra_core::VisType;

    fn sphere(instance_id: u32) -> AgentRecord {
        AgentRecord {
            vis_type: VisType::Default,
            instance_id,
            type_id: 7,
            position: [1.0, 2.0, 3.0],
            rotation: [0.0, 45.0, 0.0],
            collision_radius: 1.0,
            subpoints: vec![],
        }
    }

    fn fiber(instance_id: u32) -> AgentRecord {
        AgentRecord {
            vis_type: VisType::Fiber,
            instance_id,
            type_id: 9,
            position: [0.0; 3],
            rotation: [0.0; 3],
            collision_radius: 0.5,
            subpoints: vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0],
        }
    }

    #[test]
    fn buffer_size_without_subpoints() {
        let records = records_from_agents(&[sphere(0)]);
        assert_eq!(
            calculate_buffer_size(&records).unwrap(),
            (FRAME_HEADER_FLOATS + 11) * FLOAT_BYTES
        );
    }

    #[test]
    fn buffer_size_with_subpoints() {
        let records = records_from_agents(&[fiber(0)]);
        assert_eq!(
            calculate_buffer_size(&records).unwrap(),
            (FRAME_HEADER_FLOATS + 11 + 9) * FLOAT_BYTES
        );
    }

    #[test]
    fn buffer_size_rejects_malformed_records() {
        let mut records = records_from_agents(&[sphere(0)]);
        records.pop();
        assert!(calculate_buffer_size(&records).is_err());
    }

    #[test]
    fn encode_then_walk_recovers_agents() {
        let agents = vec![sphere(0), fiber(1), sphere(2)];
        let frame = encode_agents(&agents, 5, 25.0);
        assert_eq!(frame.frame_number, 5);
        assert_eq!(frame.agent_count, 3);

        let recovered: Vec<AgentRecord> = FrameView::new(&frame)
            .iter()
            .map(|v| v.to_record().unwrap())
            .collect();
        assert_eq!(recovered, agents);
    }

    #[test]
    fn encoded_size_matches_calculated_size() {
        let agents = vec![sphere(0), fiber(1)];
        let frame = encode_agents(&agents, 0, 0.0);
        let records = records_from_agents(&agents);
        assert_eq!(frame.size, calculate_buffer_size(&records).unwrap());
    }
}
