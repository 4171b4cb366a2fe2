//! The immutable decoded frame and its packed float layout.

use std::sync::Arc;

/// Floats in the packed-frame header: frame number, time, agent count.
pub const FRAME_HEADER_FLOATS: usize = 3;

/// Fixed floats per agent record before the variable subpoint tail:
/// `[visType, instanceId, typeId, x, y, z, rx, ry, rz, collisionRadius,
/// nSubPoints]`.
pub const AGENT_FIXED_FLOATS: usize = 11;

/// Byte width of every wire value (float32 throughout).
pub const FLOAT_BYTES: usize = 4;

/// One simulation time-step, owning its packed float buffer.
///
/// Created by the codec when a frame is decoded, stored by the cache,
/// and read by consumers until evicted. The buffer layout is
/// `[frame_number, time, agent_count, records...]` where `records` is
/// the flat agent-record sequence; it is immutable once built and
/// shared by reference, so downstream readers never copy it.
///
/// # Examples
///
/// ```
/// use vistra_core::CachedFrame;
///
/// let empty = CachedFrame::empty();
/// assert_eq!(empty.frame_number, 0);
/// assert_eq!(empty.time, 0.0);
/// assert_eq!(empty.agent_count, 0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CachedFrame {
    /// Sequential frame number within the trajectory.
    pub frame_number: u32,
    /// Simulation time of this frame.
    pub time: f32,
    /// Number of agent records in the buffer.
    pub agent_count: u32,
    /// Total buffer size in bytes, header included.
    pub size: usize,
    data: Arc<[f32]>,
}

impl CachedFrame {
    /// Build a frame from its metadata and full packed buffer.
    ///
    /// `data` must already contain the 3-float header followed by the
    /// record floats; the codec is the only producer of such buffers.
    pub fn from_packed(frame_number: u32, time: f32, agent_count: u32, data: Vec<f32>) -> Self {
        let size = data.len() * FLOAT_BYTES;
        Self {
            frame_number,
            time,
            agent_count,
            size,
            data: data.into(),
        }
    }

    /// The designated empty frame: frame 0 at time 0 with no agents.
    ///
    /// Returned by playback accessors instead of `None` so that render
    /// loops can read `.time` and `.frame_number` unconditionally.
    pub fn empty() -> Self {
        Self::from_packed(0, 0.0, 0, vec![0.0; FRAME_HEADER_FLOATS])
    }

    /// The full packed buffer, header included.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// The flat agent-record floats, header excluded.
    pub fn records(&self) -> &[f32] {
        &self.data[FRAME_HEADER_FLOATS..]
    }

    /// Whether this frame carries no agents.
    pub fn is_empty(&self) -> bool {
        self.agent_count == 0
    }
}
