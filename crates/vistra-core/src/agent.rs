//! Per-agent record types.

use std::fmt;

/// Display mode of an agent, carried on the wire as a float32 tag.
///
/// `Default` agents are rendered as a single body at their position;
/// `Fiber` agents are curves through their subpoint control points, with
/// `collision_radius` giving the tube cross-section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisType {
    /// A point-like body (wire tag 1000).
    Default,
    /// A curve through 3D control points (wire tag 1001).
    Fiber,
}

impl VisType {
    /// Wire tag for [`VisType::Default`].
    pub const DEFAULT_WIRE: f32 = 1000.0;
    /// Wire tag for [`VisType::Fiber`].
    pub const FIBER_WIRE: f32 = 1001.0;

    /// Decode a wire tag. Returns `None` for unrecognized tags.
    pub fn from_wire(v: f32) -> Option<Self> {
        if v == Self::DEFAULT_WIRE {
            Some(Self::Default)
        } else if v == Self::FIBER_WIRE {
            Some(Self::Fiber)
        } else {
            None
        }
    }

    /// The float32 wire tag for this display mode.
    pub fn as_wire(self) -> f32 {
        match self {
            Self::Default => Self::DEFAULT_WIRE,
            Self::Fiber => Self::FIBER_WIRE,
        }
    }
}

impl fmt::Display for VisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Fiber => write!(f, "fiber"),
        }
    }
}

/// One simulated entity in one frame.
///
/// The owned, structured form of a wire agent record. Integer-valued
/// fields (`instance_id`, `type_id`) travel as float32 on the wire and
/// therefore round-trip exactly only below 2^24; that covers every
/// practically-occurring id range.
///
/// # Examples
///
/// ```
/// use vistra_core::{AgentRecord, VisType};
///
/// let agent = AgentRecord {
///     vis_type: VisType::Fiber,
///     instance_id: 3,
///     type_id: 7,
///     position: [0.0, 0.0, 0.0],
///     rotation: [0.0, 0.0, 0.0],
///     collision_radius: 1.0,
///     subpoints: vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
/// };
///
/// assert_eq!(agent.subpoints.len() % 3, 0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AgentRecord {
    /// Display mode discriminant.
    pub vis_type: VisType,
    /// Stable per-agent id, unique within a frame.
    pub instance_id: u32,
    /// Maps to a display/geometry entry in the trajectory type mapping.
    pub type_id: u32,
    /// Position in simulation units.
    pub position: [f32; 3],
    /// Euler rotation angles.
    pub rotation: [f32; 3],
    /// Body radius for `Default`; tube cross-section radius for `Fiber`.
    pub collision_radius: f32,
    /// Flattened 3D control points. Empty for `Default`; length is
    /// always a multiple of 3.
    pub subpoints: Vec<f32>,
}

impl AgentRecord {
    /// Number of 3D control points in `subpoints`.
    pub fn num_subpoint_coords(&self) -> usize {
        self.subpoints.len() / 3
    }
}
