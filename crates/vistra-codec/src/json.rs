//! JSON wire shapes for frame messages.
//!
//! The backend's JSON path delivers frames in bundles; field names are
//! camelCase on the wire.

use serde::{Deserialize, Serialize};

/// One frame in JSON form: the flat record floats plus frame metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisDataFrame {
    /// Flat agent-record floats (see the crate-level format notes).
    pub data: Vec<f32>,
    /// Sequential frame number within the trajectory.
    pub frame_number: u32,
    /// Simulation time of this frame.
    pub time: f32,
}

/// A bundle of JSON frames as delivered by the streaming backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisDataMessage {
    /// Wire message-type id (`MsgType::VisDataArrive` for frame data).
    pub msg_type: u32,
    /// Frame number of the first frame in the bundle.
    pub bundle_start: u32,
    /// Number of frames in the bundle.
    pub bundle_size: u32,
    /// The bundled frames, in ascending frame-number order.
    pub bundle_data: Vec<VisDataFrame>,
    /// Name of the trajectory file this bundle belongs to.
    #[serde(default)]
    pub file_name: String,
}
