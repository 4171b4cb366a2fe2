//! Frame source interfaces and the JSON trajectory file.
//!
//! Two kinds of collaborator feed the playback engine: a remote
//! simulator streaming frames over a transport, and a trajectory file
//! serving frames by number. The transport mechanics (sockets,
//! reconnects) live outside this crate; these traits are the full
//! contract the engine relies on.

use serde::Deserialize;

use vistra_codec::{VisDataFrame, VisDataMessage};
use vistra_core::TrajectoryError;
use vistra_trajectory::TrajectoryInfoAny;

/// Requests the playback engine issues to a streaming backend.
///
/// Implemented by websocket clients and other live transports. Frames
/// and trajectory metadata flow back asynchronously through the
/// session's [`Inbox`](crate::Inbox).
pub trait RemoteSimulator {
    /// Ask the backend to send one specific frame.
    fn request_frame(&mut self, frame_number: u32);
    /// Ask the backend to reposition the stream at a simulation time.
    fn request_frame_by_time(&mut self, time: f32);
    /// Pause streaming.
    fn pause(&mut self);
    /// Resume streaming.
    fn resume(&mut self);
    /// Abort streaming for the current trajectory.
    fn abort(&mut self);
}

/// One frame as served by a trajectory file.
#[derive(Debug)]
pub enum LocalFrame<'a> {
    /// A JSON-form frame.
    Json(&'a VisDataFrame),
    /// A local binary frame (`[frameNumber, time, agentCount,
    /// records...]` bytes).
    Binary(&'a [u8]),
}

/// Random access to a fully-loaded trajectory.
pub trait TrajectoryFile {
    /// The file's trajectory metadata, in whatever version it was
    /// written with.
    fn trajectory_info(&self) -> &TrajectoryInfoAny;
    /// Number of frames in the file.
    fn total_frames(&self) -> usize;
    /// The frame with this number, if the file contains it.
    fn frame(&self, frame_number: u32) -> Option<LocalFrame<'_>>;
}

/// The JSON trajectory-file layout: metadata plus bundled frames.
/// Unknown sections (plot data and the like) are ignored.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonDocument {
    trajectory_info: TrajectoryInfoAny,
    spatial_data: VisDataMessage,
}

/// An in-memory trajectory parsed from the JSON file format.
#[derive(Debug)]
pub struct JsonTrajectoryFile {
    info: TrajectoryInfoAny,
    spatial: VisDataMessage,
}

impl JsonTrajectoryFile {
    /// Parse a JSON trajectory document.
    ///
    /// # Errors
    ///
    /// [`TrajectoryError::InvalidMessage`] when the document does not
    /// deserialize.
    pub fn from_json_str(json: &str) -> Result<Self, TrajectoryError> {
        let document: JsonDocument =
            serde_json::from_str(json).map_err(|e| TrajectoryError::InvalidMessage {
                detail: format!("trajectory file did not parse: {e}"),
            })?;
        Ok(Self {
            info: document.trajectory_info,
            spatial: document.spatial_data,
        })
    }
}

impl TrajectoryFile for JsonTrajectoryFile {
    fn trajectory_info(&self) -> &TrajectoryInfoAny {
        &self.info
    }

    fn total_frames(&self) -> usize {
        self.spatial.bundle_data.len()
    }

    fn frame(&self, frame_number: u32) -> Option<LocalFrame<'_>> {
        let index = frame_number.checked_sub(self.spatial.bundle_start)? as usize;
        self.spatial.bundle_data.get(index).map(LocalFrame::Json)
    }
}
