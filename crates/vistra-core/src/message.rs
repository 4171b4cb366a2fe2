//! Wire message-type ids shared with the remote simulation backend.
//!
//! The id values are a fixed contract with deployed servers; new ids
//! are appended, never renumbered.

/// Message-type ids for both JSON and binary network messages.
///
/// JSON messages carry the id in their `msgType` field; binary messages
/// carry it as the first float32 of the envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MsgType {
    /// Placeholder for an unset request id.
    UndefinedWebRequest,
    /// A frame (or frame bundle) of agent data.
    VisDataArrive,
    /// Client request for frame data.
    VisDataRequest,
    /// Server signals the end of the frame stream.
    VisDataFinish,
    /// Client request to pause streaming.
    VisDataPause,
    /// Client request to resume streaming.
    VisDataResume,
    /// Client request to abort streaming.
    VisDataAbort,
    /// Client update of the simulation time step.
    UpdateTimeStep,
    /// Client update of a simulation rate parameter.
    UpdateRateParam,
    /// Model definition payload.
    ModelDefinition,
    /// Keep-alive ping.
    HeartbeatPing,
    /// Keep-alive pong.
    HeartbeatPong,
    /// Trajectory metadata for the loaded file.
    TrajectoryFileInfo,
    /// Client seek to a simulation time.
    GotoSimulationTime,
    /// Client request to initialize a trajectory file.
    InitTrajectoryFile,
    /// Client update of live simulation state.
    UpdateSimulationState,
    /// Server-side trajectory conversion request.
    ConvertTrajectoryFile,
    /// Query for available metrics.
    AvailableMetricsRequest,
    /// Response listing available metrics.
    AvailableMetricsResponse,
    /// Query for plot data.
    PlotDataRequest,
    /// Response carrying plot data.
    PlotDataResponse,
}

impl MsgType {
    /// Decode a numeric message id. Returns `None` for unknown ids.
    pub fn from_id(id: u32) -> Option<Self> {
        Some(match id {
            0 => Self::UndefinedWebRequest,
            1 => Self::VisDataArrive,
            2 => Self::VisDataRequest,
            3 => Self::VisDataFinish,
            4 => Self::VisDataPause,
            5 => Self::VisDataResume,
            6 => Self::VisDataAbort,
            7 => Self::UpdateTimeStep,
            8 => Self::UpdateRateParam,
            9 => Self::ModelDefinition,
            10 => Self::HeartbeatPing,
            11 => Self::HeartbeatPong,
            12 => Self::TrajectoryFileInfo,
            13 => Self::GotoSimulationTime,
            14 => Self::InitTrajectoryFile,
            15 => Self::UpdateSimulationState,
            16 => Self::ConvertTrajectoryFile,
            17 => Self::AvailableMetricsRequest,
            18 => Self::AvailableMetricsResponse,
            19 => Self::PlotDataRequest,
            20 => Self::PlotDataResponse,
            _ => return None,
        })
    }

    /// The numeric wire id.
    pub fn id(self) -> u32 {
        match self {
            Self::UndefinedWebRequest => 0,
            Self::VisDataArrive => 1,
            Self::VisDataRequest => 2,
            Self::VisDataFinish => 3,
            Self::VisDataPause => 4,
            Self::VisDataResume => 5,
            Self::VisDataAbort => 6,
            Self::UpdateTimeStep => 7,
            Self::UpdateRateParam => 8,
            Self::ModelDefinition => 9,
            Self::HeartbeatPing => 10,
            Self::HeartbeatPong => 11,
            Self::TrajectoryFileInfo => 12,
            Self::GotoSimulationTime => 13,
            Self::InitTrajectoryFile => 14,
            Self::UpdateSimulationState => 15,
            Self::ConvertTrajectoryFile => 16,
            Self::AvailableMetricsRequest => 17,
            Self::AvailableMetricsResponse => 18,
            Self::PlotDataRequest => 19,
            Self::PlotDataResponse => 20,
        }
    }
}
