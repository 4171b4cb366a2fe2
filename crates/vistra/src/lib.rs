//! Vistra: a streaming trajectory playback engine for agent-based
//! simulation viewers.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Vistra sub-crates. For most users, adding `vistra` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use vistra::prelude::*;
//!
//! // A session receives wire messages (here, a JSON frame bundle)
//! // and exposes a cursor-based read API for the render loop.
//! let mut session = TrajectorySession::new(PlaybackConfig::default()).unwrap();
//!
//! let bundle = serde_json::json!({
//!     "msgType": 1,
//!     "bundleStart": 0,
//!     "bundleSize": 2,
//!     "bundleData": [
//!         { "data": [1000.0, 0.0, 7.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
//!           "frameNumber": 0, "time": 0.0 },
//!         { "data": [1000.0, 0.0, 7.0, 2.0, 2.0, 2.0, 0.0, 0.0, 0.0, 1.0, 0.0],
//!           "frameNumber": 1, "time": 5.0 }
//!     ],
//!     "fileName": ""
//! });
//! session.handle_message(InboundMessage::Json(bundle)).unwrap();
//!
//! session.goto_time(5.0);
//! let frame = session.playback().current_frame_data();
//! assert_eq!(frame.frame_number, 1);
//! assert_eq!(frame.agent_count, 1);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `vistra-core` | Agent records, cached frames, message ids, errors |
//! | [`codec`] | `vistra-codec` | Wire decode/encode, envelope, frame walking |
//! | [`cache`] | `vistra-cache` | Byte-bounded, time-indexed frame cache |
//! | [`playback`] | `vistra-playback` | Controller, dispatch, inbox, sessions |
//! | [`trajectory`] | `vistra-trajectory` | Metadata types and version normalization |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, ids, and errors (`vistra-core`).
///
/// Contains [`types::AgentRecord`], [`types::CachedFrame`], the wire
/// message-id table, and the per-subsystem error enums.
pub use vistra_core as types;

/// Wire codec (`vistra-codec`).
///
/// Decode and encode the packed float32 agent-record format, parse
/// network envelopes, and walk decoded frames agent by agent with
/// [`codec::FrameView`].
pub use vistra_codec as codec;

/// Frame cache (`vistra-cache`).
///
/// The byte-bounded, time-indexed [`cache::FrameCache`] with
/// oldest-first eviction.
pub use vistra_cache as cache;

/// Playback engine (`vistra-playback`).
///
/// The [`playback::Playback`] controller, message
/// [`playback::Dispatcher`], cross-thread [`playback::Inbox`], and
/// [`playback::TrajectorySession`] orchestrator.
pub use vistra_playback as playback;

/// Trajectory metadata (`vistra-trajectory`).
///
/// Versioned metadata shapes, the normalization entry point
/// [`trajectory::update_trajectory_file_info_format`], and geometry
/// sanitation.
pub use vistra_trajectory as trajectory;

/// Common imports for typical Vistra usage.
///
/// ```rust
/// use vistra::prelude::*;
/// ```
pub mod prelude {
    // Core value types and errors
    pub use vistra_core::{
        AgentRecord, CacheError, CachedFrame, CodecError, MsgType, PlaybackError, TrajectoryError,
        VisType,
    };

    // Codec entry points
    pub use vistra_codec::{
        calculate_buffer_size, decode_json_frame, encode_agents, parse_net_frame, FrameView,
        VisDataFrame, VisDataMessage,
    };

    // Cache
    pub use vistra_cache::{FrameCache, DEFAULT_CACHE_LIMIT_BYTES};

    // Playback
    pub use vistra_playback::{
        inbox, InboundMessage, JsonTrajectoryFile, NetFrameData, Playback, PlaybackConfig,
        PlaybackState, RemoteSimulator, TrajectoryFile, TrajectorySession,
    };

    // Trajectory metadata
    pub use vistra_trajectory::{
        update_trajectory_file_info_format, GeometryDisplayType, TrajectoryInfo, TypeMapping,
    };
}
