//! Frame codec for the Vistra trajectory playback engine.
//!
//! Simulation frames travel as a flat sequence of float32 values rather
//! than structured objects: frames arrive many times per second, and
//! even naive packing halves the payload relative to JSON records. Each
//! agent contributes 11 fixed fields followed by a variable subpoint
//! tail:
//!
//! ```text
//! [visType, instanceId, typeId, x, y, z, rx, ry, rz,
//!  collisionRadius, nSubPoints, subpoint_0 .. subpoint_{n-1}]
//! ```
//!
//! `nSubPoints` is declared explicitly and must be a non-negative
//! multiple of 3 (whole 3D control points). The decoder walks the
//! sequence agent by agent and must consume the declared length
//! exactly; any shortfall or leftover is a malformed frame.
//!
//! Three interoperating outer forms carry the records:
//!
//! - **JSON** ([`VisDataMessage`]): `{ data, frameNumber, time }`
//!   bundles, from the websocket backend's JSON path.
//! - **Network binary** ([`envelope`]): little-endian float32 sequence
//!   `[version, msgType, fileNameLength, fileName bytes (padded),
//!   frameNumber, time, records...]`. Field order and f32 width are a
//!   fixed contract with deployed servers.
//! - **Local binary** ([`decode::parse_local_frame`]):
//!   `[frameNumber, time, agentCount, records...]`, as produced by
//!   trajectory-file readers.
//!
//! All forms decode into the shared
//! [`CachedFrame`](vistra_core::CachedFrame) packed buffer, which
//! downstream consumers walk in place via [`FrameView`] without
//! re-parsing.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod decode;
pub mod encode;
pub mod envelope;
pub mod json;
pub mod walk;

pub use decode::{decode_json_frame, decode_records, parse_local_frame};
pub use encode::{calculate_buffer_size, encode_agents, records_from_agents};
pub use envelope::{encode_net_frame, parse_net_frame, NetEnvelope};
pub use json::{VisDataFrame, VisDataMessage};
pub use walk::{next_agent_offset, AgentView, FrameView};
