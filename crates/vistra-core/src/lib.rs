//! Core types and errors for the Vistra trajectory playback engine.
//!
//! Defines the value types shared by every other Vistra crate: the
//! per-agent record and its display-mode discriminant, the immutable
//! decoded frame held by the cache, the wire message-type id table,
//! and the per-subsystem error enums.
//!
//! Nothing in this crate performs I/O or owns mutable state; it is the
//! vocabulary the codec, cache, and playback crates speak.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod error;
pub mod frame;
pub mod message;
pub mod time;

pub use agent::{AgentRecord, VisType};
pub use error::{CacheError, CodecError, PlaybackError, TrajectoryError};
pub use frame::{CachedFrame, AGENT_FIXED_FLOATS, FLOAT_BYTES, FRAME_HEADER_FLOATS};
pub use message::MsgType;
pub use time::compare_times;
