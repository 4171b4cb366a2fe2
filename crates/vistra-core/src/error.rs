//! Error types for the Vistra playback engine, organized by subsystem:
//! codec (decode), cache (admission), trajectory (metadata), and the
//! playback-level union delivered through the controller's error hook.
//!
//! Decode and cache errors are recoverable — the offending frame is
//! dropped and playback continues — so they are delivered via callback
//! rather than thrown across the asynchronous message boundary. Only
//! [`TrajectoryError`] is returned as a hard error, because it occurs
//! synchronously inside a caller-awaited load where propagation is
//! meaningful.

use std::error::Error;
use std::fmt;

/// Decode-time structural violations in a wire frame.
///
/// Non-fatal to the session: the offending frame is dropped, reported,
/// and playback continues from the last good frame.
#[derive(Clone, Debug, PartialEq)]
pub enum CodecError {
    /// The flat float sequence could not be walked to completion
    /// (truncated header, truncated subpoints, bad subpoint count, or
    /// leftover unconsumed data).
    MalformedFrame {
        /// Human-readable description of what went wrong.
        detail: String,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedFrame { detail } => write!(f, "malformed frame: {detail}"),
        }
    }
}

impl Error for CodecError {}

/// Admission failures in the frame cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheError {
    /// The incoming frame is older than the earliest retained frame and
    /// can no longer be ordered into the cache. A recoverable network
    /// anomaly, not a programming error.
    StaleFrame {
        /// Number of the rejected frame.
        frame_number: u32,
        /// Earliest frame number still retained.
        earliest: u32,
    },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleFrame {
                frame_number,
                earliest,
            } => write!(
                f,
                "stale frame {frame_number}: cache already starts at frame {earliest}"
            ),
        }
    }
}

impl Error for CacheError {}

/// Fatal trajectory-metadata failures.
///
/// Surfaced to the caller of the trajectory load rather than defaulted:
/// guessing at an unknown wire format risks silently misinterpreting
/// simulation data.
#[derive(Clone, Debug, PartialEq)]
pub enum TrajectoryError {
    /// The metadata declares a version this build does not understand.
    UnsupportedVersion {
        /// The version number found in the message.
        found: f64,
    },
    /// The metadata message could not be deserialized at all.
    InvalidMessage {
        /// Description of the deserialization failure.
        detail: String,
    },
}

impl fmt::Display for TrajectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported trajectory info version {found}")
            }
            Self::InvalidMessage { detail } => {
                write!(f, "invalid trajectory info message: {detail}")
            }
        }
    }
}

impl Error for TrajectoryError {}

/// Union of the recoverable errors reported through the playback
/// controller's error hook.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackError {
    /// A frame failed decoding.
    Codec(CodecError),
    /// A frame failed cache admission.
    Cache(CacheError),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "{e}"),
            Self::Cache(e) => write!(f, "{e}"),
        }
    }
}

impl Error for PlaybackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            Self::Cache(e) => Some(e),
        }
    }
}

impl From<CodecError> for PlaybackError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

impl From<CacheError> for PlaybackError {
    fn from(e: CacheError) -> Self {
        Self::Cache(e)
    }
}
