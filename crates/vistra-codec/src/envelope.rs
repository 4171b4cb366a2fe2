//! The network framing envelope around binary frame messages.
//!
//! Streamed binary frames carry a header that local file frames do
//! not: protocol version, message type, and a length-prefixed UTF-8
//! file name identifying the trajectory the frame belongs to. All
//! header values ride in the same little-endian float32 stream as the
//! records, with the file-name bytes zero-padded to a float boundary:
//!
//! ```text
//! [version, msgType, fileNameLength,
//!  fileName bytes (padded to 4), frameNumber, time, records...]
//! ```
//!
//! The byte offsets are a fixed contract with deployed servers — field
//! order and float32 width must be preserved exactly.

use log::debug;

use vistra_core::{CachedFrame, CodecError, FLOAT_BYTES};

use crate::decode::{decode_records, floats_from_le_bytes, wire_u32};

/// Float index of the file-name byte length in the envelope header.
const NAME_LENGTH_INDEX: usize = 2;
/// Floats before the file-name bytes begin.
const HEADER_FLOATS: usize = 3;

/// Decoded envelope header of a streamed binary frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetEnvelope {
    /// Wire protocol version.
    pub version: u32,
    /// Message-type id (see [`vistra_core::MsgType`]).
    pub msg_type: u32,
    /// Trajectory file name the frame belongs to.
    pub file_name: String,
}

/// Parse a streamed binary frame: envelope header plus decoded frame.
///
/// # Errors
///
/// [`CodecError::MalformedFrame`] when the byte length is not a float
/// multiple, the header or file name is truncated, the file name is
/// not UTF-8, a header value is not integer-valued, or the record walk
/// fails.
pub fn parse_net_frame(bytes: &[u8]) -> Result<(NetEnvelope, CachedFrame), CodecError> {
    let floats = floats_from_le_bytes(bytes)?;
    if floats.len() < HEADER_FLOATS {
        return Err(CodecError::MalformedFrame {
            detail: format!(
                "truncated envelope header: got {} of {HEADER_FLOATS} floats",
                floats.len()
            ),
        });
    }

    let version = wire_u32(floats[0], "envelope version")?;
    let msg_type = wire_u32(floats[1], "envelope message type")?;
    let name_len = wire_u32(floats[NAME_LENGTH_INDEX], "file name length")? as usize;

    let name_start = HEADER_FLOATS * FLOAT_BYTES;
    let name_end = name_start + name_len;
    if name_end > bytes.len() {
        return Err(CodecError::MalformedFrame {
            detail: format!(
                "truncated file name: {name_len} bytes declared, {} available",
                bytes.len() - name_start
            ),
        });
    }
    let file_name = std::str::from_utf8(&bytes[name_start..name_end])
        .map_err(|e| CodecError::MalformedFrame {
            detail: format!("file name is not valid UTF-8: {e}"),
        })?
        .to_owned();

    // File-name bytes are padded out to a whole number of floats.
    let name_floats = name_len.div_ceil(FLOAT_BYTES);
    let body_start = HEADER_FLOATS + name_floats;
    if floats.len() < body_start + 2 {
        return Err(CodecError::MalformedFrame {
            detail: "truncated envelope: missing frame number and time".to_string(),
        });
    }

    let frame_number = wire_u32(floats[body_start], "frame number")?;
    let time = floats[body_start + 1];
    let frame = decode_records(frame_number, time, &floats[body_start + 2..])?;

    debug!(
        "net frame {frame_number} ({} agents) for '{file_name}'",
        frame.agent_count
    );

    Ok((
        NetEnvelope {
            version,
            msg_type,
            file_name,
        },
        frame,
    ))
}

/// Encode a streamed binary frame with its envelope header.
///
/// The inverse of [`parse_net_frame`]; file-name bytes are zero-padded
/// to a float boundary.
pub fn encode_net_frame(
    version: u32,
    msg_type: u32,
    file_name: &str,
    frame_number: u32,
    time: f32,
    records: &[f32],
) -> Vec<u8> {
    let name_bytes = file_name.as_bytes();
    let name_floats = name_bytes.len().div_ceil(FLOAT_BYTES);

    let total_floats = HEADER_FLOATS + name_floats + 2 + records.len();
    let mut bytes = Vec::with_capacity(total_floats * FLOAT_BYTES);

    for value in [version as f32, msg_type as f32, name_bytes.len() as f32] {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes.extend_from_slice(name_bytes);
    bytes.resize((HEADER_FLOATS + name_floats) * FLOAT_BYTES, 0);

    for value in [frame_number as f32, time] {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    for value in records {
        bytes.extend_from_slice(&value.to_le_bytes());
    }

    bytes
}
