//! Decoding wire frames into [`CachedFrame`] buffers.

use vistra_core::{CachedFrame, CodecError, FLOAT_BYTES, FRAME_HEADER_FLOATS};

use crate::json::VisDataFrame;
use crate::walk::walk_records;

/// Decode a flat record sequence into a [`CachedFrame`].
///
/// Walks the records once to validate them and count agents, then
/// builds the packed buffer (`[frame_number, time, agent_count,
/// records...]`) in a single copy pass — no per-agent allocation.
///
/// # Errors
///
/// [`CodecError::MalformedFrame`] when the walk cannot consume the
/// sequence exactly (see [`crate::walk::next_agent_offset`]).
pub fn decode_records(
    frame_number: u32,
    time: f32,
    records: &[f32],
) -> Result<CachedFrame, CodecError> {
    let agent_count = walk_records(records)?;

    let mut data = Vec::with_capacity(FRAME_HEADER_FLOATS + records.len());
    data.push(frame_number as f32);
    data.push(time);
    data.push(agent_count as f32);
    data.extend_from_slice(records);

    Ok(CachedFrame::from_packed(frame_number, time, agent_count, data))
}

/// Decode one JSON-form frame.
pub fn decode_json_frame(frame: &VisDataFrame) -> Result<CachedFrame, CodecError> {
    decode_records(frame.frame_number, frame.time, &frame.data)
}

/// Decode a local binary frame: `[frameNumber, time, agentCount,
/// records...]` as little-endian float32 bytes.
///
/// This is the form produced by trajectory-file readers, which strip
/// the network envelope before handing frames over. The declared agent
/// count must match the walked count.
///
/// # Errors
///
/// [`CodecError::MalformedFrame`] on a byte length that is not a
/// multiple of 4, a truncated header, non-integer frame number or
/// agent count, a bad record walk, or a count mismatch.
pub fn parse_local_frame(bytes: &[u8]) -> Result<CachedFrame, CodecError> {
    let floats = floats_from_le_bytes(bytes)?;
    if floats.len() < FRAME_HEADER_FLOATS {
        return Err(CodecError::MalformedFrame {
            detail: format!(
                "truncated frame header: got {} of {FRAME_HEADER_FLOATS} floats",
                floats.len()
            ),
        });
    }

    let frame_number = wire_u32(floats[0], "frame number")?;
    let time = floats[1];
    let declared_count = wire_u32(floats[2], "agent count")?;

    let walked = walk_records(&floats[FRAME_HEADER_FLOATS..])?;
    if walked != declared_count {
        return Err(CodecError::MalformedFrame {
            detail: format!(
                "agent count mismatch: header declares {declared_count}, walked {walked}"
            ),
        });
    }

    // The byte layout already matches the packed buffer; reuse it.
    Ok(CachedFrame::from_packed(
        frame_number,
        time,
        declared_count,
        floats,
    ))
}

/// Reinterpret little-endian bytes as float32 values.
///
/// Copies through `from_le_bytes` rather than viewing in place:
/// network buffers carry no alignment guarantee.
pub(crate) fn floats_from_le_bytes(bytes: &[u8]) -> Result<Vec<f32>, CodecError> {
    if bytes.len() % FLOAT_BYTES != 0 {
        return Err(CodecError::MalformedFrame {
            detail: format!(
                "byte length {} is not a multiple of {FLOAT_BYTES}",
                bytes.len()
            ),
        });
    }
    Ok(bytes
        .chunks_exact(FLOAT_BYTES)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Read an integer-valued wire float into a `u32`.
pub(crate) fn wire_u32(value: f32, what: &str) -> Result<u32, CodecError> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f32 {
        return Err(CodecError::MalformedFrame {
            detail: format!("non-integer {what} {value}"),
        });
    }
    Ok(value as u32)
}
