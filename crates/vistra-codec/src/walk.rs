//! Agent-by-agent traversal of packed record floats.
//!
//! The record sequence is self-delimiting: each agent declares its
//! subpoint count in its 11th field, so the only way to find agent
//! `i + 1` is to walk past agent `i`. [`next_agent_offset`] is the
//! single authority for that step; the decoder uses it to validate
//! incoming frames, and renderers use it (through [`FrameView`]) to
//! walk cached frames in place.

use vistra_core::{AgentRecord, CachedFrame, CodecError, VisType, AGENT_FIXED_FLOATS};

/// Index of the subpoint count within an agent's fixed fields.
pub(crate) const N_SUBPOINTS_INDEX: usize = 10;

/// Advance from the start of one agent record to the start of the next.
///
/// Given the flat record floats and the offset of an agent's first
/// field, validates that the fixed header and the declared subpoint
/// tail are fully present and returns the offset just past them. When
/// the returned offset equals `records.len()`, the walk is complete.
///
/// # Errors
///
/// [`CodecError::MalformedFrame`] when fewer than 11 floats remain for
/// the fixed fields, when the declared subpoint count is not a
/// non-negative integer multiple of 3, or when fewer floats remain
/// than the count declares.
pub fn next_agent_offset(records: &[f32], offset: usize) -> Result<usize, CodecError> {
    let remaining = records.len().saturating_sub(offset);
    if remaining < AGENT_FIXED_FLOATS {
        return Err(CodecError::MalformedFrame {
            detail: format!(
                "truncated agent header: {remaining} of {AGENT_FIXED_FLOATS} floats \
                 remain at offset {offset}"
            ),
        });
    }

    let declared = records[offset + N_SUBPOINTS_INDEX];
    if !declared.is_finite() || declared.fract() != 0.0 || declared < 0.0 {
        return Err(CodecError::MalformedFrame {
            detail: format!("non-integer subpoint count {declared} at offset {offset}"),
        });
    }
    let n_subpoints = declared as usize;
    if n_subpoints % 3 != 0 {
        return Err(CodecError::MalformedFrame {
            detail: format!(
                "subpoint count {n_subpoints} at offset {offset} is not a multiple of 3"
            ),
        });
    }

    let tail = remaining - AGENT_FIXED_FLOATS;
    if tail < n_subpoints {
        return Err(CodecError::MalformedFrame {
            detail: format!(
                "truncated subpoints: agent at offset {offset} declares {n_subpoints} \
                 floats but only {tail} remain"
            ),
        });
    }

    Ok(offset + AGENT_FIXED_FLOATS + n_subpoints)
}

/// Walk an entire record sequence, returning the number of agents.
///
/// Consumes the sequence exactly; a partial trailing record is a
/// malformed frame, never silently ignored.
pub(crate) fn walk_records(records: &[f32]) -> Result<u32, CodecError> {
    let mut offset = 0;
    let mut count: u32 = 0;
    while offset < records.len() {
        offset = next_agent_offset(records, offset)?;
        count += 1;
    }
    Ok(count)
}

/// A zero-copy view of one agent's fields within a packed frame.
///
/// Field accessors read straight from the frame buffer. The view is
/// only constructed over record slices that already passed decode
/// validation, so the fixed fields and declared subpoints are always
/// in bounds.
#[derive(Clone, Copy, Debug)]
pub struct AgentView<'a> {
    fields: &'a [f32],
}

impl<'a> AgentView<'a> {
    /// Display-mode tag, if recognized.
    pub fn vis_type(&self) -> Option<VisType> {
        VisType::from_wire(self.fields[0])
    }

    /// The raw float32 display-mode tag.
    pub fn raw_vis_type(&self) -> f32 {
        self.fields[0]
    }

    /// Stable per-agent id.
    pub fn instance_id(&self) -> u32 {
        self.fields[1] as u32
    }

    /// Display-type id into the trajectory type mapping.
    pub fn type_id(&self) -> u32 {
        self.fields[2] as u32
    }

    /// Position in simulation units.
    pub fn position(&self) -> [f32; 3] {
        [self.fields[3], self.fields[4], self.fields[5]]
    }

    /// Euler rotation angles.
    pub fn rotation(&self) -> [f32; 3] {
        [self.fields[6], self.fields[7], self.fields[8]]
    }

    /// Body or tube cross-section radius.
    pub fn collision_radius(&self) -> f32 {
        self.fields[9]
    }

    /// Declared number of subpoint floats.
    pub fn n_subpoints(&self) -> usize {
        self.fields[N_SUBPOINTS_INDEX] as usize
    }

    /// The flattened subpoint floats.
    pub fn subpoints(&self) -> &'a [f32] {
        &self.fields[AGENT_FIXED_FLOATS..]
    }

    /// Copy this view into an owned [`AgentRecord`].
    ///
    /// # Errors
    ///
    /// [`CodecError::MalformedFrame`] when the display-mode tag is not
    /// a recognized [`VisType`]. Length validation already happened at
    /// decode time.
    pub fn to_record(&self) -> Result<AgentRecord, CodecError> {
        let vis_type = self.vis_type().ok_or_else(|| CodecError::MalformedFrame {
            detail: format!("unknown visType tag {}", self.raw_vis_type()),
        })?;
        Ok(AgentRecord {
            vis_type,
            instance_id: self.instance_id(),
            type_id: self.type_id(),
            position: self.position(),
            rotation: self.rotation(),
            collision_radius: self.collision_radius(),
            subpoints: self.subpoints().to_vec(),
        })
    }
}

/// Agent-by-agent view over a decoded frame.
///
/// ```
/// use vistra_codec::{encode_agents, FrameView};
/// use vistra_core::{AgentRecord, VisType};
///
/// let agent = AgentRecord {
///     vis_type: VisType::Default,
///     instance_id: 0,
///     type_id: 7,
///     position: [1.0, 2.0, 3.0],
///     rotation: [0.0; 3],
///     collision_radius: 1.0,
///     subpoints: vec![],
/// };
/// let frame = encode_agents(&[agent], 0, 0.0);
/// let positions: Vec<[f32; 3]> =
///     FrameView::new(&frame).iter().map(|a| a.position()).collect();
/// assert_eq!(positions, vec![[1.0, 2.0, 3.0]]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    records: &'a [f32],
}

impl<'a> FrameView<'a> {
    /// View the agents of a decoded frame.
    pub fn new(frame: &'a CachedFrame) -> Self {
        Self {
            records: frame.records(),
        }
    }

    /// Iterate over the agents in record order.
    pub fn iter(&self) -> AgentIter<'a> {
        AgentIter {
            records: self.records,
            offset: 0,
        }
    }
}

impl<'a> IntoIterator for FrameView<'a> {
    type Item = AgentView<'a>;
    type IntoIter = AgentIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the agents of a validated frame.
pub struct AgentIter<'a> {
    records: &'a [f32],
    offset: usize,
}

impl<'a> Iterator for AgentIter<'a> {
    type Item = AgentView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.records.len() {
            return None;
        }
        // Decode already validated the walk; a failure here means the
        // buffer was constructed outside the codec.
        let end = next_agent_offset(self.records, self.offset).ok()?;
        let view = AgentView {
            fields: &self.records[self.offset..end],
        };
        self.offset = end;
        Some(view)
    }
}
