//! Wire and canonical shapes for trajectory metadata.
//!
//! Field names are camelCase on the wire; type-mapping keys are
//! integer type ids (serialized as JSON object keys).

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default camera distance along +z.
pub const DEFAULT_CAMERA_Z_POSITION: f64 = 120.0;

/// A 3D vector in trajectory metadata.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

/// Bounding-box extents of the simulation volume.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size3 {
    /// Extent along x.
    pub x: f64,
    /// Extent along y.
    pub y: f64,
    /// Extent along z.
    pub z: f64,
}

/// A unit magnitude and display name, e.g. `{1.5, "nm"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Units {
    /// Scale factor applied per simulation unit.
    pub magnitude: f64,
    /// Display name of the unit.
    pub name: String,
}

/// Initial camera placement for a trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSpec {
    /// Camera position.
    pub position: Vec3,
    /// Point the camera looks at.
    pub look_at_position: Vec3,
    /// Camera up vector.
    pub up_vector: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
}

impl Default for CameraSpec {
    fn default() -> Self {
        Self {
            position: Vec3 {
                x: 0.0,
                y: 0.0,
                z: DEFAULT_CAMERA_Z_POSITION,
            },
            look_at_position: Vec3::ZERO,
            up_vector: Vec3 {
                x: 0.0,
                y: 1.0,
                z: 0.0,
            },
            fov_degrees: 75.0,
        }
    }
}

/// How an agent type is displayed by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GeometryDisplayType {
    /// Atomic coordinates fetched from a PDB file.
    Pdb,
    /// A mesh fetched from an OBJ file.
    Obj,
    /// A simple sphere (the universal fallback).
    Sphere,
    /// A cube primitive.
    Cube,
    /// A gizmo/axis marker.
    Gizmo,
}

impl fmt::Display for GeometryDisplayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pdb => "PDB",
            Self::Obj => "OBJ",
            Self::Sphere => "SPHERE",
            Self::Cube => "CUBE",
            Self::Gizmo => "GIZMO",
        };
        write!(f, "{s}")
    }
}

impl FromStr for GeometryDisplayType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PDB" => Ok(Self::Pdb),
            "OBJ" => Ok(Self::Obj),
            "SPHERE" => Ok(Self::Sphere),
            "CUBE" => Ok(Self::Cube),
            "GIZMO" => Ok(Self::Gizmo),
            _ => Err(()),
        }
    }
}

/// Fully-populated display geometry for one agent type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentGeometry {
    /// Display modality.
    pub display_type: GeometryDisplayType,
    /// URL of the geometry asset; empty for primitive types.
    #[serde(default)]
    pub url: String,
    /// Display color; empty means renderer-assigned.
    #[serde(default)]
    pub color: String,
}

impl AgentGeometry {
    /// The render-safe fallback: an unadorned sphere.
    pub fn default_sphere() -> Self {
        Self {
            display_type: GeometryDisplayType::Sphere,
            url: String::new(),
            color: String::new(),
        }
    }
}

/// Display data for one agent type in the canonical mapping:
/// sanitation guarantees the geometry block is always present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentDisplayData {
    /// Human-readable type name.
    pub name: String,
    /// Display geometry (always populated after sanitation).
    pub geometry: AgentGeometry,
}

/// Display geometry as it may arrive on the wire: any field may be
/// missing, and an unrecognized display type is treated as missing
/// rather than failing the whole message.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGeometry {
    /// Display modality, if present and recognized.
    #[serde(default, deserialize_with = "lenient_display_type")]
    pub display_type: Option<GeometryDisplayType>,
    /// URL of the geometry asset.
    #[serde(default)]
    pub url: String,
    /// Display color.
    #[serde(default)]
    pub color: String,
}

/// Display data as it may arrive on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawDisplayData {
    /// Human-readable type name.
    pub name: String,
    /// Display geometry, if the backend supplied one.
    #[serde(default)]
    pub geometry: Option<RawGeometry>,
}

/// Canonical mapping from agent type id to display data.
pub type TypeMapping = IndexMap<u32, AgentDisplayData>;

/// Unsanitized mapping as deserialized from the wire.
pub type RawTypeMapping = IndexMap<u32, RawDisplayData>;

/// Trajectory metadata in the canonical (latest) shape.
///
/// Received once per trajectory load, normalized by
/// [`crate::update_trajectory_file_info_format`], held for the
/// duration of the trajectory session, and replaced wholesale on a new
/// trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryInfo {
    /// Always [`crate::LATEST_VERSION`] after normalization.
    pub version: u32,
    /// Simulation time covered by one frame.
    pub time_step_size: f64,
    /// Total number of frames in the trajectory.
    pub total_steps: u64,
    /// Bounding-box extents of the simulation volume.
    pub size: Size3,
    /// Spatial unit per simulation distance unit.
    pub spatial_units: Units,
    /// Time unit per simulation time unit.
    pub time_units: Units,
    /// Initial camera placement.
    pub camera_default: CameraSpec,
    /// Display data per agent type id.
    pub type_mapping: TypeMapping,
}

/// Trajectory metadata in any accepted wire shape.
///
/// Versions differ in which optional fields are present; dispatch
/// happens on `version` in
/// [`crate::update_trajectory_file_info_format`]. Unknown fields
/// (connection ids, message-type tags) are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryInfoAny {
    /// Declared wire version (numeric on the wire, possibly junk).
    pub version: f64,
    /// Simulation time covered by one frame.
    pub time_step_size: f64,
    /// Total number of frames in the trajectory.
    pub total_steps: u64,
    /// Bounding-box extents of the simulation volume.
    pub size: Size3,
    /// Unsanitized display data per agent type id.
    pub type_mapping: RawTypeMapping,
    /// v1 only: meters per simulation distance unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_unit_factor_meters: Option<f64>,
    /// v2+: spatial units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_units: Option<Units>,
    /// v2+: time units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_units: Option<Units>,
    /// v2+: initial camera placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_default: Option<CameraSpec>,
}

/// Deserialize a display type, mapping unrecognized strings to `None`
/// instead of failing the message — sanitation will default them.
fn lenient_display_type<'de, D>(deserializer: D) -> Result<Option<GeometryDisplayType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}
