//! Trajectory metadata types and version normalization.
//!
//! Trajectory metadata arrives once per trajectory load in one of
//! several historical wire shapes. This crate normalizes any accepted
//! shape to the canonical latest form ([`TrajectoryInfo`]), deriving
//! the fields older versions lack: spatial units from a legacy
//! meters-per-unit scale factor, a default camera, and per-agent
//! display geometry defaults.
//!
//! Normalization is strict about versions — an unrecognized version is
//! a hard error, because guessing at an unknown wire format risks
//! silently misinterpreting simulation data — but lenient about
//! geometry: missing or inconsistent display metadata is defaulted to
//! spheres and reported through an advisory callback, never fatal.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod sanitize;
pub mod si;
pub mod types;
pub mod version;

pub use sanitize::{
    make_missing_display_type_error_message, make_missing_url_error_message, sanitize_type_mapping,
};
pub use si::meters_to_prefixed;
pub use types::{
    AgentDisplayData, AgentGeometry, CameraSpec, GeometryDisplayType, RawDisplayData, RawGeometry,
    RawTypeMapping, Size3, TrajectoryInfo, TrajectoryInfoAny, TypeMapping, Units, Vec3,
};
pub use version::{update_trajectory_file_info_format, LATEST_VERSION};
