//! Normalization of historical trajectory-info wire versions.

use log::debug;

use vistra_core::TrajectoryError;

use crate::sanitize::sanitize_type_mapping;
use crate::si::meters_to_prefixed;
use crate::types::{CameraSpec, TrajectoryInfo, TrajectoryInfoAny, Units};

/// The canonical version every accepted message is normalized to.
pub const LATEST_VERSION: u32 = 3;

/// Normalize any accepted trajectory-info shape to the latest version.
///
/// Dispatches on the declared `version`:
///
/// - **v1** lacks units and camera: spatial units are derived from the
///   legacy `spatialUnitFactorMeters` scale by SI-prefix conversion,
///   time units default to seconds, and the camera defaults to the
///   standard placement.
/// - **v2** carries units and camera but may lack per-agent display
///   geometry.
/// - **v3** is already canonical.
///
/// All versions pass their type mapping through
/// [`sanitize_type_mapping`] (a no-op for well-formed v3 data), so the
/// returned mapping is always render-safe. Geometry advisories are
/// delivered through `on_error`.
///
/// # Errors
///
/// [`TrajectoryError::UnsupportedVersion`] for any other version —
/// fatal to this trajectory load, since no safe default interpretation
/// of an unknown wire format exists.
/// [`TrajectoryError::InvalidMessage`] when a version-mandatory field
/// is missing (e.g. v1 without `spatialUnitFactorMeters`).
pub fn update_trajectory_file_info_format(
    msg: TrajectoryInfoAny,
    on_error: Option<&mut dyn FnMut(String)>,
) -> Result<TrajectoryInfo, TrajectoryError> {
    let version = if msg.version.fract() == 0.0 && msg.version.is_finite() {
        msg.version as i64
    } else {
        -1
    };

    debug!("normalizing trajectory info from version {}", msg.version);

    let (spatial_units, time_units, camera_default) = match version {
        1 => {
            let factor = msg.spatial_unit_factor_meters.ok_or_else(|| {
                TrajectoryError::InvalidMessage {
                    detail: "version 1 requires spatialUnitFactorMeters".to_string(),
                }
            })?;
            let (magnitude, name) = meters_to_prefixed(factor);
            (
                Units { magnitude, name },
                Units {
                    magnitude: 1.0,
                    name: "s".to_string(),
                },
                CameraSpec::default(),
            )
        }
        2 | 3 => {
            let missing = |field: &str| TrajectoryError::InvalidMessage {
                detail: format!("version {version} requires {field}"),
            };
            (
                msg.spatial_units.ok_or_else(|| missing("spatialUnits"))?,
                msg.time_units.ok_or_else(|| missing("timeUnits"))?,
                msg.camera_default.ok_or_else(|| missing("cameraDefault"))?,
            )
        }
        _ => {
            return Err(TrajectoryError::UnsupportedVersion {
                found: msg.version,
            })
        }
    };

    Ok(TrajectoryInfo {
        version: LATEST_VERSION,
        time_step_size: msg.time_step_size,
        total_steps: msg.total_steps,
        size: msg.size,
        spatial_units,
        time_units,
        camera_default,
        type_mapping: sanitize_type_mapping(&msg.type_mapping, on_error),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GeometryDisplayType, Size3};

    fn v1_json() -> &'static str {
        r#"{
            "connId": "7496831076a233f0-2c337fed",
            "msgType": 13,
            "size": { "x": 100, "y": 100, "z": 100 },
            "spatialUnitFactorMeters": 1.5e-9,
            "timeStepSize": 0.1,
            "totalSteps": 150,
            "typeMapping": {
                "0": { "name": "Actin" },
                "1": { "name": "Budding vesicle" }
            },
            "version": 1
        }"#
    }

    fn v2_json() -> &'static str {
        r#"{
            "size": { "x": 100, "y": 100, "z": 100 },
            "cameraDefault": {
                "position": { "x": 0, "y": 0, "z": 120 },
                "lookAtPosition": { "x": 0, "y": 0, "z": 0 },
                "upVector": { "x": 0, "y": 1, "z": 0 },
                "fovDegrees": 75
            },
            "spatialUnits": { "magnitude": 1.5, "name": "nm" },
            "timeUnits": { "magnitude": 1, "name": "s" },
            "timeStepSize": 0.1,
            "totalSteps": 150,
            "typeMapping": {
                "0": { "name": "Actin" },
                "1": { "name": "Budding vesicle" }
            },
            "version": 2
        }"#
    }

    fn parse(json: &str) -> TrajectoryInfoAny {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn unknown_version_is_a_hard_error() {
        let mut msg = parse(v1_json());
        msg.version = 999.9;
        let err = update_trajectory_file_info_format(msg, None).unwrap_err();
        assert_eq!(err, TrajectoryError::UnsupportedVersion { found: 999.9 });
    }

    #[test]
    fn v1_derives_units_and_camera() {
        let info = update_trajectory_file_info_format(parse(v1_json()), None).unwrap();
        assert_eq!(info.version, LATEST_VERSION);
        assert!((info.spatial_units.magnitude - 1.5).abs() < 1e-12);
        assert_eq!(info.spatial_units.name, "nm");
        assert_eq!(info.time_units.magnitude, 1.0);
        assert_eq!(info.time_units.name, "s");
        assert_eq!(info.camera_default, CameraSpec::default());
        assert_eq!(info.size, Size3 { x: 100.0, y: 100.0, z: 100.0 });
        assert_eq!(info.time_step_size, 0.1);
        assert_eq!(info.total_steps, 150);
    }

    #[test]
    fn v1_type_mapping_gets_default_geometry() {
        let info = update_trajectory_file_info_format(parse(v1_json()), None).unwrap();
        for key in [0u32, 1] {
            let geometry = &info.type_mapping[&key].geometry;
            assert_eq!(geometry.display_type, GeometryDisplayType::Sphere);
            assert_eq!(geometry.url, "");
            assert_eq!(geometry.color, "");
        }
        assert_eq!(info.type_mapping[&0].name, "Actin");
        assert_eq!(info.type_mapping[&1].name, "Budding vesicle");
    }

    #[test]
    fn v2_keeps_units_and_sanitizes_mapping() {
        let info = update_trajectory_file_info_format(parse(v2_json()), None).unwrap();
        assert_eq!(info.version, LATEST_VERSION);
        assert_eq!(info.spatial_units.magnitude, 1.5);
        assert_eq!(info.spatial_units.name, "nm");
        assert_eq!(
            info.type_mapping[&0].geometry.display_type,
            GeometryDisplayType::Sphere
        );
    }

    #[test]
    fn v1_and_v2_normalize_to_the_same_canonical_form() {
        let from_v1 = update_trajectory_file_info_format(parse(v1_json()), None).unwrap();
        let from_v2 = update_trajectory_file_info_format(parse(v2_json()), None).unwrap();

        // The derived v1 magnitude comes out of a division, so compare
        // it with a tolerance and everything else exactly.
        assert!(
            (from_v1.spatial_units.magnitude - from_v2.spatial_units.magnitude).abs() < 1e-12
        );
        assert_eq!(from_v1.spatial_units.name, from_v2.spatial_units.name);
        assert_eq!(from_v1.time_units, from_v2.time_units);
        assert_eq!(from_v1.camera_default, from_v2.camera_default);
        assert_eq!(from_v1.type_mapping, from_v2.type_mapping);
        assert_eq!(from_v1.size, from_v2.size);
        assert_eq!(from_v1.version, from_v2.version);
    }

    #[test]
    fn v3_passes_through_as_is() {
        let json = v2_json().replace("\"version\": 2", "\"version\": 3");
        let json = json.replace(
            r#"{ "name": "Actin" }"#,
            r##"{ "name": "Actin", "geometry": {
                "displayType": "PDB", "url": "u", "color": "#fff" } }"##,
        );
        let info = update_trajectory_file_info_format(parse(&json), None).unwrap();
        assert_eq!(info.version, LATEST_VERSION);
        assert_eq!(
            info.type_mapping[&0].geometry.display_type,
            GeometryDisplayType::Pdb
        );
        assert_eq!(info.type_mapping[&0].geometry.url, "u");
    }

    #[test]
    fn v1_without_scale_factor_is_invalid() {
        let mut msg = parse(v1_json());
        msg.spatial_unit_factor_meters = None;
        let err = update_trajectory_file_info_format(msg, None).unwrap_err();
        assert!(matches!(err, TrajectoryError::InvalidMessage { .. }));
    }

    #[test]
    fn v2_without_camera_is_invalid() {
        let mut msg = parse(v2_json());
        msg.camera_default = None;
        let err = update_trajectory_file_info_format(msg, None).unwrap_err();
        assert!(matches!(err, TrajectoryError::InvalidMessage { .. }));
    }

    #[test]
    fn advisories_flow_through_the_callback() {
        let json = v2_json().replace(
            r#"{ "name": "Actin" }"#,
            r#"{ "name": "Actin", "geometry": { "displayType": "OBJ", "url": "" } }"#,
        );
        let mut advisories = Vec::new();
        let mut capture = |m: String| advisories.push(m);
        let _ = update_trajectory_file_info_format(parse(&json), Some(&mut capture)).unwrap();
        assert_eq!(advisories.len(), 1);
        assert!(advisories[0].contains("DisplayType was OBJ"));
    }
}
