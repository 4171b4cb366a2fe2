//! Per-agent display geometry sanitation.
//!
//! Backends frequently omit or half-fill the geometry block of a type
//! mapping entry. Sanitation never fails: every entry comes out with a
//! fully-populated, render-safe geometry (defaulting to spheres), and
//! inconsistencies are reported through an optional advisory callback
//! so the backend author can fix their export without blocking
//! playback. The message texts are relied on by existing frontends;
//! change them only with care.

use log::warn;

use crate::types::{
    AgentDisplayData, AgentGeometry, GeometryDisplayType, RawTypeMapping, TypeMapping,
};

/// Advisory for an entry whose geometry block lacks a display type.
///
/// The two texts distinguish "no url given" from "url given but type
/// missing" — the latter is more actionable, since an asset was
/// clearly intended.
pub fn make_missing_display_type_error_message(key: u32, url: &str) -> String {
    if url.is_empty() {
        format!(
            "No typeMapping[{key}].geometry.displayType. \
             Geometry will default to spheres"
        )
    } else {
        format!(
            "Missing typeMapping[{key}].geometry.displayType, so we couldn't \
             request {url}. Geometry will default to spheres"
        )
    }
}

/// Advisory for a PDB/OBJ entry with no url to fetch the asset from.
pub fn make_missing_url_error_message(key: u32, display_type: GeometryDisplayType) -> String {
    format!(
        "DisplayType was {display_type} but missing typeMapping[{key}].geometry.url, \
         so we couldn't request the file. Geometry will default to spheres"
    )
}

/// Fill every type-mapping entry with render-safe geometry.
///
/// - A missing geometry block becomes the default sphere, quietly.
/// - A geometry block without a recognized display type becomes the
///   default sphere, with an advisory.
/// - `PDB`/`OBJ` with an empty url becomes the default sphere, with an
///   advisory naming the display type that could not be resolved.
///
/// Advisories are delivered through `on_error` when provided; they are
/// purely informational and never block playback.
pub fn sanitize_type_mapping(
    raw: &RawTypeMapping,
    mut on_error: Option<&mut dyn FnMut(String)>,
) -> TypeMapping {
    let mut report = |message: String| {
        warn!("{message}");
        if let Some(cb) = on_error.as_mut() {
            cb(message);
        }
    };

    raw.iter()
        .map(|(&key, entry)| {
            let geometry = match &entry.geometry {
                None => AgentGeometry::default_sphere(),
                Some(g) => match g.display_type {
                    None => {
                        report(make_missing_display_type_error_message(key, &g.url));
                        AgentGeometry::default_sphere()
                    }
                    Some(
                        dt @ (GeometryDisplayType::Pdb | GeometryDisplayType::Obj),
                    ) if g.url.is_empty() => {
                        report(make_missing_url_error_message(key, dt));
                        AgentGeometry::default_sphere()
                    }
                    Some(dt) => AgentGeometry {
                        display_type: dt,
                        url: g.url.clone(),
                        color: g.color.clone(),
                    },
                },
            };
            (
                key,
                AgentDisplayData {
                    name: entry.name.clone(),
                    geometry,
                },
            )
        })
        .collect()
}
