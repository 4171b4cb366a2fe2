//! SI-prefix normalization for spatial units.
//!
//! Legacy (v1) trajectory metadata describes spatial scale as bare
//! meters per simulation unit; display code wants a human-readable
//! unit instead, e.g. `1.5e-9 m` shown as `1.5 nm`. The magnitude is
//! normalized into `[1, 1000)` wherever a prefix exists for it.

/// Scale/prefix pairs in ascending order, yocto through yotta.
const SI_PREFIXES: [(f64, &str); 17] = [
    (1e-24, "y"),
    (1e-21, "z"),
    (1e-18, "a"),
    (1e-15, "f"),
    (1e-12, "p"),
    (1e-9, "n"),
    (1e-6, "µ"),
    (1e-3, "m"),
    (1e0, ""),
    (1e3, "k"),
    (1e6, "M"),
    (1e9, "G"),
    (1e12, "T"),
    (1e15, "P"),
    (1e18, "E"),
    (1e21, "Z"),
    (1e24, "Y"),
];

/// Convert a length in meters to the best-fitting prefixed unit.
///
/// Picks the largest prefix scale not exceeding the value, so the
/// returned magnitude lands in `[1, 1000)` for values the table
/// covers. Zero and non-finite values pass through unscaled as plain
/// meters; values below the smallest prefix use that smallest prefix.
///
/// # Examples
///
/// ```
/// use vistra_trajectory::meters_to_prefixed;
///
/// let (magnitude, name) = meters_to_prefixed(1.5e-9);
/// assert!((magnitude - 1.5).abs() < 1e-12);
/// assert_eq!(name, "nm");
/// ```
pub fn meters_to_prefixed(value_meters: f64) -> (f64, String) {
    if value_meters == 0.0 || !value_meters.is_finite() {
        return (value_meters, "m".to_string());
    }

    let abs = value_meters.abs();
    let mut best = SI_PREFIXES[0];
    for &(scale, prefix) in &SI_PREFIXES {
        if abs >= scale {
            best = (scale, prefix);
        } else {
            break;
        }
    }

    (value_meters / best.0, format!("{}m", best.1))
}
