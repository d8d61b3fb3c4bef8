//! The "nearby route" heuristic.

/// Whether a ride whose origin is `from_km` from the query origin and whose
/// destination is `to_km` from the query destination is worth suggesting.
///
/// Either both ends are within `radius_km`, or the origin is within radius
/// and the destination is at least as far off as the origin.
pub fn is_nearby(from_km: f64, to_km: f64, radius_km: f64) -> bool {
    let near_both_ends = from_km <= radius_km && to_km <= radius_km;
    let directional = from_km <= radius_km && to_km >= from_km;
    near_both_ends || directional
}
