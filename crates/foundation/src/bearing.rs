/// Normalize a compass bearing to [0, 360).
///
/// Accepts any real value, including negatives and multiples of full turns.
pub fn normalize_deg(bearing_deg: f64) -> f64 {
    ((bearing_deg % 360.0) + 360.0) % 360.0
}
