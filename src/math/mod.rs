//! Math utilities module
//!
//! Re-exports the glam types used across the rig and the guarded vector helpers shared
//! by the chain solvers, the pole constraint and the cloth relaxation.

pub use glam::Vec2;

/// Distances below this are treated as zero.
pub const EPSILON: f32 = 1e-6;

/// Length of `v`, with a numerically zero length replaced by `1.0`.
///
/// Dividing by the result never produces NaN; for a degenerate vector the
/// "direction" collapses to (almost) zero, which callers accept as a defined but
/// degraded result.
#[inline]
pub fn guarded_length(v: Vec2) -> f32 {
    let len = v.length();
    if len < EPSILON {
        1.0
    } else {
        len
    }
}

/// Point at `length` from `anchor` along the direction `anchor -> toward`.
#[inline]
pub fn place_at_distance(anchor: Vec2, toward: Vec2, length: f32) -> Vec2 {
    let dir = toward - anchor;
    anchor + dir / guarded_length(dir) * length
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn guarded_length_of_zero_is_one() {
        assert_relative_eq!(guarded_length(Vec2::ZERO), 1.0);
        assert_relative_eq!(guarded_length(Vec2::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn place_at_distance_keeps_direction() {
        let p = place_at_distance(Vec2::ZERO, Vec2::new(0.0, 10.0), 4.0);
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 4.0);
    }

    #[test]
    fn place_at_distance_degenerate_stays_on_anchor() {
        let anchor = Vec2::new(5.0, 5.0);
        let p = place_at_distance(anchor, anchor, 12.0);
        assert_eq!(p, anchor);
    }
}
