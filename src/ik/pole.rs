use crate::math::EPSILON;
use glam::Vec2;

/// Reference point that decides which way the middle joint of a three-joint chain
/// bends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoleVector {
    pub position: Vec2,
    pub active: bool,
}

impl PoleVector {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            active: true,
        }
    }

    pub fn inactive(position: Vec2) -> Self {
        Self {
            position,
            active: false,
        }
    }

    /// Re-aims `elbow` at the pole while keeping its distance to the midpoint of
    /// `shoulder` and `wrist`.
    ///
    /// Only the direction around the midpoint changes, so the two segment lengths are
    /// preserved exactly only when the chain is symmetric about the midpoint.
    pub fn apply(&self, shoulder: Vec2, elbow: Vec2, wrist: Vec2) -> Vec2 {
        apply_pole(shoulder, elbow, wrist, self.position)
    }

    /// Applies the pole to the middle joint of `positions` in place. Chains that are
    /// not exactly three joints long are left alone.
    pub fn apply_to_chain(&self, positions: &mut [Vec2]) -> bool {
        if let [shoulder, elbow, wrist] = positions {
            *elbow = self.apply(*shoulder, *elbow, *wrist);
            true
        } else {
            false
        }
    }
}

pub fn apply_pole(shoulder: Vec2, elbow: Vec2, wrist: Vec2, pole: Vec2) -> Vec2 {
    let mid = (shoulder + wrist) * 0.5;
    let to_elbow = elbow - mid;
    let to_pole = pole - mid;

    let elbow_dist = to_elbow.length();
    let pole_dist = to_pole.length();

    if elbow_dist < EPSILON || pole_dist < EPSILON {
        return elbow;
    }

    mid + to_pole / pole_dist * elbow_dist
}
