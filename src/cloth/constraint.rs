use super::particle::Particle;
use crate::math::guarded_length;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Horizontal or vertical grid neighbours.
    Structural,
    /// Diagonal neighbours.
    Shear,
}

/// Keeps two particles at `rest_length` apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceConstraint {
    pub a: usize,
    pub b: usize,
    pub rest_length: f32,
    pub kind: LinkKind,
}

impl DistanceConstraint {
    pub fn new(a: usize, b: usize, rest_length: f32, kind: LinkKind) -> Self {
        Self {
            a,
            b,
            rest_length,
            kind,
        }
    }

    /// Moves both free endpoints halfway towards satisfying the rest length, scaled by
    /// `stiffness`. Pinned endpoints never move.
    pub fn solve(&self, particles: &mut [Particle], stiffness: f32) {
        let delta = particles[self.b].pos - particles[self.a].pos;
        let dist = guarded_length(delta);
        let factor = (self.rest_length - dist) / dist;
        let correction = delta * (0.5 * stiffness * factor);

        if !particles[self.a].pinned {
            particles[self.a].pos -= correction;
        }
        if !particles[self.b].pinned {
            particles[self.b].pos += correction;
        }
    }

    pub fn error(&self, particles: &[Particle]) -> f32 {
        (particles[self.a].pos.distance(particles[self.b].pos) - self.rest_length).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn pair(a: Vec2, b: Vec2) -> Vec<Particle> {
        vec![Particle::new(a, Vec2::ZERO), Particle::new(b, Vec2::ZERO)]
    }

    #[test]
    fn stretched_link_pulls_both_ends_in() {
        let mut particles = pair(Vec2::ZERO, Vec2::new(20.0, 0.0));
        let c = DistanceConstraint::new(0, 1, 10.0, LinkKind::Structural);
        c.solve(&mut particles, 1.0);
        assert_relative_eq!(particles[0].pos.x, 5.0);
        assert_relative_eq!(particles[1].pos.x, 15.0);
        assert_relative_eq!(c.error(&particles), 0.0);
    }

    #[test]
    fn stiffness_scales_the_correction() {
        let mut particles = pair(Vec2::ZERO, Vec2::new(20.0, 0.0));
        DistanceConstraint::new(0, 1, 10.0, LinkKind::Shear).solve(&mut particles, 0.5);
        assert_relative_eq!(particles[0].pos.x, 2.5);
        assert_relative_eq!(particles[1].pos.x, 17.5);
    }

    #[test]
    fn pinned_end_stays_put() {
        let mut particles = pair(Vec2::ZERO, Vec2::new(0.0, 4.0));
        particles[0].pinned = true;
        DistanceConstraint::new(0, 1, 10.0, LinkKind::Structural).solve(&mut particles, 1.0);
        assert_eq!(particles[0].pos, Vec2::ZERO);
        assert_relative_eq!(particles[1].pos.y, 7.0);
    }

    #[test]
    fn coincident_particles_stay_finite() {
        let mut particles = pair(Vec2::ONE, Vec2::ONE);
        DistanceConstraint::new(0, 1, 10.0, LinkKind::Structural).solve(&mut particles, 1.0);
        assert!(particles.iter().all(|p| p.pos.is_finite()));
    }
}
