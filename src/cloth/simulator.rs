use super::mesh::ClothMesh;
use glam::Vec2;

/// Gravitational acceleration at a gravity setting of 1.0.
pub const GRAVITY: f32 = 9.8;

/// Nominal step; the simulation is frame-coupled, not wall-clock driven.
pub const FIXED_DT: f32 = 1.0 / 60.0;

pub const RELAXATION_PASSES: u32 = 3;

/// Per-frame physics inputs, taken from the rig settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClothParams {
    pub gravity: f32,
    pub damping: f32,
    pub stiffness: f32,
    pub dt: f32,
}

impl Default for ClothParams {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            damping: 0.98,
            stiffness: 0.8,
            dt: FIXED_DT,
        }
    }
}

impl ClothParams {
    /// Downward acceleration in screen coordinates (+y is down).
    pub fn acceleration(&self) -> Vec2 {
        Vec2::new(0.0, self.gravity * GRAVITY)
    }
}

pub struct ClothSimulator;

impl ClothSimulator {
    /// Advances the mesh one step: Verlet integration of the free particles, pinned
    /// particles snapped onto `anchor`, then constraint relaxation.
    pub fn step(mesh: &mut ClothMesh, params: &ClothParams, anchor: Vec2) {
        Self::integrate(mesh, params, anchor);
        Self::relax(mesh, params.stiffness, RELAXATION_PASSES);
    }

    pub fn integrate(mesh: &mut ClothMesh, params: &ClothParams, anchor: Vec2) {
        let acceleration = params.acceleration();
        for p in mesh.particles.iter_mut() {
            if p.pinned {
                p.follow_anchor(anchor);
            } else {
                p.integrate(acceleration, params.dt, params.damping);
            }
        }
    }

    /// Gauss-Seidel relaxation over every link, in creation order.
    pub fn relax(mesh: &mut ClothMesh, stiffness: f32, passes: u32) {
        for _ in 0..passes {
            for c in mesh.constraints.iter() {
                c.solve(&mut mesh.particles, stiffness);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloth::ClothConfig;

    const ANCHOR: Vec2 = Vec2::new(400.0, 270.0);

    fn mesh() -> ClothMesh {
        ClothMesh::new(ClothConfig::default(), ANCHOR)
    }

    #[test]
    fn relaxing_a_rest_grid_moves_nothing() {
        let mut cloth = mesh();
        let before = cloth.positions();
        ClothSimulator::relax(&mut cloth, 1.0, 1);
        assert_eq!(cloth.positions(), before);
    }

    #[test]
    fn weightless_still_cloth_stays_put() {
        let mut cloth = mesh();
        let before = cloth.positions();
        let params = ClothParams {
            gravity: 0.0,
            ..ClothParams::default()
        };
        ClothSimulator::integrate(&mut cloth, &params, ANCHOR);
        for (i, (now, then)) in cloth.positions().iter().zip(&before).enumerate() {
            if !cloth.particles()[i].pinned {
                assert_eq!(now, then);
            }
        }
    }

    #[test]
    fn pinned_row_tracks_anchor_exactly() {
        let mut cloth = mesh();
        let params = ClothParams {
            gravity: 2.0,
            damping: 1.0,
            stiffness: 1.0,
            dt: FIXED_DT,
        };
        for frame in 0..120 {
            let anchor = ANCHOR + Vec2::new((frame as f32 * 0.1).sin() * 40.0, frame as f32);
            ClothSimulator::step(&mut cloth, &params, anchor);
            for col in 0..cloth.cols() {
                let p = cloth.particles()[cloth.index(0, col)];
                assert_eq!(p.pos, anchor + cloth.config().anchor_offset(0, col));
                assert_eq!(p.prev_pos, p.pos);
            }
        }
    }

    #[test]
    fn first_particle_lands_left_of_anchor() {
        let mut cloth = mesh();
        for params in [
            ClothParams::default(),
            ClothParams {
                gravity: 0.0,
                damping: 0.5,
                stiffness: 0.0,
                dt: FIXED_DT,
            },
        ] {
            ClothSimulator::step(&mut cloth, &params, ANCHOR);
            assert_eq!(cloth.particles()[0].pos, Vec2::new(362.5, 270.0));
        }
    }

    #[test]
    fn gravity_pulls_free_particles_down() {
        let mean_free_y = |gravity: f32| {
            let mut cloth = mesh();
            let params = ClothParams {
                gravity,
                ..ClothParams::default()
            };
            for _ in 0..60 {
                ClothSimulator::step(&mut cloth, &params, ANCHOR);
            }
            assert!(cloth.positions().iter().all(|p| p.is_finite()));
            let free: Vec<f32> = cloth
                .particles()
                .iter()
                .filter(|p| !p.pinned)
                .map(|p| p.pos.y)
                .collect();
            free.iter().sum::<f32>() / free.len() as f32
        };
        assert!(mean_free_y(1.0) > mean_free_y(0.0));
        assert!(mean_free_y(2.0) > mean_free_y(1.0));
    }

    #[test]
    fn relaxation_shrinks_stretch() {
        let mut cloth = mesh();
        let idx = cloth.index(4, 3);
        cloth.particles[idx].pos += Vec2::new(10.0, 10.0);
        let before = cloth.max_constraint_error();
        ClothSimulator::relax(&mut cloth, 1.0, RELAXATION_PASSES);
        assert!(cloth.max_constraint_error() < before);
    }
}
