use super::constraint::{DistanceConstraint, LinkKind};
use super::particle::Particle;
use glam::Vec2;

/// Grid layout of the cloth patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClothConfig {
    pub rows: usize,
    pub cols: usize,
    pub spacing: f32,
    /// Where the top-left particle is laid out relative to the anchor on reset.
    pub layout_offset: Vec2,
}

impl Default for ClothConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 6,
            spacing: 15.0,
            layout_offset: Vec2::new(-30.0, 0.0),
        }
    }
}

impl ClothConfig {
    pub fn particle_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn structural_count(&self) -> usize {
        let (r, c) = (self.rows, self.cols);
        r * c.saturating_sub(1) + r.saturating_sub(1) * c
    }

    pub fn shear_count(&self) -> usize {
        self.rows.saturating_sub(1) * self.cols.saturating_sub(1)
    }

    /// Offset of grid slot (`row`, `col`) from the anchor while pinned: the row is
    /// centred horizontally on the anchor.
    pub fn anchor_offset(&self, row: usize, col: usize) -> Vec2 {
        let half_width = self.cols.saturating_sub(1) as f32 * self.spacing * 0.5;
        Vec2::new(
            col as f32 * self.spacing - half_width,
            row as f32 * self.spacing,
        )
    }
}

/// Particles of an R x C cloth grid (row-major) and the links between them.
///
/// Row 0 is pinned to the anchor joint. Every cell gets structural links to its right
/// and lower neighbours and one shear link from its top-left to bottom-right corner.
#[derive(Debug, Clone, PartialEq)]
pub struct ClothMesh {
    config: ClothConfig,
    pub(crate) particles: Vec<Particle>,
    pub(crate) constraints: Vec<DistanceConstraint>,
}

impl ClothMesh {
    pub fn new(config: ClothConfig, anchor: Vec2) -> Self {
        let mut mesh = Self {
            config,
            particles: Vec::new(),
            constraints: Vec::new(),
        };
        mesh.reset(anchor);
        mesh
    }

    /// Rebuilds the grid around `anchor`, discarding all simulated motion.
    pub fn reset(&mut self, anchor: Vec2) {
        let ClothConfig {
            rows,
            cols,
            spacing,
            layout_offset,
        } = self.config;
        let origin = anchor + layout_offset;

        self.particles.clear();
        self.particles.reserve(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let pos = origin + Vec2::new(col as f32 * spacing, row as f32 * spacing);
                let offset = self.config.anchor_offset(row, col);
                self.particles.push(if row == 0 {
                    Particle::pinned(pos, offset)
                } else {
                    Particle::new(pos, offset)
                });
            }
        }

        let diagonal = spacing * std::f32::consts::SQRT_2;
        self.constraints.clear();

        for row in 0..rows {
            for col in 0..cols.saturating_sub(1) {
                let a = row * cols + col;
                self.constraints
                    .push(DistanceConstraint::new(a, a + 1, spacing, LinkKind::Structural));
            }
        }

        for row in 0..rows.saturating_sub(1) {
            for col in 0..cols {
                let a = row * cols + col;
                self.constraints
                    .push(DistanceConstraint::new(a, a + cols, spacing, LinkKind::Structural));
            }
        }

        for row in 0..rows.saturating_sub(1) {
            for col in 0..cols.saturating_sub(1) {
                let a = row * cols + col;
                self.constraints
                    .push(DistanceConstraint::new(a, a + cols + 1, diagonal, LinkKind::Shear));
            }
        }

        log::debug!(
            "cloth reset: {}x{} grid, {} particles, {} constraints",
            rows,
            cols,
            self.particles.len(),
            self.constraints.len()
        );
    }

    pub fn config(&self) -> &ClothConfig {
        &self.config
    }

    pub fn rows(&self) -> usize {
        self.config.rows
    }

    pub fn cols(&self) -> usize {
        self.config.cols
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.config.cols + col
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn constraints(&self) -> &[DistanceConstraint] {
        &self.constraints
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.particles.iter().map(|p| p.pos).collect()
    }

    pub fn position_at(&self, row: usize, col: usize) -> Vec2 {
        self.particles[self.index(row, col)].pos
    }

    /// Largest deviation of any link from its rest length.
    pub fn max_constraint_error(&self) -> f32 {
        self.constraints
            .iter()
            .map(|c| c.error(&self.particles))
            .fold(0.0, f32::max)
    }
}
