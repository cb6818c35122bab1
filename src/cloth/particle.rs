use glam::Vec2;

/// A Verlet particle: velocity is implied by `pos - prev_pos`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    /// Uniform 1.0; integration and relaxation treat every particle alike.
    pub mass: f32,
    pub pinned: bool,
    /// Fixed offset from the anchor joint; only used while pinned.
    pub anchor_offset: Vec2,
}

impl Particle {
    pub fn new(pos: Vec2, anchor_offset: Vec2) -> Self {
        Self {
            pos,
            prev_pos: pos,
            mass: 1.0,
            pinned: false,
            anchor_offset,
        }
    }

    pub fn pinned(pos: Vec2, anchor_offset: Vec2) -> Self {
        Self {
            pinned: true,
            ..Self::new(pos, anchor_offset)
        }
    }

    /// Advances a free particle by one step. Pinned particles are left alone.
    pub fn integrate(&mut self, acceleration: Vec2, dt: f32, damping: f32) {
        if self.pinned {
            return;
        }
        let velocity = (self.pos - self.prev_pos) * damping;
        self.prev_pos = self.pos;
        self.pos += velocity + acceleration * (dt * dt);
    }

    /// Snaps a pinned particle onto its anchor slot and drops any velocity.
    pub fn follow_anchor(&mut self, anchor: Vec2) {
        if self.pinned {
            self.pos = anchor + self.anchor_offset;
            self.prev_pos = self.pos;
        }
    }

    pub fn velocity_raw(&self) -> Vec2 {
        self.pos - self.prev_pos
    }
}
