use glam::Vec2;

/// Where a limb's tip should go this frame. An inactive target leaves the limb in its
/// last pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IkTarget {
    pub position: Vec2,
    pub active: bool,
}

impl IkTarget {
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
}
