//! Skeleton model
//!
//! A fixed set of named joints with their current 2D positions, plus the table that
//! maps each limb to the ordered joints of its IK chain.

mod joint;
mod limb;

pub use joint::JointId;
pub use limb::Limb;

use glam::Vec2;

/// Joint the cloth patch hangs from.
pub const CLOTH_ANCHOR: JointId = JointId::Chest;

/// Current position of every joint, indexed by [`JointId`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skeleton {
    positions: [Vec2; JointId::COUNT],
}

impl Skeleton {
    /// Standing pose in screen coordinates (+y down), chest at (400, 270).
    pub fn initial() -> Self {
        let mut skeleton = Self {
            positions: [Vec2::ZERO; JointId::COUNT],
        };
        for (joint, position) in INITIAL_LAYOUT {
            skeleton.set(joint, position);
        }
        skeleton
    }

    pub fn get(&self, joint: JointId) -> Vec2 {
        self.positions[joint.index()]
    }

    pub fn set(&mut self, joint: JointId, position: Vec2) {
        self.positions[joint.index()] = position;
    }

    /// Positions of the given joints, in order.
    pub fn sample(&self, joints: &[JointId]) -> Vec<Vec2> {
        joints.iter().map(|&j| self.get(j)).collect()
    }

    /// Writes `positions` back onto `joints`, pairwise.
    pub fn write_back(&mut self, joints: &[JointId], positions: &[Vec2]) {
        for (&joint, &position) in joints.iter().zip(positions) {
            self.set(joint, position);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointId, Vec2)> + '_ {
        JointId::ALL.into_iter().map(move |j| (j, self.get(j)))
    }

    pub fn anchor(&self) -> Vec2 {
        self.get(CLOTH_ANCHOR)
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::initial()
    }
}

const INITIAL_LAYOUT: [(JointId, Vec2); JointId::COUNT] = [
    (JointId::Pelvis, Vec2::new(400.0, 360.0)),
    (JointId::Spine1, Vec2::new(400.0, 330.0)),
    (JointId::Spine2, Vec2::new(400.0, 300.0)),
    (JointId::Chest, Vec2::new(400.0, 270.0)),
    (JointId::Neck, Vec2::new(400.0, 240.0)),
    (JointId::Head, Vec2::new(400.0, 210.0)),
    (JointId::LeftShoulder, Vec2::new(370.0, 270.0)),
    (JointId::LeftElbow, Vec2::new(340.0, 310.0)),
    (JointId::LeftWrist, Vec2::new(325.0, 355.0)),
    (JointId::RightShoulder, Vec2::new(430.0, 270.0)),
    (JointId::RightElbow, Vec2::new(460.0, 310.0)),
    (JointId::RightWrist, Vec2::new(475.0, 355.0)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_layout_covers_every_joint_once() {
        let mut seen = [false; JointId::COUNT];
        for (joint, _) in INITIAL_LAYOUT {
            assert!(!seen[joint.index()], "{joint:?} listed twice");
            seen[joint.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn cloth_anchor_starts_at_chest() {
        assert_eq!(Skeleton::initial().anchor(), Vec2::new(400.0, 270.0));
    }

    #[test]
    fn limb_chains_follow_hierarchy() {
        for limb in Limb::ALL {
            let path = limb.tip().path_from(limb.root()).expect("tip descends from root");
            assert_eq!(path, limb.joints());
        }
    }

    #[test]
    fn arms_hang_off_the_chest() {
        assert_eq!(JointId::LeftShoulder.parent(), Some(JointId::Chest));
        assert_eq!(JointId::RightShoulder.parent(), Some(JointId::Chest));
        assert_eq!(
            JointId::Head.path_from(JointId::Pelvis).map(|p| p.len()),
            Some(6)
        );
        assert_eq!(JointId::Head.path_from(JointId::LeftShoulder), None);
    }

    #[test]
    fn names_round_trip() {
        for joint in JointId::ALL {
            assert_eq!(JointId::from_name(joint.name()), Some(joint));
        }
        for limb in Limb::ALL {
            assert_eq!(Limb::from_name(limb.name()), Some(limb));
        }
        assert_eq!(Limb::from_name("tail"), None);
    }

    #[test]
    fn write_back_updates_only_named_joints() {
        let mut skeleton = Skeleton::initial();
        let before = skeleton;
        let joints = Limb::LeftArm.joints();
        let moved: Vec<Vec2> = skeleton
            .sample(joints)
            .into_iter()
            .map(|p| p + Vec2::new(1.0, 2.0))
            .collect();
        skeleton.write_back(joints, &moved);
        for (joint, position) in skeleton.iter() {
            if joints.contains(&joint) {
                assert_eq!(position, before.get(joint) + Vec2::new(1.0, 2.0));
            } else {
                assert_eq!(position, before.get(joint));
            }
        }
    }
}
