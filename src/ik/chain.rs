use crate::skeleton::{JointId, Skeleton};
use glam::Vec2;

/// An ordered run of joint positions, root to tip, with the rest length of every
/// segment.
///
/// Rest lengths are measured when the chain is built and stay fixed while it is
/// solved.
#[derive(Debug, Clone)]
pub struct Chain {
    pub(crate) positions: Vec<Vec2>,
    pub(crate) bone_lengths: Vec<f32>,
}

impl Chain {
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    /// Samples `joints` from the skeleton's current pose.
    pub fn sample(skeleton: &Skeleton, joints: &[JointId]) -> Self {
        Self::from_positions(skeleton.sample(joints))
    }

    pub fn from_positions(positions: Vec<Vec2>) -> Self {
        let bone_lengths = bone_lengths(&positions);
        Self {
            positions,
            bone_lengths,
        }
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn into_positions(self) -> Vec<Vec2> {
        self.positions
    }

    pub fn bone_lengths(&self) -> &[f32] {
        &self.bone_lengths
    }

    pub fn total_length(&self) -> f32 {
        self.bone_lengths.iter().sum()
    }

    pub fn joint_count(&self) -> usize {
        self.positions.len()
    }

    pub fn end_effector(&self) -> Option<Vec2> {
        self.positions.last().copied()
    }

    pub fn base(&self) -> Option<Vec2> {
        self.positions.first().copied()
    }

    pub fn can_reach(&self, target: Vec2) -> bool {
        self.base()
            .is_some_and(|base| base.distance(target) <= self.total_length())
    }
}

pub struct ChainBuilder {
    positions: Vec<Vec2>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
        }
    }

    pub fn add_joint(mut self, position: Vec2) -> Self {
        self.positions.push(position);
        self
    }

    pub fn build(self) -> Chain {
        Chain::from_positions(self.positions)
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn bone_lengths(positions: &[Vec2]) -> Vec<f32> {
    positions.windows(2).map(|w| w[0].distance(w[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::Limb;
    use approx::assert_relative_eq;

    #[test]
    fn rest_lengths_come_from_sampled_pose() {
        let chain = Chain::builder()
            .add_joint(Vec2::ZERO)
            .add_joint(Vec2::new(3.0, 4.0))
            .add_joint(Vec2::new(3.0, 10.0))
            .build();
        assert_eq!(chain.bone_lengths().len(), 2);
        assert_relative_eq!(chain.bone_lengths()[0], 5.0);
        assert_relative_eq!(chain.bone_lengths()[1], 6.0);
        assert_relative_eq!(chain.total_length(), 11.0);
    }

    #[test]
    fn single_joint_chain_has_no_segments() {
        let chain = Chain::builder().add_joint(Vec2::ONE).build();
        assert!(chain.bone_lengths().is_empty());
        assert_eq!(chain.base(), chain.end_effector());
    }

    #[test]
    fn sample_reads_limb_joints_in_order() {
        let skeleton = Skeleton::initial();
        let chain = Chain::sample(&skeleton, Limb::RightArm.joints());
        assert_eq!(chain.joint_count(), 3);
        assert_eq!(chain.base(), Some(skeleton.get(JointId::RightShoulder)));
        assert_eq!(chain.end_effector(), Some(skeleton.get(JointId::RightWrist)));
        assert!(chain.can_reach(skeleton.get(JointId::RightElbow)));
        assert!(!chain.can_reach(Vec2::new(2000.0, 0.0)));
    }
}
