use super::joint::JointId;
use serde::{Deserialize, Serialize};

/// A limb driven by its own IK target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limb {
    LeftArm,
    RightArm,
}

const LEFT_ARM: [JointId; 3] = [JointId::LeftShoulder, JointId::LeftElbow, JointId::LeftWrist];
const RIGHT_ARM: [JointId; 3] = [
    JointId::RightShoulder,
    JointId::RightElbow,
    JointId::RightWrist,
];

impl Limb {
    pub const COUNT: usize = 2;

    pub const ALL: [Limb; Self::COUNT] = [Limb::LeftArm, Limb::RightArm];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Ordered joints of the limb's chain, root to tip.
    pub fn joints(self) -> &'static [JointId] {
        match self {
            Limb::LeftArm => &LEFT_ARM,
            Limb::RightArm => &RIGHT_ARM,
        }
    }

    pub fn root(self) -> JointId {
        self.joints()[0]
    }

    pub fn tip(self) -> JointId {
        self.joints()[self.joints().len() - 1]
    }

    pub fn name(self) -> &'static str {
        match self {
            Limb::LeftArm => "left_arm",
            Limb::RightArm => "right_arm",
        }
    }

    pub fn from_name(name: &str) -> Option<Limb> {
        Self::ALL.into_iter().find(|l| l.name() == name)
    }
}
