use serde::{Deserialize, Serialize};

/// Named joints of the 2D character.
///
/// The parent links encode the hierarchy (pelvis up to the head, chest out to each
/// wrist). Solvers never follow these links; they only decide which joints form a
/// chain and which joint the cloth hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointId {
    Pelvis,
    Spine1,
    Spine2,
    Chest,
    Neck,
    Head,
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    RightShoulder,
    RightElbow,
    RightWrist,
}

impl JointId {
    pub const COUNT: usize = 12;

    pub const ALL: [JointId; Self::COUNT] = [
        JointId::Pelvis,
        JointId::Spine1,
        JointId::Spine2,
        JointId::Chest,
        JointId::Neck,
        JointId::Head,
        JointId::LeftShoulder,
        JointId::LeftElbow,
        JointId::LeftWrist,
        JointId::RightShoulder,
        JointId::RightElbow,
        JointId::RightWrist,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn parent(self) -> Option<JointId> {
        use JointId::*;
        match self {
            Pelvis => None,
            Spine1 => Some(Pelvis),
            Spine2 => Some(Spine1),
            Chest => Some(Spine2),
            Neck => Some(Chest),
            Head => Some(Neck),
            LeftShoulder | RightShoulder => Some(Chest),
            LeftElbow => Some(LeftShoulder),
            LeftWrist => Some(LeftElbow),
            RightElbow => Some(RightShoulder),
            RightWrist => Some(RightElbow),
        }
    }

    pub fn name(self) -> &'static str {
        use JointId::*;
        match self {
            Pelvis => "pelvis",
            Spine1 => "spine1",
            Spine2 => "spine2",
            Chest => "chest",
            Neck => "neck",
            Head => "head",
            LeftShoulder => "left_shoulder",
            LeftElbow => "left_elbow",
            LeftWrist => "left_wrist",
            RightShoulder => "right_shoulder",
            RightElbow => "right_elbow",
            RightWrist => "right_wrist",
        }
    }

    pub fn from_name(name: &str) -> Option<JointId> {
        Self::ALL.into_iter().find(|j| j.name() == name)
    }

    /// Walks the parent links from `self` towards `ancestor`, returning the path
    /// root-to-tip if `ancestor` is reached.
    pub fn path_from(self, ancestor: JointId) -> Option<Vec<JointId>> {
        let mut path = vec![self];
        let mut current = self;
        while current != ancestor {
            current = current.parent()?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}
