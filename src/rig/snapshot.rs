use super::orchestrator::FrameInputs;
use super::settings::RigSettings;
use crate::error::Result;
use crate::ik::{IkTarget, PoleVector, SolverKind};
use crate::skeleton::{JointId, Limb, Skeleton};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub const SNAPSHOT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// A target or pole as exported: position plus active flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlRecord {
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

impl From<IkTarget> for ControlRecord {
    fn from(t: IkTarget) -> Self {
        Self {
            x: t.position.x,
            y: t.position.y,
            active: t.active,
        }
    }
}

impl From<PoleVector> for ControlRecord {
    fn from(p: PoleVector) -> Self {
        Self {
            x: p.position.x,
            y: p.position.y,
            active: p.active,
        }
    }
}

impl ControlRecord {
    fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Exportable view of the rig: joint table, IK targets, pole vectors and settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RigSnapshot {
    pub version: String,
    pub solver: SolverKind,
    pub timestamp_ms: u64,
    pub joints: BTreeMap<JointId, Point>,
    pub ik_targets: BTreeMap<Limb, ControlRecord>,
    pub pole_vectors: BTreeMap<Limb, ControlRecord>,
    pub settings: RigSettings,
}

impl RigSnapshot {
    pub fn capture(skeleton: &Skeleton, inputs: &FrameInputs, settings: &RigSettings) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self::capture_at(skeleton, inputs, settings, timestamp_ms)
    }

    pub fn capture_at(
        skeleton: &Skeleton,
        inputs: &FrameInputs,
        settings: &RigSettings,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            solver: settings.solver,
            timestamp_ms,
            joints: skeleton.iter().map(|(j, p)| (j, Point::from(p))).collect(),
            ik_targets: Limb::ALL
                .into_iter()
                .map(|l| (l, ControlRecord::from(inputs.target(l))))
                .collect(),
            pole_vectors: Limb::ALL
                .into_iter()
                .map(|l| (l, ControlRecord::from(inputs.pole(l))))
                .collect(),
            settings: *settings,
        }
    }

    /// Writes the snapshot's joints, targets and poles over `skeleton` and `inputs`.
    /// Entries missing from the snapshot keep their current values.
    pub fn restore_into(&self, skeleton: &mut Skeleton, inputs: &mut FrameInputs) {
        for (&joint, &point) in &self.joints {
            skeleton.set(joint, point.into());
        }
        for (&limb, record) in &self.ik_targets {
            inputs.set_target(
                limb,
                IkTarget {
                    position: record.position(),
                    active: record.active,
                },
            );
        }
        for (&limb, record) in &self.pole_vectors {
            inputs.set_pole(
                limb,
                PoleVector {
                    position: record.position(),
                    active: record.active,
                },
            );
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("exported rig snapshot to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
