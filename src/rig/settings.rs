use crate::cloth::{ClothParams, FIXED_DT};
use crate::error::Result;
use crate::ik::SolverKind;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

pub const GRAVITY_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const DAMPING_RANGE: RangeInclusive<f32> = 0.5..=1.0;
pub const STIFFNESS_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const STRETCHINESS_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const IK_BLEND_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// Tunable rig parameters, handed to every frame as an immutable snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RigSettings {
    /// How much of the solved pose replaces the previous one, 0..=1.
    pub ik_blend: f32,
    /// Carried for export; the FABRIK solver stretches to long targets regardless.
    pub stretchiness: f32,
    /// Multiplier on 9.8 units/s^2.
    pub gravity: f32,
    pub damping: f32,
    pub cloth_stiffness: f32,
    pub solver: SolverKind,
    /// Solver passes per frame; `None` uses the solver's default.
    pub iterations: Option<u32>,
}

impl Default for RigSettings {
    fn default() -> Self {
        Self {
            ik_blend: 1.0,
            stretchiness: 0.0,
            gravity: 1.0,
            damping: 0.98,
            cloth_stiffness: 0.8,
            solver: SolverKind::Fabrik,
            iterations: None,
        }
    }
}

impl RigSettings {
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_cloth_stiffness(mut self, stiffness: f32) -> Self {
        self.cloth_stiffness = stiffness;
        self
    }

    pub fn with_ik_blend(mut self, blend: f32) -> Self {
        self.ik_blend = blend;
        self
    }

    pub fn with_stretchiness(mut self, stretchiness: f32) -> Self {
        self.stretchiness = stretchiness;
        self
    }

    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations.max(1));
        self
    }

    /// Copy with every value forced into its allowed range. Non-finite values fall
    /// back to the default.
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        Self {
            ik_blend: clamp_setting("ik_blend", self.ik_blend, defaults.ik_blend, IK_BLEND_RANGE),
            stretchiness: clamp_setting(
                "stretchiness",
                self.stretchiness,
                defaults.stretchiness,
                STRETCHINESS_RANGE,
            ),
            gravity: clamp_setting("gravity", self.gravity, defaults.gravity, GRAVITY_RANGE),
            damping: clamp_setting("damping", self.damping, defaults.damping, DAMPING_RANGE),
            cloth_stiffness: clamp_setting(
                "cloth_stiffness",
                self.cloth_stiffness,
                defaults.cloth_stiffness,
                STIFFNESS_RANGE,
            ),
            solver: self.solver,
            iterations: self.iterations.map(|n| n.max(1)),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
            .unwrap_or_else(|| self.solver.default_iterations())
    }

    pub fn cloth_params(&self) -> ClothParams {
        ClothParams {
            gravity: self.gravity,
            damping: self.damping,
            stiffness: self.cloth_stiffness,
            dt: FIXED_DT,
        }
    }

    /// Parses settings JSON; missing fields take their defaults, values are clamped.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.clamped())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

fn clamp_setting(name: &str, value: f32, fallback: f32, range: RangeInclusive<f32>) -> f32 {
    if !value.is_finite() {
        log::warn!("{name} = {value} is not finite, using {fallback}");
        return fallback;
    }
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        log::warn!(
            "{name} = {value} outside {}..={}, clamped to {clamped}",
            range.start(),
            range.end()
        );
    }
    clamped
}
