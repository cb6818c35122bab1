use super::chain::Chain;
use crate::math::{place_at_distance, EPSILON};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Residual below which a solve counts as converged.
pub const CONVERGENCE_TOLERANCE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveResult {
    pub converged: bool,
    pub iterations: u32,
    /// Tip-to-target distance after the last pass. A stretched FABRIK chain reports
    /// how far its last segment grew past its rest length instead.
    pub residual: f32,
    pub reachable: bool,
}

impl SolveResult {
    fn trivial() -> Self {
        Self {
            converged: true,
            iterations: 0,
            residual: 0.0,
            reachable: true,
        }
    }
}

/// Strategy interface for positioning a chain so its tip reaches a target.
pub trait ChainSolver: Send + Sync + Debug {
    fn solve(&self, chain: &mut Chain, target: Vec2, iterations: u32) -> SolveResult;
}

/// Which chain solver the orchestrator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    #[default]
    Fabrik,
    Ccd,
}

static FABRIK: FabrikSolver = FabrikSolver;
static CCD: CcdSolver = CcdSolver;

impl SolverKind {
    pub fn solver(self) -> &'static dyn ChainSolver {
        match self {
            SolverKind::Fabrik => &FABRIK,
            SolverKind::Ccd => &CCD,
        }
    }

    pub fn default_iterations(self) -> u32 {
        match self {
            SolverKind::Fabrik => 10,
            SolverKind::Ccd => 15,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SolverKind::Fabrik => "fabrik",
            SolverKind::Ccd => "ccd",
        }
    }

    /// Solves `positions` towards `target`, resampling rest lengths from the incoming
    /// pose.
    pub fn solve_positions(
        self,
        positions: &[Vec2],
        target: Vec2,
        iterations: u32,
    ) -> (Vec<Vec2>, SolveResult) {
        let mut chain = Chain::from_positions(positions.to_vec());
        let result = self.solver().solve(&mut chain, target, iterations);
        (chain.into_positions(), result)
    }
}

impl std::str::FromStr for SolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fabrik" => Ok(SolverKind::Fabrik),
            "ccd" => Ok(SolverKind::Ccd),
            other => Err(format!("unknown solver '{other}' (expected fabrik or ccd)")),
        }
    }
}

/// Forward And Backward Reaching IK.
///
/// Every pass pins the tip on the target and walks back to the root, then pins the
/// root on its original position and walks out again, so a reachable target keeps
/// every segment at its rest length. A three-joint chain starts from its exact
/// two-bone bend, which the passes then only polish. A target beyond the chain's reach
/// lays the chain straight towards it with the tip on the target, stretching the last
/// segment instead of being clamped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FabrikSolver;

/// Share of the chain length within which every joint counts as lying on the
/// base-target line.
const FOLD_TOLERANCE: f32 = 1e-3;

/// Sideways push applied to interior joints of a flat chain, relative to the segment
/// length.
const UNFOLD_BEND: f32 = 0.25;

impl FabrikSolver {
    fn backward_pass(chain: &mut Chain, target: Vec2) {
        let n = chain.positions.len();

        chain.positions[n - 1] = target;

        for i in (0..n - 1).rev() {
            chain.positions[i] = place_at_distance(
                chain.positions[i + 1],
                chain.positions[i],
                chain.bone_lengths[i],
            );
        }
    }

    fn forward_pass(chain: &mut Chain, base: Vec2) {
        let n = chain.positions.len();

        chain.positions[0] = base;

        for i in 1..n {
            chain.positions[i] = place_at_distance(
                chain.positions[i - 1],
                chain.positions[i],
                chain.bone_lengths[i - 1],
            );
        }
    }

    /// Places the middle joint of a three-joint chain with the law of cosines, keeping
    /// the side it already bends to.
    fn seed_bend(chain: &mut Chain, target: Vec2) {
        let &[upper, lower] = chain.bone_lengths.as_slice() else {
            return;
        };
        let base = chain.positions[0];
        let to_target = target - base;
        let reach = to_target.length();
        if reach < EPSILON || upper < EPSILON || lower < EPSILON {
            return;
        }

        let cos = ((reach * reach + upper * upper - lower * lower) / (2.0 * reach * upper))
            .clamp(-1.0, 1.0);
        let side = if to_target.perp_dot(chain.positions[1] - base) < 0.0 {
            -1.0
        } else {
            1.0
        };
        let angle = cos.acos() * side;
        chain.positions[1] = base + Vec2::from_angle(angle).rotate(to_target / reach) * upper;
    }

    /// Pushes the interior joints off the base-target line when the whole chain lies
    /// on it. Neither pass can bend a chain folded flat onto that line.
    fn unfold(chain: &mut Chain, target: Vec2) {
        let n = chain.positions.len();
        let base = chain.positions[0];
        let axis = if base.distance(target) < EPSILON {
            chain.positions[n - 1] - base
        } else {
            target - base
        };
        let Some(dir) = axis.try_normalize() else {
            return;
        };

        let tolerance = FOLD_TOLERANCE * chain.total_length();
        let flat = chain.positions[1..]
            .iter()
            .all(|p| (*p - base).perp_dot(dir).abs() <= tolerance);
        if !flat {
            return;
        }

        let normal = dir.perp();
        for i in 1..n - 1 {
            chain.positions[i] += normal * (chain.bone_lengths[i - 1] * UNFOLD_BEND);
        }
    }

    fn stretch_towards(chain: &mut Chain, target: Vec2) {
        let n = chain.positions.len();
        let dir = (target - chain.positions[0]).normalize_or_zero();

        for i in 1..n {
            chain.positions[i] = chain.positions[i - 1] + dir * chain.bone_lengths[i - 1];
        }
        chain.positions[n - 1] = target;
    }
}

impl ChainSolver for FabrikSolver {
    fn solve(&self, chain: &mut Chain, target: Vec2, iterations: u32) -> SolveResult {
        let n = chain.positions.len();
        if n < 2 {
            return SolveResult::trivial();
        }

        let reachable = chain.can_reach(target);
        if iterations == 0 {
            let residual = chain.positions[n - 1].distance(target);
            return SolveResult {
                converged: residual <= CONVERGENCE_TOLERANCE,
                iterations,
                residual,
                reachable,
            };
        }

        if !reachable {
            Self::stretch_towards(chain, target);
            let stretch = chain.positions[n - 1].distance(chain.positions[n - 2])
                - chain.bone_lengths[n - 2];
            log::trace!("fabrik: {n} joints stretched {stretch:.4} past reach");
            return SolveResult {
                converged: false,
                iterations: 0,
                residual: stretch,
                reachable,
            };
        }

        let base = chain.positions[0];
        if n == 3 {
            Self::seed_bend(chain, target);
        }

        for _ in 0..iterations {
            if n > 3 && chain.positions[n - 1].distance(target) > CONVERGENCE_TOLERANCE {
                Self::unfold(chain, target);
            }
            Self::backward_pass(chain, target);
            Self::forward_pass(chain, base);
        }

        let residual = chain.positions[n - 1].distance(target);

        log::trace!(
            "fabrik: {} joints, {} passes, residual {:.4}",
            n,
            iterations,
            residual
        );

        SolveResult {
            converged: residual <= CONVERGENCE_TOLERANCE,
            iterations,
            residual,
            reachable,
        }
    }
}

/// Cyclic Coordinate Descent.
///
/// Rotates the sub-chain below each joint, tip-side first, so the tip swings onto the
/// line from that joint to the target. Segment lengths never change; an unreachable
/// target leaves the chain pointing at it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CcdSolver;

impl CcdSolver {
    fn rotate_after(chain: &mut Chain, pivot_index: usize, angle: f32) {
        let pivot = chain.positions[pivot_index];
        let rotation = Vec2::from_angle(angle);
        for p in &mut chain.positions[pivot_index + 1..] {
            *p = pivot + rotation.rotate(*p - pivot);
        }
    }
}

impl ChainSolver for CcdSolver {
    fn solve(&self, chain: &mut Chain, target: Vec2, iterations: u32) -> SolveResult {
        let n = chain.positions.len();
        if n < 2 {
            return SolveResult::trivial();
        }

        let reachable = chain.can_reach(target);
        let mut passes = 0;

        for _ in 0..iterations {
            passes += 1;
            for i in (0..n - 1).rev() {
                let joint = chain.positions[i];
                let to_end = chain.positions[n - 1] - joint;
                let to_target = target - joint;

                if to_end.length() < EPSILON || to_target.length() < EPSILON {
                    continue;
                }

                let angle = to_end.perp_dot(to_target).atan2(to_end.dot(to_target));
                if angle.abs() > EPSILON {
                    Self::rotate_after(chain, i, angle);
                }
            }

            if chain.positions[n - 1].distance(target) < CONVERGENCE_TOLERANCE {
                break;
            }
        }

        let residual = chain.positions[n - 1].distance(target);

        log::trace!(
            "ccd: {} joints, {} passes, residual {:.4}, reachable {}",
            n,
            passes,
            residual,
            reachable
        );

        SolveResult {
            converged: residual <= CONVERGENCE_TOLERANCE,
            iterations: passes,
            residual,
            reachable,
        }
    }
}
