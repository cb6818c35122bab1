//! Inverse Kinematics module
//!
//! Chains sampled from the skeleton, the FABRIK and CCD chain solvers, IK targets and
//! the pole vector correction for three-joint limbs.

pub mod chain;
pub mod pole;
pub mod solver;
pub mod target;

pub use chain::{Chain, ChainBuilder};
pub use pole::{apply_pole, PoleVector};
pub use solver::{CcdSolver, ChainSolver, FabrikSolver, SolveResult, SolverKind};
pub use target::IkTarget;
