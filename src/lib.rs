//! # rig2d
//!
//! A 2D character rig solved once per frame: FABRIK inverse kinematics for the limbs,
//! pole vectors to pick the elbow bend, and a Verlet cloth patch pinned to the chest.
//!
//! ## Features
//! - FABRIK (Forward And Backward Reaching Inverse Kinematics) chain solver
//! - CCD (Cyclic Coordinate Descent) as an alternate solver behind the same trait
//! - Pole vector correction for three-joint limbs
//! - Verlet cloth grid with structural and shear links, pinned top row
//! - Pure per-frame step plus an owning orchestrator that publishes to a render sink
//! - Non-blocking pose-suggestion mailbox and a JSON export snapshot
//!
//! ## Example
//! ```rust,ignore
//! use rig2d::ik::IkTarget;
//! use rig2d::render::NullSink;
//! use rig2d::rig::{FrameOrchestrator, RigSettings};
//! use rig2d::skeleton::Limb;
//! use glam::Vec2;
//!
//! let mut rig = FrameOrchestrator::new(RigSettings::default());
//! rig.set_target(Limb::LeftArm, IkTarget::new(Vec2::new(320.0, 240.0)));
//!
//! let report = rig.tick(&mut NullSink);
//! println!("frame {}, cloth error {:.3}", report.frame, report.cloth_error);
//! ```

pub mod cloth;
pub mod error;
pub mod ik;
pub mod math;
pub mod render;
pub mod rig;
pub mod skeleton;

pub use cloth::{ClothConfig, ClothMesh, ClothParams, ClothSimulator};
pub use error::RigError;
pub use ik::{
    Chain, ChainBuilder, ChainSolver, FabrikSolver, IkTarget, PoleVector, SolveResult, SolverKind,
};
pub use render::{FrameOutput, FrameSink};
pub use rig::{FrameInputs, FrameOrchestrator, RigSettings, RigSnapshot, RigState};
pub use skeleton::{JointId, Limb, Skeleton};
