//! Cloth module
//!
//! A grid of Verlet particles hanging from a skeleton joint, held together by
//! structural and shear distance links that are relaxed a fixed number of times per
//! step.

mod constraint;
mod mesh;
mod particle;
mod simulator;

pub use constraint::{DistanceConstraint, LinkKind};
pub use mesh::{ClothConfig, ClothMesh};
pub use particle::Particle;
pub use simulator::{ClothParams, ClothSimulator, FIXED_DT, GRAVITY, RELAXATION_PASSES};
