//! Hand-off to the rendering collaborator
//!
//! After every frame the orchestrator publishes the joint table and the cloth through
//! a [`FrameSink`]. Vertex and index buffers are laid out so a GPU renderer can upload
//! them with `bytemuck::cast_slice`.

use crate::cloth::ClothMesh;
use crate::skeleton::{JointId, Skeleton};
use bytemuck::{Pod, Zeroable};
use glam::Vec2;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 2],
}

impl From<Vec2> for PointVertex {
    fn from(v: Vec2) -> Self {
        Self {
            position: v.to_array(),
        }
    }
}

/// One finished frame, borrowed for the duration of [`FrameSink::publish`].
#[derive(Debug, Clone, Copy)]
pub struct FrameOutput<'a> {
    pub frame: u64,
    pub skeleton: &'a Skeleton,
    pub cloth: &'a ClothMesh,
}

impl FrameOutput<'_> {
    /// Particle positions in row-major grid order.
    pub fn particle_positions(&self) -> Vec<Vec2> {
        self.cloth.positions()
    }

    pub fn cloth_vertices(&self) -> Vec<PointVertex> {
        self.cloth.particles().iter().map(|p| p.pos.into()).collect()
    }

    pub fn cloth_indices(&self) -> Vec<u32> {
        quad_indices(self.cloth.rows(), self.cloth.cols())
    }

    /// Line segments from every joint to its parent.
    pub fn bones(&self) -> Vec<[Vec2; 2]> {
        bone_pairs()
            .map(|(parent, child)| [self.skeleton.get(parent), self.skeleton.get(child)])
            .collect()
    }
}

pub trait FrameSink {
    fn publish(&mut self, frame: &FrameOutput<'_>);
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn publish(&mut self, _frame: &FrameOutput<'_>) {}
}

/// Keeps a copy of the most recent frame.
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    pub frames_seen: u64,
    pub last_frame: u64,
    pub joints: Vec<(JointId, Vec2)>,
    pub particles: Vec<Vec2>,
    pub vertices: Vec<PointVertex>,
}

impl FrameSink for CaptureSink {
    fn publish(&mut self, frame: &FrameOutput<'_>) {
        self.frames_seen += 1;
        self.last_frame = frame.frame;
        self.joints = frame.skeleton.iter().collect();
        self.particles = frame.particle_positions();
        self.vertices = frame.cloth_vertices();
    }
}

impl CaptureSink {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Two triangles per grid cell, counter-clockwise in screen space.
pub fn quad_indices(rows: usize, cols: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(rows.saturating_sub(1) * cols.saturating_sub(1) * 6);
    for row in 0..rows.saturating_sub(1) {
        for col in 0..cols.saturating_sub(1) {
            let tl = (row * cols + col) as u32;
            let tr = tl + 1;
            let bl = tl + cols as u32;
            let br = bl + 1;
            indices.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
        }
    }
    indices
}

fn bone_pairs() -> impl Iterator<Item = (JointId, JointId)> {
    JointId::ALL
        .into_iter()
        .filter_map(|child| child.parent().map(|parent| (parent, child)))
}
