use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use rig2d::ik::{IkTarget, PoleVector, SolverKind};
use rig2d::render::CaptureSink;
use rig2d::rig::{FrameOrchestrator, RigSettings, SuggestionInbox};
use rig2d::skeleton::{JointId, Limb};
use std::path::PathBuf;
use std::thread;

/// Runs the rig headless for a number of frames with the arms sweeping in circles.
#[derive(Parser)]
#[command(name = "rig-demo", version, about, long_about = None)]
struct Cli {
    /// Frames to simulate (60 per second of animation)
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Chain solver: fabrik or ccd
    #[arg(long)]
    solver: Option<SolverKind>,

    #[arg(long)]
    gravity: Option<f32>,

    #[arg(long)]
    damping: Option<f32>,

    #[arg(long)]
    stiffness: Option<f32>,

    /// Settings JSON, applied before the individual flags
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write a rig snapshot here when done
    #[arg(long)]
    export: Option<PathBuf>,

    /// Pose suggestion JSON delivered in the background after the first frame
    #[arg(long)]
    pose: Option<PathBuf>,
}

impl Cli {
    fn rig_settings(&self) -> Result<RigSettings> {
        let mut settings = match &self.settings {
            Some(path) => RigSettings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => RigSettings::default(),
        };
        if let Some(solver) = self.solver {
            settings = settings.with_solver(solver);
        }
        if let Some(gravity) = self.gravity {
            settings = settings.with_gravity(gravity);
        }
        if let Some(damping) = self.damping {
            settings = settings.with_damping(damping);
        }
        if let Some(stiffness) = self.stiffness {
            settings = settings.with_cloth_stiffness(stiffness);
        }
        Ok(settings)
    }
}

fn sweep(center: Vec2, radius: f32, frame: u32, phase: f32) -> Vec2 {
    let t = frame as f32 / 60.0 + phase;
    center + Vec2::new(t.cos(), t.sin()) * radius
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut rig = FrameOrchestrator::new(cli.rig_settings()?);
    let mut sink = CaptureSink::default();

    rig.set_pole(Limb::LeftArm, PoleVector::new(Vec2::new(280.0, 250.0)));
    rig.set_pole(Limb::RightArm, PoleVector::new(Vec2::new(520.0, 250.0)));

    if let Some(path) = &cli.pose {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading pose from {}", path.display()))?;
        let mut inbox = SuggestionInbox::new();
        let ticket = inbox.request();
        rig.attach_inbox(inbox);
        thread::spawn(move || {
            if let Err(err) = ticket.deliver_json(&json) {
                log::error!("pose suggestion rejected: {err}");
            }
        });
    }

    let mut unreachable = 0;
    for frame in 0..cli.frames {
        if cli.pose.is_none() {
            rig.set_target(
                Limb::LeftArm,
                IkTarget::new(sweep(Vec2::new(330.0, 300.0), 40.0, frame, 0.0)),
            );
            rig.set_target(
                Limb::RightArm,
                IkTarget::new(sweep(Vec2::new(470.0, 300.0), 40.0, frame, 1.5)),
            );
        }

        let report = rig.tick(&mut sink);
        unreachable += report
            .solves
            .iter()
            .flatten()
            .filter(|r| !r.reachable)
            .count();
    }

    let state = rig.state();
    println!(
        "{} frames, solver {}, {} unreachable solves, cloth error {:.3}",
        sink.frames_seen,
        rig.settings().solver.name(),
        unreachable,
        state.cloth.max_constraint_error()
    );
    for limb in Limb::ALL {
        let wrist = state.skeleton.get(limb.tip());
        let target = rig.inputs().target(limb);
        println!(
            "{:>9}: wrist ({:.1}, {:.1}) target ({:.1}, {:.1}) {}",
            limb.name(),
            wrist.x,
            wrist.y,
            target.position.x,
            target.position.y,
            if target.active { "active" } else { "idle" }
        );
    }
    let chest = state.skeleton.get(JointId::Chest);
    let hem = state.cloth.position_at(state.cloth.rows() - 1, 0);
    println!("chest ({:.1}, {:.1}), cloth hem ({:.1}, {:.1})", chest.x, chest.y, hem.x, hem.y);

    if let Some(path) = &cli.export {
        rig.snapshot()
            .save(path)
            .with_context(|| format!("exporting snapshot to {}", path.display()))?;
    }

    Ok(())
}
