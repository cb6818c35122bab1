use super::settings::RigSettings;
use super::snapshot::RigSnapshot;
use super::suggestion::{PoseSuggestion, SuggestionInbox};
use crate::cloth::{ClothConfig, ClothMesh, ClothSimulator};
use crate::ik::{Chain, IkTarget, PoleVector, SolveResult};
use crate::render::{FrameOutput, FrameSink};
use crate::skeleton::{Limb, Skeleton};

/// Everything the rig carries from one frame to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct RigState {
    pub skeleton: Skeleton,
    pub cloth: ClothMesh,
    pub frame: u64,
}

impl RigState {
    pub fn new() -> Self {
        Self::with_cloth(ClothConfig::default())
    }

    pub fn with_cloth(config: ClothConfig) -> Self {
        let skeleton = Skeleton::initial();
        let cloth = ClothMesh::new(config, skeleton.anchor());
        Self {
            skeleton,
            cloth,
            frame: 0,
        }
    }

    pub fn reset_cloth(&mut self) {
        self.cloth.reset(self.skeleton.anchor());
    }
}

impl Default for RigState {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-limb IK targets and pole vectors for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    targets: [IkTarget; Limb::COUNT],
    poles: [PoleVector; Limb::COUNT],
}

impl FrameInputs {
    /// Inactive targets resting on each wrist and inactive poles on each elbow.
    pub fn idle(skeleton: &Skeleton) -> Self {
        let targets = Limb::ALL.map(|limb| IkTarget::inactive(skeleton.get(limb.tip())));
        let poles = Limb::ALL.map(|limb| PoleVector::inactive(skeleton.get(limb.joints()[1])));
        Self { targets, poles }
    }

    pub fn target(&self, limb: Limb) -> IkTarget {
        self.targets[limb.index()]
    }

    pub fn pole(&self, limb: Limb) -> PoleVector {
        self.poles[limb.index()]
    }

    pub fn set_target(&mut self, limb: Limb, target: IkTarget) {
        self.targets[limb.index()] = target;
    }

    pub fn set_pole(&mut self, limb: Limb, pole: PoleVector) {
        self.poles[limb.index()] = pole;
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    /// Solver outcome per limb; `None` when the limb's target was inactive.
    pub solves: [Option<SolveResult>; Limb::COUNT],
    pub cloth_error: f32,
}

/// Advances `state` by one frame and returns the new state.
///
/// Limbs are solved first (chain solver, then the pole vector), the cloth steps after
/// that against the already-moved anchor joint.
pub fn step(state: &RigState, inputs: &FrameInputs, settings: &RigSettings) -> RigState {
    let mut next = state.clone();
    advance(&mut next, inputs, settings);
    next
}

pub(crate) fn advance(
    state: &mut RigState,
    inputs: &FrameInputs,
    settings: &RigSettings,
) -> FrameReport {
    let mut solves = [None; Limb::COUNT];
    for limb in Limb::ALL {
        solves[limb.index()] = solve_limb(
            &mut state.skeleton,
            limb,
            inputs.target(limb),
            inputs.pole(limb),
            settings,
        );
    }

    ClothSimulator::step(
        &mut state.cloth,
        &settings.cloth_params(),
        state.skeleton.anchor(),
    );
    state.frame += 1;

    let report = FrameReport {
        frame: state.frame,
        solves,
        cloth_error: state.cloth.max_constraint_error(),
    };
    log::debug!(
        "frame {}: solved {}/{} limbs, cloth error {:.3}",
        report.frame,
        solves.iter().flatten().count(),
        Limb::COUNT,
        report.cloth_error
    );
    report
}

/// Solves one limb in place. Returns `None` without touching the skeleton when the
/// target is inactive.
pub fn solve_limb(
    skeleton: &mut Skeleton,
    limb: Limb,
    target: IkTarget,
    pole: PoleVector,
    settings: &RigSettings,
) -> Option<SolveResult> {
    if !target.active {
        return None;
    }

    let joints = limb.joints();
    let before = skeleton.sample(joints);
    let mut chain = Chain::from_positions(before.clone());
    let result = settings
        .solver
        .solver()
        .solve(&mut chain, target.position, settings.iterations());

    let mut solved = chain.into_positions();
    if pole.active {
        pole.apply_to_chain(&mut solved);
    }

    if settings.ik_blend < 1.0 {
        for (next, prev) in solved.iter_mut().zip(&before) {
            *next = prev.lerp(*next, settings.ik_blend);
        }
    }
    skeleton.write_back(joints, &solved);

    if !result.reachable {
        log::trace!("{}: target {:?} out of reach", limb.name(), target.position);
    }
    Some(result)
}

/// Owns the rig between frames and drives it once per display tick.
pub struct FrameOrchestrator {
    state: RigState,
    inputs: FrameInputs,
    settings: RigSettings,
    inbox: Option<SuggestionInbox>,
}

impl FrameOrchestrator {
    pub fn new(settings: RigSettings) -> Self {
        Self::with_state(RigState::new(), settings)
    }

    pub fn with_state(state: RigState, settings: RigSettings) -> Self {
        let inputs = FrameInputs::idle(&state.skeleton);
        Self {
            state,
            inputs,
            settings: settings.clamped(),
            inbox: None,
        }
    }

    pub fn state(&self) -> &RigState {
        &self.state
    }

    pub fn inputs(&self) -> &FrameInputs {
        &self.inputs
    }

    pub fn settings(&self) -> &RigSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: RigSettings) {
        self.settings = settings.clamped();
    }

    pub fn set_target(&mut self, limb: Limb, target: IkTarget) {
        self.inputs.set_target(limb, target);
    }

    pub fn set_pole(&mut self, limb: Limb, pole: PoleVector) {
        self.inputs.set_pole(limb, pole);
    }

    pub fn attach_inbox(&mut self, inbox: SuggestionInbox) {
        self.inbox = Some(inbox);
    }

    pub fn inbox_mut(&mut self) -> Option<&mut SuggestionInbox> {
        self.inbox.as_mut()
    }

    /// Applies every target and pole named by `suggestion` at once.
    pub fn apply_suggestion(&mut self, suggestion: &PoseSuggestion) {
        suggestion.apply(&mut self.inputs);
    }

    /// Runs one frame and hands the result to `sink`.
    pub fn tick(&mut self, sink: &mut dyn FrameSink) -> FrameReport {
        if let Some(suggestion) = self.inbox.as_mut().and_then(SuggestionInbox::poll) {
            log::debug!("applying pose suggestion '{}'", suggestion.label);
            suggestion.apply(&mut self.inputs);
        }

        let report = advance(&mut self.state, &self.inputs, &self.settings);

        sink.publish(&FrameOutput {
            frame: self.state.frame,
            skeleton: &self.state.skeleton,
            cloth: &self.state.cloth,
        });

        report
    }

    /// Rebuilds the cloth around the current anchor joint.
    pub fn reset_cloth(&mut self) {
        self.state.reset_cloth();
    }

    pub fn snapshot(&self) -> RigSnapshot {
        RigSnapshot::capture(&self.state.skeleton, &self.inputs, &self.settings)
    }

    /// Restores joints, targets, poles and settings from `snapshot`. The cloth is
    /// rebuilt around the restored anchor.
    pub fn restore(&mut self, snapshot: &RigSnapshot) {
        snapshot.restore_into(&mut self.state.skeleton, &mut self.inputs);
        self.settings = snapshot.settings.clamped();
        self.state.reset_cloth();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NullSink;
    use crate::rig::SuggestionInbox;
    use crate::skeleton::JointId;
    use approx::assert_abs_diff_eq;
    use glam::Vec2;

    #[test]
    fn idle_inputs_leave_skeleton_alone() {
        let state = RigState::new();
        let inputs = FrameInputs::idle(&state.skeleton);
        let next = step(&state, &inputs, &RigSettings::default());
        assert_eq!(next.skeleton, state.skeleton);
        assert_eq!(next.frame, 1);
    }

    #[test]
    fn step_does_not_touch_previous_state() {
        let state = RigState::new();
        let mut inputs = FrameInputs::idle(&state.skeleton);
        inputs.set_target(Limb::LeftArm, IkTarget::new(Vec2::new(330.0, 250.0)));
        let before = state.clone();
        let next = step(&state, &inputs, &RigSettings::default());
        assert_eq!(state, before);
        assert_ne!(next.skeleton, state.skeleton);
    }

    #[test]
    fn active_target_moves_only_its_limb() {
        let mut state = RigState::new();
        let start = state.skeleton;
        let mut inputs = FrameInputs::idle(&state.skeleton);
        let target = Vec2::new(480.0, 250.0);
        inputs.set_target(Limb::RightArm, IkTarget::new(target));

        let report = advance(&mut state, &inputs, &RigSettings::default());

        assert!(report.solves[Limb::LeftArm.index()].is_none());
        assert!(report.solves[Limb::RightArm.index()].is_some());
        assert_abs_diff_eq!(
            state.skeleton.get(JointId::RightWrist).distance(target),
            0.0,
            epsilon = 1e-2
        );
        assert_eq!(state.skeleton.get(JointId::RightShoulder), start.get(JointId::RightShoulder));
        for joint in Limb::LeftArm.joints() {
            assert_eq!(state.skeleton.get(*joint), start.get(*joint));
        }
    }

    #[test]
    fn zero_blend_keeps_pose() {
        let mut state = RigState::new();
        let start = state.skeleton;
        let mut inputs = FrameInputs::idle(&state.skeleton);
        inputs.set_target(Limb::LeftArm, IkTarget::new(Vec2::new(330.0, 250.0)));
        let settings = RigSettings::default().with_ik_blend(0.0);

        let report = advance(&mut state, &inputs, &settings);

        assert!(report.solves[Limb::LeftArm.index()].is_some());
        assert_eq!(state.skeleton, start);
    }

    #[test]
    fn half_blend_lands_between_pose_and_solution() {
        let state = RigState::new();
        let mut inputs = FrameInputs::idle(&state.skeleton);
        inputs.set_target(Limb::LeftArm, IkTarget::new(Vec2::new(330.0, 250.0)));

        let solved = step(&state, &inputs, &RigSettings::default());
        let blended = step(&state, &inputs, &RigSettings::default().with_ik_blend(0.5));

        for joint in Limb::LeftArm.joints() {
            let midpoint = (state.skeleton.get(*joint) + solved.skeleton.get(*joint)) * 0.5;
            assert_abs_diff_eq!(blended.skeleton.get(*joint).x, midpoint.x, epsilon = 1e-3);
            assert_abs_diff_eq!(blended.skeleton.get(*joint).y, midpoint.y, epsilon = 1e-3);
        }
        assert_ne!(blended.skeleton.get(JointId::LeftWrist), solved.skeleton.get(JointId::LeftWrist));
    }

    #[test]
    fn arm_lengths_survive_many_frames() {
        let initial = Skeleton::initial();
        let lengths = |skeleton: &Skeleton| {
            let joints = Limb::LeftArm.joints();
            let [shoulder, elbow, wrist] = [joints[0], joints[1], joints[2]].map(|j| skeleton.get(j));
            (shoulder.distance(elbow), elbow.distance(wrist))
        };
        let (upper, fore) = lengths(&initial);

        let mut orchestrator = FrameOrchestrator::new(RigSettings::default());
        orchestrator.set_target(Limb::LeftArm, IkTarget::new(Vec2::new(382.0, 254.0)));
        orchestrator.tick(&mut NullSink);
        for _ in 0..60 {
            orchestrator.set_target(Limb::LeftArm, IkTarget::new(Vec2::new(330.0, 330.0)));
            orchestrator.tick(&mut NullSink);
        }

        let skeleton = &orchestrator.state().skeleton;
        let (after_upper, after_fore) = lengths(skeleton);
        assert_abs_diff_eq!(after_upper, upper, epsilon = 1e-3);
        assert_abs_diff_eq!(after_fore, fore, epsilon = 1e-3);
        assert_abs_diff_eq!(
            skeleton.get(JointId::LeftWrist).distance(Vec2::new(330.0, 330.0)),
            0.0,
            epsilon = 1e-2
        );
    }

    #[test]
    fn suggestions_apply_directly_or_through_inbox() {
        let mut orchestrator = FrameOrchestrator::new(RigSettings::default());
        assert!(orchestrator.inbox_mut().is_none());

        let wave = PoseSuggestion::from_json(
            r#"{"label": "wave", "targets": {"right_arm": {"x": 470, "y": 230}}}"#,
        )
        .expect("valid payload");
        orchestrator.apply_suggestion(&wave);
        assert_eq!(
            orchestrator.inputs().target(Limb::RightArm),
            IkTarget::new(Vec2::new(470.0, 230.0))
        );

        orchestrator.attach_inbox(SuggestionInbox::new());
        let ticket = orchestrator.inbox_mut().expect("inbox attached").request();
        ticket
            .deliver_json(r#"{"label": "reach", "targets": {"left_arm": {"x": 330, "y": 250}}}"#)
            .expect("valid payload");
        orchestrator.tick(&mut NullSink);

        assert!(orchestrator.inputs().target(Limb::LeftArm).active);
        assert!(orchestrator.inputs().target(Limb::RightArm).active);
        assert!(orchestrator.inbox_mut().and_then(|inbox| inbox.pending()).is_none());
    }

    #[test]
    fn pole_decides_elbow_side() {
        let target = Vec2::new(330.0, 330.0);
        let elbow_for = |pole: Vec2| {
            let mut state = RigState::new();
            let mut inputs = FrameInputs::idle(&state.skeleton);
            inputs.set_target(Limb::LeftArm, IkTarget::new(target));
            inputs.set_pole(Limb::LeftArm, PoleVector::new(pole));
            advance(&mut state, &inputs, &RigSettings::default());
            state.skeleton.get(JointId::LeftElbow)
        };
        let shoulder = Skeleton::initial().get(JointId::LeftShoulder);
        let side = |p: Vec2| (target - shoulder).perp_dot(p - shoulder).signum();

        for pole in [Vec2::new(170.0, 180.0), Vec2::new(530.0, 420.0)] {
            assert_eq!(side(elbow_for(pole)), side(pole));
        }
    }

    #[test]
    fn cloth_follows_moved_anchor() {
        let mut orchestrator = FrameOrchestrator::new(RigSettings::default());
        orchestrator.tick(&mut NullSink);
        let cloth = &orchestrator.state().cloth;
        assert_eq!(cloth.particles()[0].pos, Vec2::new(362.5, 270.0));
    }

    #[test]
    fn reset_restores_initial_mesh() {
        let mut orchestrator = FrameOrchestrator::new(RigSettings::default());
        for _ in 0..30 {
            orchestrator.tick(&mut NullSink);
        }
        orchestrator.reset_cloth();
        assert_eq!(orchestrator.state().cloth, RigState::new().cloth);
    }

    #[test]
    fn settings_are_clamped_on_entry() {
        let mut orchestrator =
            FrameOrchestrator::new(RigSettings::default().with_damping(2.0));
        assert_abs_diff_eq!(orchestrator.settings().damping, 1.0);
        orchestrator.set_settings(RigSettings::default().with_gravity(-1.0));
        assert_abs_diff_eq!(orchestrator.settings().gravity, 0.0);
    }
}
