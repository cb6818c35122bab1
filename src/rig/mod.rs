//! Frame orchestration
//!
//! Settings, the per-frame step that runs the limb solvers and the cloth, the owning
//! driver, the export snapshot and the pose-suggestion mailbox.

pub mod orchestrator;
pub mod settings;
pub mod snapshot;
pub mod suggestion;

pub use orchestrator::{solve_limb, step, FrameInputs, FrameOrchestrator, FrameReport, RigState};
pub use settings::RigSettings;
pub use snapshot::{ControlRecord, Point, RigSnapshot};
pub use suggestion::{PoseSuggestion, RequestId, SuggestionInbox, SuggestionTicket};
