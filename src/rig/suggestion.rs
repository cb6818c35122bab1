//! Pose suggestions from an external generator.
//!
//! The generator runs off the frame loop and answers through a channel. The frame loop
//! only ever polls, so a slow or abandoned request never stalls a frame. A received
//! suggestion replaces the named targets and poles all at once.

use super::orchestrator::FrameInputs;
use super::snapshot::Point;
use crate::error::{Result, RigError};
use crate::ik::{IkTarget, PoleVector};
use crate::skeleton::Limb;
use glam::Vec2;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

#[derive(Debug, Deserialize)]
struct Payload {
    label: String,
    targets: BTreeMap<String, Point>,
    #[serde(default)]
    poles: BTreeMap<String, Point>,
}

/// A validated pose: target (and optionally pole) positions per limb.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseSuggestion {
    pub label: String,
    pub targets: Vec<(Limb, Vec2)>,
    pub poles: Vec<(Limb, Vec2)>,
}

impl PoseSuggestion {
    /// Parses and validates a generator payload such as
    /// `{"label": "wave", "targets": {"left_arm": {"x": 300, "y": 200}}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let payload: Payload = serde_json::from_str(json).map_err(RigError::MalformedSuggestion)?;
        if payload.targets.is_empty() {
            return Err(RigError::EmptySuggestion(payload.label));
        }
        Ok(Self {
            targets: validate(&payload.targets, "target")?,
            poles: validate(&payload.poles, "pole")?,
            label: payload.label,
        })
    }

    /// Activates every target and pole this suggestion names. Limbs it does not name
    /// keep their current inputs.
    pub fn apply(&self, inputs: &mut FrameInputs) {
        for &(limb, position) in &self.targets {
            inputs.set_target(limb, IkTarget::new(position));
        }
        for &(limb, position) in &self.poles {
            inputs.set_pole(limb, PoleVector::new(position));
        }
    }
}

fn validate(entries: &BTreeMap<String, Point>, what: &str) -> Result<Vec<(Limb, Vec2)>> {
    entries
        .iter()
        .map(|(name, &point)| {
            let limb = Limb::from_name(name).ok_or_else(|| RigError::UnknownLimb(name.clone()))?;
            let position = Vec2::from(point);
            if !position.is_finite() {
                return Err(RigError::NonFiniteCoordinate(format!("{name} {what}")));
            }
            Ok((limb, position))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// Handed to whoever fulfils a request; sending through it never blocks.
#[derive(Debug, Clone)]
pub struct SuggestionTicket {
    id: RequestId,
    sender: Sender<(RequestId, PoseSuggestion)>,
}

impl SuggestionTicket {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn deliver(self, suggestion: PoseSuggestion) {
        // A dropped inbox means nobody wants the answer any more.
        let _ = self.sender.send((self.id, suggestion));
    }

    /// Validates a raw payload before it can reach the rig.
    pub fn deliver_json(self, json: &str) -> Result<()> {
        let suggestion = PoseSuggestion::from_json(json)?;
        self.deliver(suggestion);
        Ok(())
    }
}

/// Receiving end polled once per frame. At most one request is pending; starting a
/// new one abandons the previous.
#[derive(Debug)]
pub struct SuggestionInbox {
    sender: Sender<(RequestId, PoseSuggestion)>,
    receiver: Receiver<(RequestId, PoseSuggestion)>,
    pending: Option<RequestId>,
    next_id: u64,
}

impl SuggestionInbox {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            pending: None,
            next_id: 0,
        }
    }

    pub fn request(&mut self) -> SuggestionTicket {
        if let Some(previous) = self.pending {
            log::debug!("abandoning pose request {:?}", previous);
        }
        let id = RequestId(self.next_id);
        self.next_id += 1;
        self.pending = Some(id);
        SuggestionTicket {
            id,
            sender: self.sender.clone(),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            log::debug!("cancelled pose request {:?}", id);
        }
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    /// Drains the channel without blocking and returns the answer to the pending
    /// request, if it has arrived. Answers to abandoned requests are dropped.
    pub fn poll(&mut self) -> Option<PoseSuggestion> {
        let mut accepted = None;
        loop {
            match self.receiver.try_recv() {
                Ok((id, suggestion)) if Some(id) == self.pending => {
                    self.pending = None;
                    accepted = Some(suggestion);
                }
                Ok((id, suggestion)) => {
                    log::debug!("discarding stale pose '{}' from {:?}", suggestion.label, id);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        accepted
    }
}

impl Default for SuggestionInbox {
    fn default() -> Self {
        Self::new()
    }
}
