//! Publish state machine.

use serde::Serialize;
use std::fmt;

/// The remote step a publish failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStep {
    Grant,
    Upload,
    Record,
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishStep::Grant => "grant",
            PublishStep::Upload => "upload",
            PublishStep::Record => "record",
        };
        f.write_str(name)
    }
}

/// `Idle → RequestingGrant → Uploading → CreatingRecord → Done`, with
/// `Failed(step)` reachable from each working state. States never repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    Idle,
    RequestingGrant,
    Uploading,
    CreatingRecord,
    Done,
    Failed(PublishStep),
}

impl PublishState {
    fn rank(self) -> u8 {
        match self {
            PublishState::Idle => 0,
            PublishState::RequestingGrant => 1,
            PublishState::Uploading => 2,
            PublishState::CreatingRecord => 3,
            PublishState::Done | PublishState::Failed(_) => 4,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PublishState::Done | PublishState::Failed(_))
    }

    /// Forward-only transitions; `Failed(step)` only from the state working on `step`.
    pub fn can_transition_to(self, next: PublishState) -> bool {
        match (self, next) {
            (PublishState::RequestingGrant, PublishState::Failed(PublishStep::Grant))
            | (PublishState::Uploading, PublishState::Failed(PublishStep::Upload))
            | (PublishState::CreatingRecord, PublishState::Failed(PublishStep::Record)) => true,
            (_, PublishState::Failed(_)) => false,
            (current, next) => !current.is_terminal() && next.rank() == current.rank() + 1,
        }
    }
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishState::Idle => f.write_str("idle"),
            PublishState::RequestingGrant => f.write_str("requesting_grant"),
            PublishState::Uploading => f.write_str("uploading"),
            PublishState::CreatingRecord => f.write_str("creating_record"),
            PublishState::Done => f.write_str("done"),
            PublishState::Failed(step) => write!(f, "failed({})", step),
        }
    }
}

/// Receives state transitions and upload progress of a publish.
pub trait PublishObserver: Send + Sync {
    fn on_state(&self, _state: PublishState) {}

    fn on_progress(&self, _percent: u8) {}
}
