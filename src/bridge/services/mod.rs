//! Orchestration services for the bridge.

mod cancel;
mod receiver;
mod trigger;

pub use cancel::{CancelError, CancelService};
pub use receiver::{EventReceiver, Receipt, WebhookError};
pub use trigger::{
    QueueTaskAction, SkipReason, TransitionWatcher, TriggerDecision, TriggerError, TriggerOutcome,
};
