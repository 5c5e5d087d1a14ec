//! Domain types shared by the outbound and inbound bridge paths.

mod change;
mod event;

pub use change::StateChange;
pub use event::{EventKind, EventPayload, InboundEnvelope};
