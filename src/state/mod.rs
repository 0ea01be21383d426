//! Participant and time state shared by the engine and the host.

mod clock;
mod participant;
mod roster;

pub use clock::{LogicalClock, LogicalTick};
pub use participant::{ParseParticipantIdError, Participant, ParticipantId};
pub use roster::Roster;
