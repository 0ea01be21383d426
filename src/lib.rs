//! namepings - audible name pings for chat participants.
//!
//! Plays a notification cue for a participant when their display name
//! appears in chat or another participant pings them by command. Pings are
//! rate limited per participant on a logical tick clock, and participants
//! can opt out; the opt-out list persists across restarts.

pub mod config;
pub mod error;
pub mod handlers;
pub mod host;
pub mod metrics;
pub mod pings;
pub mod state;
pub mod telemetry;

pub use config::Config;
pub use error::{CommandError, PersistenceError, ReloadError};
pub use pings::PingEngine;
pub use state::{Participant, ParticipantId};
