//! Ping core.
//!
//! ```text
//! chat ──▶ mention::scan ──┐
//!                          ├──▶ NotificationDispatcher ──▶ OptOutRegistry
//! sendping / forceping ────┘          │                    CooldownTracker
//!                                     └──▶ NotificationSink
//! ```
//!
//! [`PingEngine`] owns all of it together with the logical clock.

pub mod cooldown;
pub mod dispatcher;
pub mod engine;
pub mod mention;
pub mod opt_out;
pub mod sink;

pub use cooldown::CooldownTracker;
pub use dispatcher::{DispatchOutcome, DispatchPolicy, NotificationDispatcher};
pub use engine::{PingEngine, PingSource};
pub use mention::scan;
pub use opt_out::OptOutRegistry;
pub use sink::{NotificationSink, QueuedCue, QueuedSink};
