//! Notification sink abstraction.
//!
//! The engine decides *whether* a participant is pinged; a sink decides how
//! the cue is rendered. Sinks are called from the dispatch hot path and
//! must not block.

use crate::state::ParticipantId;
use parking_lot::Mutex;

/// Renders an audible cue for a participant.
pub trait NotificationSink: Send + Sync {
    /// Play `cue` for `participant`.
    fn play_cue(&self, participant: &ParticipantId, cue: &str);
}

/// One cue handed to a [`QueuedSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedCue {
    pub participant: ParticipantId,
    pub cue: String,
}

/// Sink that queues cues for the host to render later.
///
/// The console host drains it after every event. Tests use it to observe
/// exactly which cues were played.
#[derive(Debug, Default)]
pub struct QueuedSink {
    queue: Mutex<Vec<QueuedCue>>,
}

impl QueuedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued cue, oldest first.
    pub fn drain(&self) -> Vec<QueuedCue> {
        std::mem::take(&mut *self.queue.lock())
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl NotificationSink for QueuedSink {
    fn play_cue(&self, participant: &ParticipantId, cue: &str) {
        self.queue.lock().push(QueuedCue {
            participant: *participant,
            cue: cue.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_sink_drains_in_order() {
        let sink = QueuedSink::new();
        let a = ParticipantId::random();
        let b = ParticipantId::random();
        sink.play_cue(&a, "ding");
        sink.play_cue(&b, "dong");
        assert_eq!(sink.len(), 2);

        let cues = sink.drain();
        assert_eq!(cues[0].participant, a);
        assert_eq!(cues[1].cue, "dong");
        assert!(sink.is_empty());
    }
}
