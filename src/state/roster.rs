//! Online participant roster.
//!
//! Supplies "who is online" to the console host: chat recipients and
//! command-target lookup. The ping engine never reads this directly, it
//! only receives recipient lists built from it.

use super::participant::{Participant, ParticipantId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

/// Online participants keyed by id, with a case-insensitive name index.
#[derive(Debug, Default)]
pub struct Roster {
    participants: DashMap<ParticipantId, Participant>,
    /// ASCII-lowercased display name -> ids using it, in join order.
    names: DashMap<String, Vec<ParticipantId>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an online participant.
    pub fn join(&self, participant: Participant) {
        if let Some(previous) = self.participants.get(&participant.id).map(|p| p.name.clone()) {
            self.unindex(&previous, &participant.id);
        }
        self.index(&participant.name, &participant.id);
        debug!(id = %participant.id, name = %participant.name, "participant joined");
        self.participants.insert(participant.id, participant);
    }

    /// Remove a participant, returning it if it was online.
    pub fn leave(&self, id: &ParticipantId) -> Option<Participant> {
        let (_, participant) = self.participants.remove(id)?;
        self.unindex(&participant.name, id);
        debug!(id = %id, name = %participant.name, "participant left");
        Some(participant)
    }

    /// Change a participant's display name. Returns `false` if not online.
    pub fn rename(&self, id: &ParticipantId, name: impl Into<String>) -> bool {
        let name = name.into();
        let old = {
            let Some(mut entry) = self.participants.get_mut(id) else {
                return false;
            };
            std::mem::replace(&mut entry.name, name.clone())
        };
        self.unindex(&old, id);
        self.index(&name, id);
        debug!(id = %id, old = %old, new = %name, "participant renamed");
        true
    }

    pub fn get(&self, id: &ParticipantId) -> Option<Participant> {
        self.participants.get(id).map(|p| p.value().clone())
    }

    /// Find an online participant by exact display name, ignoring ASCII case.
    ///
    /// When several participants share the name, the one that took it
    /// first wins.
    pub fn find_by_name(&self, name: &str) -> Option<Participant> {
        let id = self.names.get(&name.to_ascii_lowercase())?.first().copied()?;
        self.get(&id)
    }

    /// All online participants, sorted by display name.
    pub fn snapshot(&self) -> Vec<Participant> {
        let mut all: Vec<Participant> = self
            .participants
            .iter()
            .map(|p| p.value().clone())
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        all
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn index(&self, name: &str, id: &ParticipantId) {
        let mut ids = self.names.entry(name.to_ascii_lowercase()).or_default();
        if !ids.contains(id) {
            ids.push(*id);
        }
    }

    fn unindex(&self, name: &str, id: &ParticipantId) {
        if let Entry::Occupied(mut entry) = self.names.entry(name.to_ascii_lowercase()) {
            entry.get_mut().retain(|indexed| indexed != id);
            if entry.get().is_empty() {
                entry.remove();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_and_find_case_insensitive() {
        let roster = Roster::new();
        let id = ParticipantId::random();
        roster.join(Participant::new(id, "Steve"));

        assert_eq!(roster.find_by_name("steve").map(|p| p.id), Some(id));
        assert_eq!(roster.find_by_name("STEVE").map(|p| p.id), Some(id));
        assert!(roster.find_by_name("Stev").is_none());
    }

    #[test]
    fn test_leave_removes_index() {
        let roster = Roster::new();
        let id = ParticipantId::random();
        roster.join(Participant::new(id, "Alex"));

        assert!(roster.leave(&id).is_some());
        assert!(roster.find_by_name("Alex").is_none());
        assert!(roster.is_empty());
        assert!(roster.leave(&id).is_none());
    }

    #[test]
    fn test_rename_moves_index() {
        let roster = Roster::new();
        let id = ParticipantId::random();
        roster.join(Participant::new(id, "Alex"));

        assert!(roster.rename(&id, "Alexandra"));
        assert!(roster.find_by_name("Alex").is_none());
        assert_eq!(roster.get(&id).unwrap().name, "Alexandra");
        assert!(!roster.rename(&ParticipantId::random(), "Nobody"));
    }

    #[test]
    fn test_leave_keeps_index_of_namesake() {
        let roster = Roster::new();
        let first = ParticipantId::random();
        let second = ParticipantId::random();
        roster.join(Participant::new(first, "Sam"));
        roster.join(Participant::new(second, "Sam"));

        roster.leave(&first);
        assert_eq!(roster.find_by_name("Sam").map(|p| p.id), Some(second));
    }

    #[test]
    fn test_later_namesake_leaving_keeps_first() {
        let roster = Roster::new();
        let first = ParticipantId::random();
        let second = ParticipantId::random();
        roster.join(Participant::new(first, "Sam"));
        roster.join(Participant::new(second, "sam"));

        assert_eq!(roster.find_by_name("Sam").map(|p| p.id), Some(first));
        roster.leave(&second);
        assert_eq!(roster.find_by_name("Sam").map(|p| p.id), Some(first));
        roster.leave(&first);
        assert!(roster.find_by_name("Sam").is_none());
    }

    #[test]
    fn test_rename_onto_taken_name_keeps_both_findable() {
        let roster = Roster::new();
        let sam = ParticipantId::random();
        let alex = ParticipantId::random();
        roster.join(Participant::new(sam, "Sam"));
        roster.join(Participant::new(alex, "Alex"));

        assert!(roster.rename(&alex, "Sam"));
        assert!(roster.find_by_name("Alex").is_none());
        assert!(roster.rename(&alex, "Alex"));
        assert_eq!(roster.find_by_name("Sam").map(|p| p.id), Some(sam));
        assert_eq!(roster.find_by_name("Alex").map(|p| p.id), Some(alex));
    }

    #[test]
    fn test_snapshot_sorted_by_name() {
        let roster = Roster::new();
        roster.join(Participant::new(ParticipantId::random(), "Zed"));
        roster.join(Participant::new(ParticipantId::random(), "Amy"));

        let names: Vec<String> = roster.snapshot().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
    }
}
