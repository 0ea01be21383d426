//! Mention scanner.
//!
//! Finds recipients whose exact display name appears as a space-delimited
//! token in a chat message. Matching is case-sensitive whole-token
//! equality; there is no punctuation stripping or substring search.
//!
//! # Hot Path
//!
//! Chat runs this once per message against every recipient, so tokens are
//! first pruned by length: only tokens whose character count falls inside
//! the `[shortest, longest]` name range are compared against names.

use crate::state::{Participant, ParticipantId};
use std::collections::HashSet;

/// Token delimiter. Display names never contain it.
const DELIMITER: char = ' ';

/// Inclusive range of candidate name lengths, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NameBounds {
    shortest: usize,
    longest: usize,
}

impl NameBounds {
    fn of(candidates: &[Participant]) -> Option<Self> {
        let mut lengths = candidates.iter().map(|c| c.name.chars().count());
        let first = lengths.next()?;
        let (shortest, longest) =
            lengths.fold((first, first), |(lo, hi), len| (lo.min(len), hi.max(len)));
        Some(Self { shortest, longest })
    }

    #[inline]
    fn admits(&self, token: &str) -> bool {
        // Byte length bounds the char count from above; cheap reject first.
        if token.len() < self.shortest {
            return false;
        }
        let len = token.chars().count();
        len >= self.shortest && len <= self.longest
    }
}

/// Find the candidates mentioned in `message`.
///
/// Returns matched candidates in candidate order, each at most once. Two
/// candidates sharing a display name are both returned when that name
/// appears.
pub fn scan<'a>(message: &str, candidates: &'a [Participant]) -> Vec<&'a Participant> {
    let Some(bounds) = NameBounds::of(candidates) else {
        return Vec::new();
    };

    let mut matched: HashSet<ParticipantId> = HashSet::new();
    for token in message.split(DELIMITER) {
        if !bounds.admits(token) {
            continue;
        }
        for candidate in candidates.iter().filter(|c| c.name == token) {
            matched.insert(candidate.id);
        }
    }

    if matched.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::with_capacity(matched.len());
    candidates
        .iter()
        .filter(|c| matched.contains(&c.id) && seen.insert(c.id))
        .collect()
}
