//! Opt-out registry: participants who refuse pings.
//!
//! Membership only changes through [`OptOutRegistry::toggle`]. The set is
//! persisted as a plain text file with one participant id per line, no
//! header. Loading skips (and warns about) lines that are not valid ids;
//! saving writes ids sorted so the file is deterministic.

use crate::error::PersistenceError;
use crate::state::ParticipantId;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Thread-safe set of opted-out participants.
#[derive(Debug, Default)]
pub struct OptOutRegistry {
    blocked: DashMap<ParticipantId, ()>,
}

impl OptOutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` has opted out.
    #[inline]
    pub fn is_opted_out(&self, id: &ParticipantId) -> bool {
        self.blocked.contains_key(id)
    }

    /// Flip membership for `id`, returning the new state (`true` = opted out).
    pub fn toggle(&self, id: &ParticipantId) -> bool {
        let opted_out = match self.blocked.entry(*id) {
            Entry::Occupied(entry) => {
                entry.remove();
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(());
                true
            }
        };
        debug!(participant = %id, opted_out, "opt-out toggled");
        opted_out
    }

    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// All opted-out ids, sorted.
    pub fn snapshot(&self) -> Vec<ParticipantId> {
        let mut ids: Vec<ParticipantId> = self.blocked.iter().map(|e| *e.key()).collect();
        ids.sort();
        ids
    }

    /// Replace the contents with the ids read from `reader`.
    ///
    /// Blank lines are ignored; malformed lines, including ones that are
    /// not valid UTF-8, are skipped with a warning. Returns the number of
    /// ids loaded.
    pub fn read_from<R: BufRead>(&self, reader: R) -> io::Result<usize> {
        let mut loaded = Vec::new();
        for (index, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            let line = String::from_utf8_lossy(&line);
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match trimmed.parse::<ParticipantId>() {
                Ok(id) => loaded.push(id),
                Err(e) => {
                    warn!(line = index + 1, value = %trimmed, error = %e, "Skipping invalid participant id in opt-out list");
                }
            }
        }

        self.blocked.clear();
        for id in loaded {
            self.blocked.insert(id, ());
        }
        Ok(self.blocked.len())
    }

    /// Write every id, sorted, one per line.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for id in self.snapshot() {
            writeln!(writer, "{id}")?;
        }
        writer.flush()
    }

    /// Load the registry from `path`.
    ///
    /// A missing file is not an error: the registry is emptied and
    /// `Ok(0)` returned. On a read error the in-memory set is left as it
    /// was.
    pub fn load(&self, path: &Path) -> Result<usize, PersistenceError> {
        if !path.exists() {
            info!(path = %path.display(), "Opt-out list not found, starting empty");
            self.blocked.clear();
            return Ok(0);
        }

        let read_err = |source| PersistenceError::Read {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(read_err)?;
        let count = self.read_from(BufReader::new(file)).map_err(read_err)?;

        info!(path = %path.display(), count, "Opt-out list loaded");
        Ok(count)
    }

    /// Save the registry to `path`.
    ///
    /// Uses atomic write (temp file + rename) to prevent corruption and
    /// creates the parent directory when missing.
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let write_err = |source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        // Write to temp file first
        let temp_path = path.with_extension("lst.tmp");
        let file = File::create(&temp_path).map_err(write_err)?;
        self.write_to(BufWriter::new(file)).map_err(write_err)?;

        // Atomic rename
        fs::rename(&temp_path, path).map_err(write_err)?;

        debug!(path = %path.display(), count = self.len(), "Opt-out list saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Cursor;

    const A: &str = "00000000-0000-4000-8000-00000000000a";
    const B: &str = "00000000-0000-4000-8000-00000000000b";
    const C: &str = "00000000-0000-4000-8000-00000000000c";

    fn id(s: &str) -> ParticipantId {
        s.parse().unwrap()
    }

    #[test]
    fn test_toggle_is_a_pure_flip() {
        let registry = OptOutRegistry::new();
        let p = ParticipantId::random();
        let original = registry.is_opted_out(&p);

        let first = registry.toggle(&p);
        assert_eq!(first, registry.is_opted_out(&p));
        assert_ne!(first, original);

        let second = registry.toggle(&p);
        assert_eq!(second, registry.is_opted_out(&p));
        assert_eq!(registry.is_opted_out(&p), original);
    }

    #[test]
    fn test_toggle_never_duplicates() {
        let registry = OptOutRegistry::new();
        let p = ParticipantId::random();
        for _ in 0..5 {
            registry.toggle(&p);
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_read_skips_malformed_lines() {
        let registry = OptOutRegistry::new();
        let input = format!("{A}\nnot-a-uuid\n\n{B}\n   \n{C}");
        let count = registry.read_from(Cursor::new(input)).unwrap();

        assert_eq!(count, 3);
        assert!(registry.is_opted_out(&id(A)));
        assert!(registry.is_opted_out(&id(B)));
        assert!(registry.is_opted_out(&id(C)));
    }

    #[test]
    fn test_read_skips_non_utf8_lines() {
        let registry = OptOutRegistry::new();
        let mut input = format!("{A}\n").into_bytes();
        input.extend_from_slice(b"\xff\xfe garbage\n");
        input.extend_from_slice(format!("{B}\r\n").as_bytes());

        assert_eq!(registry.read_from(Cursor::new(input)).unwrap(), 2);
        assert_eq!(registry.snapshot(), vec![id(A), id(B)]);
    }

    #[test]
    fn test_read_replaces_contents() {
        let registry = OptOutRegistry::new();
        registry.toggle(&id(A));
        registry.read_from(Cursor::new(format!("{B}\n"))).unwrap();

        assert!(!registry.is_opted_out(&id(A)));
        assert!(registry.is_opted_out(&id(B)));
    }

    #[test]
    fn test_write_is_sorted() {
        let registry = OptOutRegistry::new();
        registry.toggle(&id(C));
        registry.toggle(&id(A));
        registry.toggle(&id(B));

        let mut out = Vec::new();
        registry.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{A}\n{B}\n{C}\n"));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("blocked_pings.lst");

        let registry = OptOutRegistry::new();
        for s in [A, B, C] {
            registry.toggle(&id(s));
        }
        registry.save(&path).unwrap();

        let fresh = OptOutRegistry::new();
        assert_eq!(fresh.load(&path).unwrap(), 3);
        let loaded: HashSet<_> = fresh.snapshot().into_iter().collect();
        let expected: HashSet<_> = [A, B, C].into_iter().map(id).collect();
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_load_ignores_line_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocked_pings.lst");
        fs::write(&path, format!("{C}\n{A}\n{B}\n")).unwrap();

        let registry = OptOutRegistry::new();
        registry.load(&path).unwrap();
        assert_eq!(registry.snapshot(), vec![id(A), id(B), id(C)]);
    }

    #[test]
    fn test_load_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = OptOutRegistry::new();
        registry.toggle(&id(A));

        let count = registry.load(&dir.path().join("missing.lst")).unwrap();
        assert_eq!(count, 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_save_failure_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = dir.path().join("blocked_pings.lst");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupant"), "x").unwrap();

        let registry = OptOutRegistry::new();
        registry.toggle(&id(A));
        let err = registry.save(&path).unwrap_err();
        assert!(matches!(err, PersistenceError::Write { .. }));
        assert!(registry.is_opted_out(&id(A)));
    }
}
