//! Favorites store.
//!
//! Fingerprint-keyed map of saved idiom records. Membership order is the
//! order idioms were saved in, which is also the display order. Favoriting
//! never touches the cache or the seen-set.

use std::collections::HashMap;

use tracing::debug;

use crate::fingerprint::Fingerprint;
use crate::types::IdiomRecord;

/// Saved idioms: insertion-ordered membership plus full record snapshots.
#[derive(Debug, Clone, Default)]
pub struct Favorites {
    /// Fingerprints in the order they were saved
    order: Vec<Fingerprint>,
    /// Snapshot of the full record at save time
    records: HashMap<Fingerprint, IdiomRecord>,
}

impl Favorites {
    /// Rebuild from persisted membership + record map.
    ///
    /// Membership entries with no stored record are dropped rather than
    /// resurfacing as empty cards.
    pub fn from_parts(order: Vec<String>, records: HashMap<String, IdiomRecord>) -> Self {
        let mut favorites = Self::default();
        for raw in order {
            let fp = Fingerprint::from_raw(raw);
            if let Some(record) = records.get(fp.as_str()) {
                favorites.order.push(fp.clone());
                favorites.records.insert(fp, record.clone());
            } else {
                debug!(fingerprint = %fp, "Dropping favorite with no stored record");
            }
        }
        favorites
    }

    /// Toggle favorite status for a record. Returns true if it is now saved.
    ///
    /// Saving stores a snapshot of the full record; unsaving removes both
    /// the membership and the snapshot.
    pub fn toggle(&mut self, record: &IdiomRecord) -> bool {
        let fp = record.fingerprint();
        if self.records.remove(&fp).is_some() {
            self.order.retain(|f| f != &fp);
            false
        } else {
            self.order.push(fp.clone());
            self.records.insert(fp, record.clone());
            true
        }
    }

    /// Whether a fingerprint is currently saved.
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.records.contains_key(fingerprint)
    }

    /// Saved records in the order they were saved.
    pub fn list(&self) -> Vec<&IdiomRecord> {
        self.order.iter().filter_map(|fp| self.records.get(fp)).collect()
    }

    /// Number of saved idioms.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is saved.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Membership fingerprint strings for persistence, in saved order.
    pub fn membership(&self) -> Vec<String> {
        self.order.iter().map(|fp| fp.as_str().to_string()).collect()
    }

    /// Fingerprint→record snapshots for persistence.
    pub fn snapshots(&self) -> HashMap<String, IdiomRecord> {
        self.records
            .iter()
            .map(|(fp, record)| (fp.as_str().to_string(), record.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(idiom: &str) -> IdiomRecord {
        IdiomRecord {
            id: format!("id-{idiom}"),
            language_code: "xx".to_string(),
            language_name: "Test".to_string(),
            idiom: idiom.to_string(),
            meaning_en: "meaning".to_string(),
            example_native: "example".to_string(),
            example_en: "example".to_string(),
            transliteration: None,
            origin: None,
        }
    }

    #[test]
    fn test_toggle_saves_and_removes() {
        let mut favorites = Favorites::default();
        let r = record("first");

        assert!(favorites.toggle(&r));
        assert!(favorites.contains(&r.fingerprint()));
        assert_eq!(favorites.len(), 1);

        assert!(!favorites.toggle(&r));
        assert!(!favorites.contains(&r.fingerprint()));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let mut favorites = Favorites::default();
        favorites.toggle(&record("kept"));

        let before_membership = favorites.membership();
        let before_snapshots = favorites.snapshots();

        let r = record("toggled");
        favorites.toggle(&r);
        favorites.toggle(&r);

        assert_eq!(favorites.membership(), before_membership);
        assert_eq!(favorites.snapshots(), before_snapshots);
    }

    #[test]
    fn test_list_preserves_save_order() {
        let mut favorites = Favorites::default();
        favorites.toggle(&record("a"));
        favorites.toggle(&record("b"));
        favorites.toggle(&record("c"));
        favorites.toggle(&record("b")); // remove the middle one

        let idioms: Vec<&str> = favorites.list().iter().map(|r| r.idiom.as_str()).collect();
        assert_eq!(idioms, vec!["a", "c"]);
    }

    #[test]
    fn test_same_fingerprint_different_id_is_same_favorite() {
        let mut favorites = Favorites::default();
        let mut regenerated = record("shared");
        favorites.toggle(&record("shared"));

        regenerated.id = "different-id".to_string();
        // toggling the regenerated copy removes the original save
        assert!(!favorites.toggle(&regenerated));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_from_parts_drops_dangling_membership() {
        let r = record("present");
        let mut records = HashMap::new();
        records.insert(r.fingerprint().as_str().to_string(), r.clone());

        let favorites = Favorites::from_parts(
            vec![
                r.fingerprint().as_str().to_string(),
                "xxghostidiom".to_string(),
            ],
            records,
        );
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites.list()[0].idiom, "present");
    }
}
