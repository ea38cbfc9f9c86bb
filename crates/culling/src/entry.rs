use catalog::PhotoRecord;
use serde::{Deserialize, Serialize};

/// A dedup-surviving candidate.
///
/// Records sharing a content hash across sources collapse into one `Merged`
/// entry: the highest-priority member becomes the primary, the rest stay
/// reachable as secondaries. Records without a content hash never merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CulledEntry {
    Single(PhotoRecord),
    Merged {
        primary: PhotoRecord,
        secondaries: Vec<PhotoRecord>,
    },
}

impl CulledEntry {
    pub fn primary(&self) -> &PhotoRecord {
        match self {
            CulledEntry::Single(record) => record,
            CulledEntry::Merged { primary, .. } => primary,
        }
    }

    pub fn secondaries(&self) -> &[PhotoRecord] {
        match self {
            CulledEntry::Single(_) => &[],
            CulledEntry::Merged { secondaries, .. } => secondaries,
        }
    }

    /// Number of source records behind this entry (primary + secondaries).
    pub fn record_count(&self) -> usize {
        1 + self.secondaries().len()
    }
}
