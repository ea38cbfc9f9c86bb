use std::collections::BTreeMap;

use catalog::{PhotoRecord, SourceId};

/// Immutable collection of per-source fetch results.
///
/// Source fetches run concurrently and complete in any order; the grid must
/// only ever see a complete snapshot, never a partial delivery, or
/// source-priority dedup breaks. The builder is the single collection
/// point; once finished, the snapshot never changes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SourceSnapshot {
    photos: BTreeMap<SourceId, Vec<PhotoRecord>>,
}

impl SourceSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn photos_per_source(&self) -> &BTreeMap<SourceId, Vec<PhotoRecord>> {
        &self.photos
    }

    pub fn total_photos(&self) -> usize {
        self.photos.values().map(Vec::len).sum()
    }

    pub fn source_count(&self) -> usize {
        self.photos.len()
    }
}

/// Accumulates out-of-order source completions into one snapshot.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    photos: BTreeMap<SourceId, Vec<PhotoRecord>>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one source's complete result list. A second delivery for the
    /// same source replaces the first.
    pub fn insert(&mut self, source: impl Into<SourceId>, records: Vec<PhotoRecord>) -> &mut Self {
        self.photos.insert(source.into(), records);
        self
    }

    pub fn finish(self) -> SourceSnapshot {
        SourceSnapshot {
            photos: self.photos,
        }
    }
}

#[cfg(test)]
mod tests {
    use catalog::PhotoRecord;
    use pretty_assertions::assert_eq;

    use super::SnapshotBuilder;

    fn record(id: &str, source: &str) -> PhotoRecord {
        PhotoRecord::new(id, source, 1.0, 2.0, 0.0)
    }

    #[test]
    fn completion_order_does_not_change_the_snapshot() {
        let mut forward = SnapshotBuilder::new();
        forward.insert("device", vec![record("a", "device")]);
        forward.insert("hillview", vec![record("b", "hillview")]);

        let mut reversed = SnapshotBuilder::new();
        reversed.insert("hillview", vec![record("b", "hillview")]);
        reversed.insert("device", vec![record("a", "device")]);

        assert_eq!(forward.finish(), reversed.finish());
    }

    #[test]
    fn re_delivery_replaces_the_source_list() {
        let mut builder = SnapshotBuilder::new();
        builder.insert("hillview", vec![record("stale", "hillview")]);
        builder.insert("hillview", vec![record("fresh", "hillview")]);

        let snapshot = builder.finish();
        assert_eq!(snapshot.total_photos(), 1);
        assert_eq!(snapshot.photos_per_source()["hillview"][0].id, "fresh");
    }

    #[test]
    fn counts_cover_all_sources() {
        let mut builder = SnapshotBuilder::new();
        builder.insert("device", vec![record("a", "device"), record("b", "device")]);
        builder.insert("mapillary", vec![record("c", "mapillary")]);

        let snapshot = builder.finish();
        assert_eq!(snapshot.total_photos(), 3);
        assert_eq!(snapshot.source_count(), 2);
    }
}
