use std::collections::BTreeMap;

/// Update/processed counters for one pipeline stage.
///
/// Invariant: the stage has pending work iff `last_update_id > last_processed_id`.
/// Both counters only ever grow.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct WorkItem {
    pub last_update_id: u64,
    pub last_processed_id: u64,
}

impl WorkItem {
    pub fn has_pending_work(&self) -> bool {
        self.last_update_id > self.last_processed_id
    }
}

/// Per-stage dirty tracking that gates redundant recomputation.
///
/// The key set is fixed at construction. Referencing a key that was not
/// supplied at construction is a programming error and panics immediately;
/// keys are never created implicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyWorkTracker {
    items: BTreeMap<String, WorkItem>,
}

impl DirtyWorkTracker {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let items = keys
            .into_iter()
            .map(|k| (k.into(), WorkItem::default()))
            .collect();
        Self { items }
    }

    fn item(&self, key: &str) -> &WorkItem {
        match self.items.get(key) {
            Some(item) => item,
            None => panic!("unknown pipeline stage key: {key}"),
        }
    }

    fn item_mut(&mut self, key: &str) -> &mut WorkItem {
        match self.items.get_mut(key) {
            Some(item) => item,
            None => panic!("unknown pipeline stage key: {key}"),
        }
    }

    /// Record that upstream input for `key` changed.
    pub fn mark_updated(&mut self, key: &str) {
        let item = self.item_mut(key);
        item.last_update_id += 1;
    }

    /// Record that `key` was processed against its latest update.
    pub fn mark_processed(&mut self, key: &str) {
        let item = self.item_mut(key);
        item.last_processed_id = item.last_update_id;
    }

    pub fn has_pending_work(&self, key: &str) -> bool {
        self.item(key).has_pending_work()
    }

    /// All keys with pending work, in stable (sorted) order.
    pub fn pending_keys(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|(_, item)| item.has_pending_work())
            .map(|(key, _)| key.as_str())
            .collect()
    }

    pub fn work_item(&self, key: &str) -> WorkItem {
        *self.item(key)
    }
}

#[cfg(test)]
mod tests {
    use super::DirtyWorkTracker;

    #[test]
    fn fresh_tracker_has_no_pending_work() {
        let tracker = DirtyWorkTracker::new(["area", "range"]);
        assert!(!tracker.has_pending_work("area"));
        assert!(!tracker.has_pending_work("range"));
        assert!(tracker.pending_keys().is_empty());
    }

    #[test]
    fn update_then_process_clears_pending() {
        let mut tracker = DirtyWorkTracker::new(["area", "range"]);
        tracker.mark_updated("area");
        assert!(tracker.has_pending_work("area"));
        assert_eq!(tracker.pending_keys(), vec!["area"]);

        tracker.mark_processed("area");
        assert!(!tracker.has_pending_work("area"));
    }

    #[test]
    fn repeated_updates_coalesce_into_one_pending_pass() {
        let mut tracker = DirtyWorkTracker::new(["area"]);
        tracker.mark_updated("area");
        tracker.mark_updated("area");
        tracker.mark_updated("area");
        assert_eq!(tracker.work_item("area").last_update_id, 3);

        tracker.mark_processed("area");
        assert!(!tracker.has_pending_work("area"));
        assert_eq!(tracker.work_item("area").last_processed_id, 3);
    }

    #[test]
    fn pending_keys_are_sorted() {
        let mut tracker = DirtyWorkTracker::new(["range", "area"]);
        tracker.mark_updated("range");
        tracker.mark_updated("area");
        assert_eq!(tracker.pending_keys(), vec!["area", "range"]);
    }

    #[test]
    #[should_panic(expected = "unknown pipeline stage key: bearings")]
    fn unknown_key_on_update_is_fatal() {
        let mut tracker = DirtyWorkTracker::new(["area"]);
        tracker.mark_updated("bearings");
    }

    #[test]
    #[should_panic(expected = "unknown pipeline stage key: bearings")]
    fn unknown_key_on_query_is_fatal() {
        let tracker = DirtyWorkTracker::new(["area"]);
        tracker.has_pending_work("bearings");
    }
}
