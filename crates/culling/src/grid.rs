use std::collections::{BTreeMap, BTreeSet};

use catalog::{PhotoRecord, SourceConfig, SourceId};
use foundation::geo::{GeoBounds, GeoPoint};
use serde::{Deserialize, Serialize};

use crate::entry::CulledEntry;

/// Cells per axis of the spatial partition.
pub const GRID_DIM: usize = 10;
/// Total cell count (10 × 10).
pub const CELL_COUNT: usize = GRID_DIM * GRID_DIM;

/// Position of a grid cell: row = latitude bucket, col = longitude bucket.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

/// One selected "photos in area" result, tagged with its originating cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaPhoto {
    pub entry: CulledEntry,
    pub cell: CellIndex,
}

/// Read-only coverage report for one culling call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageStats {
    /// Raw candidate count across all sources, before dedup.
    pub total_photos: usize,
    pub selected_photos: usize,
    /// Selected entries keyed by their primary record's source.
    pub per_source_counts: BTreeMap<SourceId, usize>,
    pub total_cells: usize,
    pub cells_with_selection: usize,
}

/// Viewport-driven spatial culling.
///
/// Fixes a 10×10 cell partition over the current bounds, dedups candidates
/// by content hash, and selects a bounded, cell-uniform working set via
/// row-major round-robin. Rebuilt from scratch for every viewport; there is
/// no persisted index.
///
/// Ordering contract: identical inputs produce identical ordered outputs.
#[derive(Debug, Clone)]
pub struct SpatialCullingGrid {
    bounds: GeoBounds,
    config: SourceConfig,
}

impl SpatialCullingGrid {
    pub fn new(bounds: GeoBounds, config: SourceConfig) -> Self {
        Self { bounds, config }
    }

    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    /// Cell containing `p`, by linear interpolation between the bounds'
    /// extremes. Indices clamp to [0, GRID_DIM), so points marginally
    /// outside the bounds land in the nearest edge cell instead of failing.
    pub fn cell_index(&self, p: GeoPoint) -> CellIndex {
        let (fy, fx) = self.bounds.fractional_position(p);
        let max = GRID_DIM as i64 - 1;
        let row = ((fy * GRID_DIM as f64).floor() as i64).clamp(0, max) as usize;
        let col = ((fx * GRID_DIM as f64).floor() as i64).clamp(0, max) as usize;
        CellIndex { row, col }
    }

    /// Select at most `max_total` entries: dedup by content hash, assign to
    /// cells, then visit cells in row-major round-robin taking the
    /// highest-priority remaining entry per cell per round.
    ///
    /// Round-robin means no single dense cluster can dominate the result;
    /// priority only orders choice within a cell, never across cells.
    pub fn cull_photos(
        &self,
        photos_per_source: &BTreeMap<SourceId, Vec<PhotoRecord>>,
        max_total: usize,
    ) -> Vec<AreaPhoto> {
        if max_total == 0 || photos_per_source.is_empty() {
            return Vec::new();
        }

        let entries = self.dedup(photos_per_source);

        // Per-cell candidate buckets, ordered best-priority-first.
        let mut cells: Vec<Vec<usize>> = vec![Vec::new(); CELL_COUNT];
        for (idx, entry) in entries.iter().enumerate() {
            let cell = self.cell_index(entry.primary().position());
            cells[cell.row * GRID_DIM + cell.col].push(idx);
        }
        for bucket in &mut cells {
            bucket.sort_by(|&a, &b| {
                self.config
                    .priority_key(entries[a].primary())
                    .cmp(&self.config.priority_key(entries[b].primary()))
            });
        }

        let mut cursors = vec![0usize; CELL_COUNT];
        let mut selected = Vec::new();
        loop {
            let mut took_any = false;
            for (flat, bucket) in cells.iter().enumerate() {
                if selected.len() == max_total {
                    return selected;
                }
                let cursor = &mut cursors[flat];
                if *cursor >= bucket.len() {
                    continue;
                }
                let idx = bucket[*cursor];
                *cursor += 1;
                selected.push(AreaPhoto {
                    entry: entries[idx].clone(),
                    cell: CellIndex {
                        row: flat / GRID_DIM,
                        col: flat % GRID_DIM,
                    },
                });
                took_any = true;
            }
            if !took_any {
                return selected;
            }
        }
    }

    /// Group candidates by content hash and collapse each group into one
    /// entry, keeping arrival order: a merged group is emitted at the
    /// position of its first-arriving member.
    fn dedup(&self, photos_per_source: &BTreeMap<SourceId, Vec<PhotoRecord>>) -> Vec<CulledEntry> {
        let all: Vec<&PhotoRecord> = photos_per_source.values().flatten().collect();

        let mut by_hash: BTreeMap<&str, Vec<&PhotoRecord>> = BTreeMap::new();
        for record in &all {
            if let Some(hash) = record.content_hash.as_deref() {
                by_hash.entry(hash).or_default().push(record);
            }
        }

        let mut emitted: BTreeSet<&str> = BTreeSet::new();
        let mut entries = Vec::new();
        for record in &all {
            let Some(hash) = record.content_hash.as_deref() else {
                entries.push(CulledEntry::Single((*record).clone()));
                continue;
            };
            if !emitted.insert(hash) {
                continue;
            }
            let mut group = by_hash[hash].clone();
            group.sort_by(|a, b| self.config.priority_key(a).cmp(&self.config.priority_key(b)));
            if group.len() == 1 {
                entries.push(CulledEntry::Single(group[0].clone()));
            } else {
                entries.push(CulledEntry::Merged {
                    primary: group[0].clone(),
                    secondaries: group[1..].iter().map(|r| (*r).clone()).collect(),
                });
            }
        }
        entries
    }

    /// Pure coverage report; does not affect future calls.
    pub fn coverage_stats(
        &self,
        photos_per_source: &BTreeMap<SourceId, Vec<PhotoRecord>>,
        culled: &[AreaPhoto],
    ) -> CoverageStats {
        let mut per_source_counts: BTreeMap<SourceId, usize> = BTreeMap::new();
        let mut cells_with_selection = BTreeSet::new();
        for photo in culled {
            *per_source_counts
                .entry(photo.entry.primary().source.clone())
                .or_insert(0) += 1;
            cells_with_selection.insert(photo.cell);
        }

        CoverageStats {
            total_photos: photos_per_source.values().map(Vec::len).sum(),
            selected_photos: culled.len(),
            per_source_counts,
            total_cells: CELL_COUNT,
            cells_with_selection: cells_with_selection.len(),
        }
    }
}
