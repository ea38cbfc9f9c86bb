use foundation::bearing::normalize_deg;
use foundation::geo::{GeoPoint, haversine_m};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entry::CulledEntry;
use crate::grid::AreaPhoto;

/// Number of bearing sectors on the compass circle.
pub const SECTOR_COUNT: usize = 36;
/// Width of one sector in degrees.
pub const SECTOR_WIDTH_DEG: f64 = 10.0;

/// Sector containing `bearing_deg` after normalization to [0, 360).
pub fn sector_index(bearing_deg: f64) -> usize {
    ((normalize_deg(bearing_deg) / SECTOR_WIDTH_DEG).floor() as usize) % SECTOR_COUNT
}

/// One selected "photos in range" result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangePhoto {
    pub entry: CulledEntry,
    /// Great-circle distance from the range request's center, meters.
    pub range_distance_m: f64,
    pub sector: usize,
}

/// Read-only angular coverage report for one culling call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngularStats {
    pub total_in_range: usize,
    pub selected: usize,
    /// Sectors that received at least one selection.
    pub covered_sectors: usize,
    pub total_sectors: usize,
    /// Selection count per sector, keyed by sector index.
    pub per_sector_counts: BTreeMap<usize, usize>,
}

/// Direction-uniform culling for the look-around view.
///
/// Filters candidates to a radius around a center point, buckets survivors
/// into 36 bearing sectors, and selects round-robin across sectors so one
/// crowded direction cannot starve the others: if any photos exist in a
/// direction, one is admitted before any direction's second photo.
///
/// Ordering contract: output is in selection order (round-major,
/// sector-minor); identical inputs produce identical ordered outputs.
pub struct AngularRangeCuller;

impl AngularRangeCuller {
    /// Select at most `max_photos` candidates within `range_m` of `center`,
    /// tagged with their distance and sector.
    pub fn cull_photos_in_range(
        candidates: &[AreaPhoto],
        center: GeoPoint,
        range_m: f64,
        max_photos: usize,
    ) -> Vec<RangePhoto> {
        if max_photos == 0 || candidates.is_empty() {
            return Vec::new();
        }

        let in_range = Self::filter_in_range(candidates, center, range_m);

        // Sector buckets hold indices into `in_range`, arrival order.
        let mut sectors: Vec<Vec<usize>> = vec![Vec::new(); SECTOR_COUNT];
        for (idx, (_, _, sector)) in in_range.iter().enumerate() {
            sectors[*sector].push(idx);
        }
        let mut active: Vec<usize> = (0..SECTOR_COUNT)
            .filter(|&s| !sectors[s].is_empty())
            .collect();

        let mut selected = Vec::new();
        let mut round = 0usize;
        while !active.is_empty() && selected.len() < max_photos {
            let mut i = 0;
            while i < active.len() && selected.len() < max_photos {
                let sector = active[i];
                match sectors[sector].get(round) {
                    Some(&idx) => {
                        let (candidate, distance, _) = &in_range[idx];
                        selected.push(RangePhoto {
                            entry: candidate.entry.clone(),
                            range_distance_m: *distance,
                            sector,
                        });
                        i += 1;
                    }
                    None => {
                        // Exhausted sector: overwrite with the last active
                        // sector, which has not been visited this round yet.
                        active.swap_remove(i);
                    }
                }
            }
            round += 1;
        }
        selected
    }

    /// Pure angular coverage report; does not affect future calls.
    pub fn angular_stats(
        candidates: &[AreaPhoto],
        culled: &[RangePhoto],
        center: GeoPoint,
        range_m: f64,
    ) -> AngularStats {
        let mut per_sector_counts: BTreeMap<usize, usize> = BTreeMap::new();
        for photo in culled {
            *per_sector_counts.entry(photo.sector).or_insert(0) += 1;
        }

        AngularStats {
            total_in_range: Self::filter_in_range(candidates, center, range_m).len(),
            selected: culled.len(),
            covered_sectors: per_sector_counts.len(),
            total_sectors: SECTOR_COUNT,
            per_sector_counts,
        }
    }

    fn filter_in_range(
        candidates: &[AreaPhoto],
        center: GeoPoint,
        range_m: f64,
    ) -> Vec<(AreaPhoto, f64, usize)> {
        candidates
            .iter()
            .filter_map(|candidate| {
                let record = candidate.entry.primary();
                let distance = haversine_m(center, record.position());
                if distance > range_m {
                    return None;
                }
                let sector = sector_index(record.bearing_deg);
                Some((candidate.clone(), distance, sector))
            })
            .collect()
    }
}
