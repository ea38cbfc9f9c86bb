use catalog::SourceConfig;
use culling::{
    AngularRangeCuller, AngularStats, AreaPhoto, CoverageStats, RangePhoto, SpatialCullingGrid,
};
use foundation::geo::{GeoBounds, GeoPoint};
use runtime::{DirtyWorkTracker, Generation, GenerationGate};
use tracing::debug;

use crate::snapshot::SourceSnapshot;

/// Stage key for the viewport ("photos in area") cull.
pub const STAGE_PHOTOS_IN_AREA: &str = "photos_in_area";
/// Stage key for the look-around ("photos in range") cull.
pub const STAGE_PHOTOS_IN_RANGE: &str = "photos_in_range";

/// Default cap for the viewport working set.
pub const DEFAULT_MAX_AREA_PHOTOS: usize = 250;

/// Look-around request: center, radius, and result cap.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RangeRequest {
    pub center: GeoPoint,
    pub range_m: f64,
    pub max_photos: usize,
}

/// What a `refresh` call actually did.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RefreshSummary {
    pub area_ran: bool,
    pub range_ran: bool,
    pub area_selected: usize,
    pub range_selected: usize,
}

/// Dirty-driven orchestration of the two culling stages.
///
/// Owns the explicit inputs (bounds, source snapshot, range request) and the
/// cached outputs of both stages. `refresh` re-runs exactly the stages whose
/// inputs changed since they last ran, area before range. All state is
/// explicit; calls for one logical pipeline must be serialized by the
/// caller (message-passing boundary, no internal synchronization).
#[derive(Debug)]
pub struct CullingPipeline {
    config: SourceConfig,
    tracker: DirtyWorkTracker,
    gate: GenerationGate,
    max_area_photos: usize,

    bounds: Option<GeoBounds>,
    snapshot: SourceSnapshot,
    range_request: Option<RangeRequest>,

    photos_in_area: Vec<AreaPhoto>,
    photos_in_range: Vec<RangePhoto>,
    coverage_stats: Option<CoverageStats>,
    angular_stats: Option<AngularStats>,
}

impl CullingPipeline {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            tracker: DirtyWorkTracker::new([STAGE_PHOTOS_IN_AREA, STAGE_PHOTOS_IN_RANGE]),
            gate: GenerationGate::new(),
            max_area_photos: DEFAULT_MAX_AREA_PHOTOS,
            bounds: None,
            snapshot: SourceSnapshot::empty(),
            range_request: None,
            photos_in_area: Vec::new(),
            photos_in_range: Vec::new(),
            coverage_stats: None,
            angular_stats: None,
        }
    }

    pub fn with_max_area_photos(mut self, max_area_photos: usize) -> Self {
        self.max_area_photos = max_area_photos;
        self
    }

    /// New viewport: both stages must re-run.
    pub fn set_bounds(&mut self, bounds: GeoBounds) {
        self.bounds = Some(bounds);
        self.tracker.mark_updated(STAGE_PHOTOS_IN_AREA);
        self.tracker.mark_updated(STAGE_PHOTOS_IN_RANGE);
    }

    /// New look-around view: only the range stage must re-run.
    pub fn set_range_request(&mut self, request: RangeRequest) {
        self.range_request = Some(request);
        self.tracker.mark_updated(STAGE_PHOTOS_IN_RANGE);
    }

    /// Start a fetch round; the returned generation travels with the fetch
    /// and is presented back via `deliver_snapshot`.
    pub fn begin_fetch(&mut self) -> Generation {
        self.gate.issue()
    }

    /// Accept a completed fetch round unless a newer one was already
    /// accepted. Returns `false` if the snapshot was stale and discarded.
    pub fn deliver_snapshot(&mut self, generation: Generation, snapshot: SourceSnapshot) -> bool {
        if !self.gate.accept(generation) {
            debug!(?generation, "discarding stale source snapshot");
            return false;
        }
        self.snapshot = snapshot;
        self.tracker.mark_updated(STAGE_PHOTOS_IN_AREA);
        self.tracker.mark_updated(STAGE_PHOTOS_IN_RANGE);
        true
    }

    /// Replace the snapshot unconditionally (single-fetcher callers).
    pub fn set_snapshot(&mut self, snapshot: SourceSnapshot) {
        let generation = self.gate.issue();
        let accepted = self.deliver_snapshot(generation, snapshot);
        debug_assert!(accepted);
    }

    /// Re-run exactly the dirty stages and mark them processed.
    pub fn refresh(&mut self) -> RefreshSummary {
        let mut summary = RefreshSummary::default();

        if self.tracker.has_pending_work(STAGE_PHOTOS_IN_AREA) {
            self.run_area_stage();
            summary.area_ran = true;
        }
        if self.tracker.has_pending_work(STAGE_PHOTOS_IN_RANGE) {
            self.run_range_stage();
            summary.range_ran = true;
        }

        summary.area_selected = self.photos_in_area.len();
        summary.range_selected = self.photos_in_range.len();
        summary
    }

    fn run_area_stage(&mut self) {
        match self.bounds {
            Some(bounds) => {
                let grid = SpatialCullingGrid::new(bounds, self.config.clone());
                let photos = self.snapshot.photos_per_source();
                self.photos_in_area = grid.cull_photos(photos, self.max_area_photos);
                self.coverage_stats = Some(grid.coverage_stats(photos, &self.photos_in_area));
                debug!(
                    stage = STAGE_PHOTOS_IN_AREA,
                    candidates = self.snapshot.total_photos(),
                    selected = self.photos_in_area.len(),
                    "culled photos in area"
                );
            }
            None => {
                // No viewport yet; nothing can be in area.
                self.photos_in_area.clear();
                self.coverage_stats = None;
            }
        }
        self.tracker.mark_processed(STAGE_PHOTOS_IN_AREA);
    }

    fn run_range_stage(&mut self) {
        match self.range_request {
            Some(request) => {
                self.photos_in_range = AngularRangeCuller::cull_photos_in_range(
                    &self.photos_in_area,
                    request.center,
                    request.range_m,
                    request.max_photos,
                );
                self.angular_stats = Some(AngularRangeCuller::angular_stats(
                    &self.photos_in_area,
                    &self.photos_in_range,
                    request.center,
                    request.range_m,
                ));
                debug!(
                    stage = STAGE_PHOTOS_IN_RANGE,
                    candidates = self.photos_in_area.len(),
                    selected = self.photos_in_range.len(),
                    "culled photos in range"
                );
            }
            None => {
                self.photos_in_range.clear();
                self.angular_stats = None;
            }
        }
        self.tracker.mark_processed(STAGE_PHOTOS_IN_RANGE);
    }

    pub fn pending_stages(&self) -> Vec<&str> {
        self.tracker.pending_keys()
    }

    pub fn photos_in_area(&self) -> &[AreaPhoto] {
        &self.photos_in_area
    }

    pub fn photos_in_range(&self) -> &[RangePhoto] {
        &self.photos_in_range
    }

    pub fn coverage_stats(&self) -> Option<&CoverageStats> {
        self.coverage_stats.as_ref()
    }

    pub fn angular_stats(&self) -> Option<&AngularStats> {
        self.angular_stats.as_ref()
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}
