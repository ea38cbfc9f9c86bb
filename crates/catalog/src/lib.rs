//! Photo record model and source configuration.
//!
//! Records arrive from per-source fetchers (device library, backend,
//! third-party street imagery) and are consumed read-only by the culling
//! pipeline. This crate defines:
//! - The wire-compatible `PhotoRecord` payload.
//! - The source priority order used for dedup and per-cell tie-breaks.

use std::collections::BTreeMap;

use foundation::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// Identifier of a photo source (e.g. `"device"`, `"hillview"`).
pub type SourceId = String;

/// Priority tier of a photo source. Lower tier wins.
///
/// The total order is fixed: device captures beat the primary backend,
/// which beats everything unclassified, which beats third-party imagery.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceTier {
    Device,
    Primary,
    Other,
    ThirdParty,
}

/// Explicit source configuration passed into the pipeline.
///
/// This replaces the ambient source registry of the surrounding app: the
/// pipeline reads priority only from this value, never from global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    enabled: Vec<SourceId>,
    tiers: BTreeMap<SourceId, SourceTier>,
}

impl Default for SourceConfig {
    /// The stock configuration: device library, the hillview backend, and
    /// mapillary street imagery, in priority order.
    fn default() -> Self {
        let mut config = Self::empty();
        config.enable("device", SourceTier::Device);
        config.enable("hillview", SourceTier::Primary);
        config.enable("mapillary", SourceTier::ThirdParty);
        config
    }
}

impl SourceConfig {
    pub fn empty() -> Self {
        Self {
            enabled: Vec::new(),
            tiers: BTreeMap::new(),
        }
    }

    /// Enable a source at the given tier. Insertion order defines the
    /// enabled-source list; re-enabling updates the tier in place.
    pub fn enable(&mut self, source: impl Into<SourceId>, tier: SourceTier) {
        let source = source.into();
        if !self.enabled.contains(&source) {
            self.enabled.push(source.clone());
        }
        self.tiers.insert(source, tier);
    }

    pub fn enabled_sources(&self) -> &[SourceId] {
        &self.enabled
    }

    pub fn is_enabled(&self, source: &str) -> bool {
        self.enabled.iter().any(|s| s == source)
    }

    /// Tier of a source. Sources never mentioned in the configuration rank
    /// as `Other`: above third-party imagery, below the primary backend.
    pub fn tier(&self, source: &str) -> SourceTier {
        self.tiers.get(source).copied().unwrap_or(SourceTier::Other)
    }

    /// Deterministic ordering key for a record: tier, then source id, then
    /// record id. Smaller keys win ties.
    pub fn priority_key<'a>(&self, record: &'a PhotoRecord) -> (SourceTier, &'a str, &'a str) {
        (self.tier(&record.source), &record.source, &record.id)
    }
}

/// A geotagged photo as delivered by a source fetcher.
///
/// The pipeline reads `id`, `source`, position, `bearing_deg` and
/// `content_hash`; everything else is opaque payload carried through to the
/// rendering layer. Computed values (range distance, cell/sector tags) live
/// on the culling output wrappers, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Unique within its source, not globally.
    pub id: String,
    pub source: SourceId,
    pub latitude: f64,
    pub longitude: f64,
    /// Compass bearing in degrees; any real value, normalized on use.
    pub bearing_deg: f64,
    /// Identifies visually-identical captures across sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl PhotoRecord {
    /// Minimal record for the fields the pipeline reads.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<SourceId>,
        latitude: f64,
        longitude: f64,
        bearing_deg: f64,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            latitude,
            longitude,
            bearing_deg,
            content_hash: None,
            captured_at_ms: None,
            thumb_url: None,
            width: None,
            height: None,
        }
    }

    pub fn with_content_hash(mut self, hash: impl Into<String>) -> Self {
        self.content_hash = Some(hash.into());
        self
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}
