//! Pairwise similarity between geometric signatures.
//!
//! The score is a fixed weighted sum of three ratio-based sub-scores:
//!
//! | property      | weight |
//! |---------------|--------|
//! | volume        | 0.5    |
//! | surface area  | 0.3    |
//! | bounding box  | 0.2    |
//!
//! Each sub-score lies in `[0, 1]`, so the total does too. Equal geometry
//! hashes short-circuit to `1.0`.

use serde::{Deserialize, Serialize};

use partdup_core::{BoundingBox, Signature};

/// Weight of the volume sub-score.
pub const VOLUME_WEIGHT: f64 = 0.5;
/// Weight of the surface area sub-score.
pub const AREA_WEIGHT: f64 = 0.3;
/// Weight of the bounding box sub-score.
pub const BBOX_WEIGHT: f64 = 0.2;

/// Zero-aware ratio of two non-negative quantities.
///
/// Two zeros are identical (`1.0`); a zero against a non-zero is maximally
/// dissimilar (`0.0`); otherwise `min / max`.
pub fn property_similarity(a: f64, b: f64) -> f64 {
    match (a == 0.0, b == 0.0) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => a.min(b) / a.max(b),
    }
}

/// Mean of the per-axis extent ratios of two bounding boxes.
pub fn bbox_similarity(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let (ea, eb) = (a.extents(), b.extents());
    let total: f64 = ea
        .iter()
        .zip(eb.iter())
        .map(|(&x, &y)| property_similarity(x, y))
        .sum();
    total / 3.0
}

/// Sub-scores behind a similarity value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityBreakdown {
    /// Whether the geometry hashes matched.
    pub hash_match: bool,
    /// Volume ratio.
    pub volume: f64,
    /// Surface area ratio.
    pub surface_area: f64,
    /// Mean bounding box extent ratio.
    pub bounding_box: f64,
    /// Final score, identical to [`SimilarityScorer::score`].
    pub total: f64,
}

/// Scores how alike two signatures are.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer;

impl SimilarityScorer {
    /// Create a new scorer.
    pub fn new() -> Self {
        Self
    }

    /// Similarity in `[0, 1]`. Symmetric in its arguments.
    pub fn score(&self, a: &Signature, b: &Signature) -> f64 {
        if a.geometric_hash == b.geometric_hash {
            return 1.0;
        }

        VOLUME_WEIGHT * property_similarity(a.volume, b.volume)
            + AREA_WEIGHT * property_similarity(a.surface_area, b.surface_area)
            + BBOX_WEIGHT * bbox_similarity(&a.bounding_box, &b.bounding_box)
    }

    /// Score with the individual sub-scores.
    ///
    /// Sub-scores are always computed, even on a hash match, so callers can
    /// see any numeric disagreement the hash overrides.
    pub fn score_breakdown(&self, a: &Signature, b: &Signature) -> SimilarityBreakdown {
        SimilarityBreakdown {
            hash_match: a.geometric_hash == b.geometric_hash,
            volume: property_similarity(a.volume, b.volume),
            surface_area: property_similarity(a.surface_area, b.surface_area),
            bounding_box: bbox_similarity(&a.bounding_box, &b.bounding_box),
            total: self.score(a, b),
        }
    }
}
