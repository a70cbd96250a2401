//! Monetization heuristics.
//!
//! The CPM band is a fixed plausible range, not derived from ad-auction data;
//! revenue per video follows the standard per-mille conversion from the
//! median view count. Both are deterministic.

/// Heuristic CPM band in USD, `[low, high]`.
pub const CPM_BAND_USD: [f64; 2] = [2.0, 12.0];

/// Estimated revenue band per video: `median_views * cpm / 1000`.
pub fn revenue_per_video(median_views: f64, cpm_usd: [f64; 2]) -> [f64; 2] {
    [
        median_views * cpm_usd[0] / 1000.0,
        median_views * cpm_usd[1] / 1000.0,
    ]
}
