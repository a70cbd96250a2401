//! Channel-level statistics computed from a parsed upload feed.
//!
//! [`Summary::from_items`] is a pure transform: no I/O, no shared state,
//! deterministic for a given input. Input order is irrelevant; anything
//! order-sensitive (cadence span, timeseries) sorts internally.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc, Weekday};
use serde::Serialize;

use crate::analyzers::keywords::{self, KeywordScore};
use crate::analyzers::monetize;
use crate::analyzers::utility::median;

/// Weekday names in calendar order, used as heatmap keys.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const SECONDS_PER_WEEK: f64 = 7.0 * 24.0 * 3600.0;

/// One upload's metadata as delivered by the channel feed.
#[derive(Debug, Clone, Serialize)]
pub struct UploadItem {
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub views: u64,
    pub url: String,
}

/// One point of the per-upload timeseries, ascending by publish date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeseriesPoint {
    pub date: String,
    pub views: u64,
    pub title: String,
}

#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub avg_uploads_per_week: f64,
    pub median_views: f64,
    pub est_cpm_usd: [f64; 2],
    pub est_revenue_per_video_usd: [f64; 2],
    pub post_days_heatmap: BTreeMap<String, u64>,
    pub top_keywords: Vec<KeywordScore>,
    pub timeseries: Vec<TimeseriesPoint>,
}

impl Summary {
    /// Aggregates upload items into a complete summary.
    ///
    /// Empty input is not an error: every field degrades to its zero value
    /// (all-zero heatmap, empty keyword list, empty timeseries).
    pub fn from_items(items: &[UploadItem]) -> Self {
        let mut s = Summary {
            post_days_heatmap: empty_heatmap(),
            est_cpm_usd: monetize::CPM_BAND_USD,
            ..Default::default()
        };

        if items.is_empty() {
            return s;
        }

        s.avg_uploads_per_week = uploads_per_week(items);

        let views: Vec<u64> = items.iter().map(|i| i.views).collect();
        s.median_views = median(&views);

        // Weekdays are bucketed in UTC uniformly; a different zone could move
        // an upload across a day boundary and change the heatmap.
        for item in items {
            let day = weekday_name(item.published_at.weekday());
            *s.post_days_heatmap.entry(day.to_string()).or_insert(0) += 1;
        }

        s.top_keywords = keywords::top_keywords(items);

        s.est_revenue_per_video_usd = monetize::revenue_per_video(s.median_views, s.est_cpm_usd);

        let mut ordered: Vec<&UploadItem> = items.iter().collect();
        ordered.sort_by_key(|i| i.published_at);
        s.timeseries = ordered
            .into_iter()
            .map(|i| TimeseriesPoint {
                date: i.published_at.format("%Y-%m-%d").to_string(),
                views: i.views,
                title: i.title.clone(),
            })
            .collect();

        s
    }
}

/// Upload count divided by the observed span in weeks.
///
/// The span is floored at one week so single-day bursts don't divide by a
/// near-zero denominator.
fn uploads_per_week(items: &[UploadItem]) -> f64 {
    let earliest = items.iter().map(|i| i.published_at).min();
    let latest = items.iter().map(|i| i.published_at).max();

    let (Some(earliest), Some(latest)) = (earliest, latest) else {
        return 0.0;
    };

    let span_weeks = ((latest - earliest).num_seconds() as f64 / SECONDS_PER_WEEK).max(1.0);
    items.len() as f64 / span_weeks
}

fn empty_heatmap() -> BTreeMap<String, u64> {
    WEEKDAYS.iter().map(|d| (d.to_string(), 0)).collect()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
