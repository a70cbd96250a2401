//! Human-readable playbook lines derived from a computed summary.

use std::collections::BTreeMap;

use crate::stats::{Summary, WEEKDAYS};

/// Ranks weekdays by upload count, descending; calendar order breaks ties.
pub fn top_days(heatmap: &BTreeMap<String, u64>, n: usize) -> Vec<String> {
    let mut days: Vec<(&str, u64)> = WEEKDAYS
        .iter()
        .map(|&d| (d, heatmap.get(d).copied().unwrap_or(0)))
        .collect();

    // stable sort keeps calendar order within equal counts
    days.sort_by(|a, b| b.1.cmp(&a.1));
    days.truncate(n);

    days.into_iter().map(|(d, _)| d.to_string()).collect()
}

/// Builds the four recommendation lines shown alongside the summary.
///
/// Pure string formatting; every number already exists in the summary.
pub fn recommendations(summary: &Summary) -> Vec<String> {
    let days = top_days(&summary.post_days_heatmap, 3).join(", ");
    let keywords = summary
        .top_keywords
        .iter()
        .take(5)
        .map(|k| k.keyword.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let median_target = summary.median_views.round().max(1.0) as u64;

    vec![
        format!(
            "Post ~{:.1}/week on top days: {}",
            summary.avg_uploads_per_week, days
        ),
        format!("Target median views >= {median_target}"),
        format!("Aim titles around top keywords: {keywords}"),
        format!(
            "Optimize RPM with longer retention; CPM range ${}-${}",
            summary.est_cpm_usd[0], summary.est_cpm_usd[1]
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{Summary, UploadItem};
    use chrono::TimeZone;
    use chrono::Utc;

    fn monday_plus(days: u64, views: u64) -> UploadItem {
        // 2024-01-01 is a Monday
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        UploadItem {
            title: "daily tutorial".to_string(),
            published_at: base + chrono::Duration::days(days as i64),
            views,
            url: String::new(),
        }
    }

    #[test]
    fn test_top_days_ranked_by_count() {
        let items = vec![
            monday_plus(0, 10),
            monday_plus(7, 10),
            monday_plus(1, 10), // Tuesday
        ];
        let summary = Summary::from_items(&items);

        let days = top_days(&summary.post_days_heatmap, 3);
        assert_eq!(days[0], "Monday");
        assert_eq!(days[1], "Tuesday");
        assert_eq!(days.len(), 3);
    }

    #[test]
    fn test_top_days_ties_follow_calendar_order() {
        let summary = Summary::from_items(&[]);
        let days = top_days(&summary.post_days_heatmap, 3);
        assert_eq!(days, vec!["Monday", "Tuesday", "Wednesday"]);
    }

    #[test]
    fn test_recommendations_have_four_lines() {
        let items = vec![monday_plus(0, 100), monday_plus(3, 300)];
        let summary = Summary::from_items(&items);

        let recs = recommendations(&summary);
        assert_eq!(recs.len(), 4);
        assert!(recs[0].contains("Monday"));
        assert!(recs[1].contains("200"));
        assert!(recs[2].contains("tutorial"));
        assert!(recs[3].contains("$2-$12"));
    }
}
