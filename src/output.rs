//! Output formatting and persistence for channel reports.
//!
//! Supports pretty-printing, JSON report files, and a flattened CSV append
//! for tracking repeated analyses of the same channel over time.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::parser::ChannelInfo;
use crate::stats::Summary;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// The full analysis envelope: channel metadata, computed summary, and the
/// derived recommendation lines, serialized verbatim for consumers.
#[derive(Debug, Serialize)]
pub struct ChannelReport {
    pub channel: ChannelInfo,
    pub summary: Summary,
    pub recommendations: Vec<String>,
}

/// One flattened row per analysis run, for CSV append.
#[derive(Debug, Serialize)]
pub struct SummaryRow {
    pub timestamp: DateTime<Utc>,
    pub channel: String,
    pub uploads: usize,
    pub avg_uploads_per_week: f64,
    pub median_views: f64,
    pub est_cpm_low_usd: f64,
    pub est_cpm_high_usd: f64,
    pub est_revenue_low_usd: f64,
    pub est_revenue_high_usd: f64,
}

impl SummaryRow {
    pub fn from_report(report: &ChannelReport) -> Self {
        SummaryRow {
            timestamp: Utc::now(),
            channel: report.channel.title.clone(),
            uploads: report.summary.timeseries.len(),
            avg_uploads_per_week: report.summary.avg_uploads_per_week,
            median_views: report.summary.median_views,
            est_cpm_low_usd: report.summary.est_cpm_usd[0],
            est_cpm_high_usd: report.summary.est_cpm_usd[1],
            est_revenue_low_usd: report.summary.est_revenue_per_video_usd[0],
            est_revenue_high_usd: report.summary.est_revenue_per_video_usd[1],
        }
    }
}

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &ChannelReport) {
    debug!("{:#?}", report);
}

/// Prints a report as pretty-printed JSON to stdout.
pub fn print_json(report: &ChannelReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes a report as pretty-printed JSON to a file.
pub fn write_report(path: &str, report: &ChannelReport) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(report)?)?;
    info!(path, "Report written");
    Ok(())
}

/// Appends a [`SummaryRow`] to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, row: &SummaryRow) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn empty_report() -> ChannelReport {
        ChannelReport {
            channel: ChannelInfo::default(),
            summary: Summary::from_items(&[]),
            recommendations: vec![],
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&empty_report());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&empty_report()).unwrap();
    }

    #[test]
    fn test_write_report_round_trips_as_json() {
        let path = temp_path("yt_channel_analyzer_test_report.json");
        let _ = fs::remove_file(&path);

        write_report(&path, &empty_report()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["summary"]["avg_uploads_per_week"], 0.0);
        assert_eq!(
            parsed["summary"]["post_days_heatmap"]
                .as_object()
                .unwrap()
                .len(),
            7
        );

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_creates_file() {
        let path = temp_path("yt_channel_analyzer_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        let row = SummaryRow::from_report(&empty_report());
        append_record(&path, &row).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("yt_channel_analyzer_test_header.csv");
        let _ = fs::remove_file(&path);

        let row = SummaryRow::from_report(&empty_report());
        append_record(&path, &row).unwrap();
        append_record(&path, &row).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);

        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        fs::remove_file(&path).unwrap();
    }
}
