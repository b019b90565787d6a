//! In-Process Fallback Analysis
//!
//! Computes the analysis report directly from the input records. Used when
//! no external result can be recovered, so it must accept any input and
//! never fail.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use pothole_analysis_core::{NormalizedRecord, Record};
use serde_json::Value;

use crate::models::{AnalysisReport, BoundingBox, Top5Entry};

/// Maximum number of entries in the top ranking.
pub const TOP_N: usize = 5;

/// Analyze a list of records.
pub fn analyze(records: &[Record]) -> AnalysisReport {
    let normalized: Vec<NormalizedRecord> = records.iter().map(Record::normalize).collect();
    analyze_normalized(&normalized)
}

/// Analyze an arbitrary JSON value. Anything but an array counts as empty.
pub fn analyze_value(value: &Value) -> AnalysisReport {
    let records: Vec<Record> = match value {
        Value::Array(items) => items.iter().map(Record::from_value_lossy).collect(),
        _ => Vec::new(),
    };
    analyze(&records)
}

fn analyze_normalized(records: &[NormalizedRecord]) -> AnalysisReport {
    let (severity_counts, most_common_severity) = tally_severities(records);

    let resolved: Vec<f64> = records.iter().map(|r| r.resolved_reports).collect();
    let average_resolved_reports = if resolved.is_empty() {
        0.0
    } else {
        resolved.iter().sum::<f64>() / resolved.len() as f64
    };
    let max_resolved_reports = resolved.iter().copied().reduce(f64::max).unwrap_or(0.0);

    let (min_lat, max_lat) = extent(records.iter().filter_map(|r| r.latitude));
    let (min_lon, max_lon) = extent(records.iter().filter_map(|r| r.longitude));

    AnalysisReport {
        count: records.len(),
        severity_counts,
        most_common_severity,
        average_resolved_reports,
        max_resolved_reports,
        bounding_box: BoundingBox {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        },
        top5_by_resolved_reports: top_by_resolved(records),
    }
}

/// Count records per severity and pick the most common one.
///
/// On a tie the label seen first in input order wins.
fn tally_severities(records: &[NormalizedRecord]) -> (BTreeMap<String, usize>, Option<String>) {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for record in records {
        let count = counts.entry(record.severity.clone()).or_insert(0);
        if *count == 0 {
            first_seen.push(record.severity.as_str());
        }
        *count += 1;
    }

    let max = counts.values().copied().max().unwrap_or(0);
    let most_common = first_seen
        .into_iter()
        .find(|severity| counts.get(*severity) == Some(&max))
        .map(str::to_string);
    (counts, most_common)
}

fn extent(values: impl Iterator<Item = f64>) -> (Option<f64>, Option<f64>) {
    values.fold((None, None), |(min, max), v| {
        (
            Some(min.map_or(v, |m: f64| m.min(v))),
            Some(max.map_or(v, |m: f64| m.max(v))),
        )
    })
}

fn top_by_resolved(records: &[NormalizedRecord]) -> Vec<Top5Entry> {
    let mut entries: Vec<Top5Entry> = records
        .iter()
        .map(|r| Top5Entry {
            id: r.id.clone(),
            severity: r.severity.clone(),
            resolved_reports: r.resolved_reports,
            latitude: r.latitude,
            longitude: r.longitude,
        })
        .collect();

    // sort_by is stable: equal counts keep their input order
    entries.sort_by(|a, b| {
        b.resolved_reports
            .partial_cmp(&a.resolved_reports)
            .unwrap_or(Ordering::Equal)
    });
    entries.truncate(TOP_N);
    entries
}
