use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tags::Tag;

/// One listed resource: its kind-specific identifier (instance id, bucket
/// name, cluster name, ...) and its tag set. Built per sweep from a live
/// provider listing, never cached across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub id: String,
    pub tags: Vec<Tag>,
}

impl ResourceRecord {
    pub fn new(id: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            id: id.into(),
            tags,
        }
    }
}

/// Aggregate result of one sweep run; serialized as the Lambda response.
///
/// `cleaned` maps every swept kind to the identifiers removed (or, under
/// dry run, the identifiers that would have been removed). Asynchronous
/// teardowns appear here once the deletion request was accepted, not once
/// the provider finished removing the resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SweepReport {
    pub timestamp: String,
    pub dry_run: bool,
    pub cleaned: BTreeMap<String, Vec<String>>,
    pub errors: Vec<String>,
    pub skipped: Vec<String>,
}

impl SweepReport {
    pub fn new(now: DateTime<Utc>, dry_run: bool) -> Self {
        Self {
            timestamp: now.to_rfc3339(),
            dry_run,
            cleaned: BTreeMap::new(),
            errors: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn total_cleaned(&self) -> usize {
        self.cleaned.values().map(Vec::len).sum()
    }

    pub fn has_cleaned(&self) -> bool {
        self.cleaned.values().any(|ids| !ids.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn fresh_report_has_nothing_cleaned() {
        let now = Utc
            .with_ymd_and_hms(2026, 2, 14, 12, 0, 0)
            .single()
            .expect("fixed timestamp should be valid");
        let mut report = SweepReport::new(now, true);
        report.cleaned.insert("ec2_instances".to_string(), Vec::new());

        assert!(report.dry_run);
        assert_eq!(report.total_cleaned(), 0);
        assert!(!report.has_cleaned());
    }

    #[test]
    fn report_serializes_with_expected_keys() {
        let now = Utc
            .with_ymd_and_hms(2026, 2, 14, 12, 0, 0)
            .single()
            .expect("fixed timestamp should be valid");
        let mut report = SweepReport::new(now, false);
        report
            .cleaned
            .insert("s3_buckets".to_string(), vec!["leaky-bucket".to_string()]);
        report.errors.push("rds_instances: listing failed".to_string());

        let value = serde_json::to_value(&report).expect("report should serialize");
        assert_eq!(value["dry_run"], serde_json::Value::from(false));
        assert_eq!(value["cleaned"]["s3_buckets"][0], "leaky-bucket");
        assert_eq!(value["errors"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["skipped"].as_array().map(Vec::len), Some(0));
        assert!(value["timestamp"].as_str().is_some());
    }
}
