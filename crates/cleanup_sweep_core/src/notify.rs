use std::fmt::Write;

use crate::report::SweepReport;

pub const NOTIFICATION_SUBJECT: &str = "AWS Coworker Test Cleanup Report";

/// Plain-text summary of a completed run for the notification channel.
pub fn render_report(report: &SweepReport) -> String {
    let mut body = String::new();
    let title = "AWS Coworker Test Resource Cleanup Report";

    writeln!(body, "{title}").ok();
    writeln!(body, "{}", "=".repeat(title.len())).ok();
    writeln!(body, "Time: {}", report.timestamp).ok();
    writeln!(body, "Dry Run: {}", report.dry_run).ok();
    writeln!(body).ok();
    writeln!(body, "Resources Cleaned: {}", report.total_cleaned()).ok();
    writeln!(body).ok();
    writeln!(body, "Details:").ok();
    for (kind, ids) in &report.cleaned {
        writeln!(body, "- {kind}: {}", ids.len()).ok();
    }
    writeln!(body).ok();
    writeln!(body, "Errors: {}", report.errors.len()).ok();

    body
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn rendered_report_lists_per_kind_counts() {
        let now = Utc
            .with_ymd_and_hms(2026, 2, 14, 12, 0, 0)
            .single()
            .expect("fixed timestamp should be valid");
        let mut report = SweepReport::new(now, true);
        report.cleaned.insert(
            "ec2_instances".to_string(),
            vec!["i-0abc".to_string(), "i-0def".to_string()],
        );
        report.cleaned.insert("s3_buckets".to_string(), Vec::new());
        report.errors.push("eks_clusters: listing failed".to_string());

        let body = render_report(&report);
        assert!(body.contains("Dry Run: true"));
        assert!(body.contains("Resources Cleaned: 2"));
        assert!(body.contains("- ec2_instances: 2"));
        assert!(body.contains("- s3_buckets: 0"));
        assert!(body.contains("Errors: 1"));
    }
}
