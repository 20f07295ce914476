use chrono::{DateTime, Utc};
use serde_json::json;

use cleanup_sweep_core::config::CleanupConfig;
use cleanup_sweep_core::notify::{render_report, NOTIFICATION_SUBJECT};
use cleanup_sweep_core::policy;
use cleanup_sweep_core::report::SweepReport;
use cleanup_sweep_core::tags;

use crate::adapters::notify::Notifier;
use crate::adapters::resource::ResourceSweeper;

/// Runs every sweeper in the given order and aggregates one report.
///
/// Sweepers are expected in dependency-tier order: orchestration and
/// database kinds first (slow teardowns that block release of lower
/// tiers), then compute, then networking, then storage and key material.
/// A kind's total failure never prevents the remaining kinds from being
/// swept; there is no fatal path out of this function.
pub fn run_sweep(
    sweepers: &[&dyn ResourceSweeper],
    notifier: Option<&dyn Notifier>,
    config: &CleanupConfig,
    now: DateTime<Utc>,
) -> SweepReport {
    let mut report = SweepReport::new(now, config.dry_run);
    log_sweep_info(
        "sweep_started",
        json!({
            "dry_run": config.dry_run,
            "default_ttl_hours": config.default_ttl_hours,
            "kinds": sweepers.len(),
        }),
    );

    // Every kind appears in the report even when nothing was cleaned.
    for sweeper in sweepers {
        report.cleaned.insert(sweeper.kind().to_string(), Vec::new());
    }

    for sweeper in sweepers {
        sweep_kind(*sweeper, config, now, &mut report);
    }

    if report.has_cleaned() {
        if let Some(notifier) = notifier {
            if let Err(error) = notifier.send(NOTIFICATION_SUBJECT, &render_report(&report)) {
                log_sweep_error("notification_failed", json!({ "error": error }));
            }
        }
    }

    log_sweep_info(
        "sweep_completed",
        json!({
            "total_cleaned": report.total_cleaned(),
            "report": &report,
        }),
    );
    report
}

fn sweep_kind(
    sweeper: &dyn ResourceSweeper,
    config: &CleanupConfig,
    now: DateTime<Utc>,
    report: &mut SweepReport,
) {
    let kind = sweeper.kind();

    if let Some(delay) = sweeper.settle_before_list() {
        // Give asynchronous teardowns from earlier kinds time to register
        // with the provider before candidates of this kind are evaluated.
        if !config.dry_run {
            std::thread::sleep(delay);
        }
    }

    let records = match sweeper.list_candidates() {
        Ok(records) => records,
        Err(error) => {
            log_sweep_error("listing_failed", json!({ "kind": kind, "error": error }));
            report.errors.push(format!("{kind}: listing failed: {error}"));
            return;
        }
    };

    for record in &records {
        if !tags::is_test_resource(&record.tags) {
            continue;
        }

        let verdict = policy::evaluate(&record.tags, now, config.default_ttl_hours);
        if !verdict.expired {
            let note = format!(
                "{kind}/{}: age {:.1}h within ttl {}h",
                record.id, verdict.age_hours, verdict.ttl_hours
            );
            log_sweep_info(
                "resource_skipped",
                json!({
                    "kind": kind,
                    "id": record.id,
                    "age_hours": verdict.age_hours,
                    "ttl_hours": verdict.ttl_hours,
                }),
            );
            report.skipped.push(note);
            continue;
        }

        if config.dry_run {
            log_sweep_info(
                "would_delete",
                json!({
                    "kind": kind,
                    "id": record.id,
                    "age_hours": verdict.age_hours,
                    "ttl_hours": verdict.ttl_hours,
                }),
            );
            record_cleaned(report, kind, &record.id);
            continue;
        }

        match sweeper.delete(record) {
            Ok(()) => {
                log_sweep_info(
                    "resource_deleted",
                    json!({
                        "kind": kind,
                        "id": record.id,
                        "age_hours": verdict.age_hours,
                        "ttl_hours": verdict.ttl_hours,
                    }),
                );
                record_cleaned(report, kind, &record.id);
            }
            Err(error) => {
                log_sweep_error(
                    "delete_failed",
                    json!({ "kind": kind, "id": record.id, "error": error }),
                );
                report
                    .errors
                    .push(format!("{kind}/{}: delete failed: {error}", record.id));
            }
        }
    }
}

fn record_cleaned(report: &mut SweepReport, kind: &str, id: &str) {
    report
        .cleaned
        .entry(kind.to_string())
        .or_default()
        .push(id.to_string());
}

pub(crate) fn log_sweep_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "cleanup_sweep",
            "event": event,
            "timestamp": Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

pub(crate) fn log_sweep_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "cleanup_sweep",
            "level": "error",
            "event": event,
            "timestamp": Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
