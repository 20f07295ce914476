use std::time::Duration;

use cleanup_sweep_core::report::ResourceRecord;

/// One resource kind's listing and teardown capabilities.
///
/// Implementations never see the dry-run flag; the orchestrator decides
/// whether `delete` is invoked at all.
pub trait ResourceSweeper {
    /// Report key for this kind, e.g. `ec2_instances`.
    fn kind(&self) -> &'static str;

    /// Lists candidate resources with their tags, draining provider
    /// pagination fully. Provider-side tag and state pre-filters are an
    /// optimization only; the expiry policy re-checks the marker.
    fn list_candidates(&self) -> Result<Vec<ResourceRecord>, String>;

    /// Performs the kind's full teardown for one resource. Kinds with
    /// asynchronous deletion return Ok once the request was accepted.
    fn delete(&self, record: &ResourceRecord) -> Result<(), String>;

    /// Fixed pause before listing, for kinds whose candidates are released
    /// asynchronously by earlier teardowns. A heuristic wait, not a
    /// poll-until-released barrier.
    fn settle_before_list(&self) -> Option<Duration> {
        None
    }
}
