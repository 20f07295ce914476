/// Delivery channel for the end-of-run summary. Send failures are logged
/// by the orchestrator and never fail the sweep.
pub trait Notifier {
    fn send(&self, subject: &str, body: &str) -> Result<(), String>;
}
