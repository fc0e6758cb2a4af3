use std::time::{Duration, Instant};

/// Logs the time spent in `l_step` since `last` and the running total since `start`.
///
/// Returns the new running total, to be passed back as `last` for the next step.
pub(crate) fn trace(l_type: &str, l_step: &str, start: Instant, last: Duration) -> Duration {
    let total = start.elapsed();
    log::trace!("{} | Total={:.2?} | {}={:.2?}", l_type, total, l_step, total.saturating_sub(last));
    total
}
