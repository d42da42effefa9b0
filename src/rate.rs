// CPU utilization from two successive cumulative samples.

use crate::models::{ContainerSample, RawSample};

/// Integer CPU percentage of `raw` relative to `previous`:
/// `floor(delta_cpu_ns * 100 / elapsed_ns)`.
///
/// Returns 0 when there is no predecessor, when no wall-clock time has passed,
/// or when the counter went backwards (container restarted).
pub fn cpu_percent(previous: Option<&ContainerSample>, raw: &RawSample) -> u64 {
    let Some(previous) = previous else {
        return 0;
    };
    let elapsed_ns = raw
        .observed_at
        .saturating_duration_since(previous.observed_at)
        .as_nanos();
    let Some(cpu_delta) = raw.cpu_time_ns.checked_sub(previous.cpu_time_ns) else {
        return 0;
    };
    if elapsed_ns == 0 {
        return 0;
    }
    let pct = u128::from(cpu_delta) * 100 / elapsed_ns;
    u64::try_from(pct).unwrap_or(u64::MAX)
}

/// Builds the snapshot that replaces `previous` in the store.
pub fn next_sample(previous: Option<&ContainerSample>, raw: RawSample) -> ContainerSample {
    let pct = cpu_percent(previous, &raw);
    ContainerSample::with_percent(raw, pct)
}
