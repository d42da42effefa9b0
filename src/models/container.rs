// Per-container observations

use std::time::Instant;

/// Counters parsed from one `lxc-info` run, before any rate is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSample {
    pub name: String,
    pub observed_at: Instant,
    /// Cumulative CPU time in nanoseconds, as reported by `lxc-info -H`.
    pub cpu_time_ns: u64,
    pub memory_bytes: u64,
}

/// Latest snapshot of a container as held in the store and drawn on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSample {
    pub name: String,
    pub observed_at: Instant,
    pub cpu_time_ns: u64,
    /// Utilization since the previous sample of the same container; 0 when
    /// there is none or the counter went backwards. May exceed 100 on
    /// multi-core hosts.
    pub cpu_percent: u64,
    pub memory_bytes: u64,
}

impl ContainerSample {
    /// First observation of a container: no predecessor, so no utilization yet.
    pub fn first(raw: RawSample) -> Self {
        Self::with_percent(raw, 0)
    }

    pub fn with_percent(raw: RawSample, cpu_percent: u64) -> Self {
        Self {
            name: raw.name,
            observed_at: raw.observed_at,
            cpu_time_ns: raw.cpu_time_ns,
            cpu_percent,
            memory_bytes: raw.memory_bytes,
        }
    }
}
