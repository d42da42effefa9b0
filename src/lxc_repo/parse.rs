// Parse `lxc-info -H` output into raw counters.

use crate::error::{MonitorError, Result};
use regex::Regex;
use std::sync::LazyLock;

static CPU_USE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CPU use:[ \t]+(\d+)").expect("valid CPU use pattern"));
static MEMORY_USE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Memory use:[ \t]+(\d+)").expect("valid Memory use pattern"));

/// Counters found in one info response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoCounters {
    pub cpu_time_ns: u64,
    pub memory_bytes: u64,
}

/// Returns `Ok(None)` when there is no CPU line (the container is stopped).
/// A CPU line without a memory line, or a counter too wide for `u64`, is a
/// [`MonitorError::MalformedInfo`].
pub fn parse_info(name: &str, output: &str) -> Result<Option<InfoCounters>> {
    let malformed = || MonitorError::MalformedInfo {
        name: name.to_string(),
        output: output.to_string(),
    };
    let Some(cpu_time_ns) = first_number(&CPU_USE, output) else {
        return Ok(None);
    };
    let cpu_time_ns = cpu_time_ns.ok_or_else(malformed)?;
    let memory_bytes = first_number(&MEMORY_USE, output)
        .flatten()
        .ok_or_else(malformed)?;
    Ok(Some(InfoCounters {
        cpu_time_ns,
        memory_bytes,
    }))
}

/// Container names from the enumeration output; blank lines are skipped.
pub fn parse_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

// Outer `None`: no such line. Inner `None`: the digits do not fit in a u64.
fn first_number(re: &Regex, text: &str) -> Option<Option<u64>> {
    let digits = re.captures(text)?.get(1)?.as_str();
    Some(digits.parse().ok())
}
