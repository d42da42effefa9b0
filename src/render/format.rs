// Human-readable memory sizes (binary units)

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;
const GB: u64 = 1024 * MB;

/// Picks the largest unit whose threshold the value exceeds; two decimals for
/// KB/MB/GB, a bare integer for bytes.
pub fn format_memory(bytes: u64) -> String {
    match bytes {
        b if b > GB => format!("{:.2} GB", b as f64 / GB as f64),
        b if b > MB => format!("{:.2} MB", b as f64 / MB as f64),
        b if b > KB => format!("{:.2} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}
