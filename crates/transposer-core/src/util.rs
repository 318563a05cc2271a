//! Small formatting helpers.

const PREFIXES: [&str; 6] = ["", "Ki", "Mi", "Gi", "Ti", "Pi"];

/// Formats a byte count with a binary prefix.
///
/// Counts up to 1024 print as `"<n> B"`; larger counts print the scaled value
/// with two decimals followed by the exact count, e.g. `"1.50 KiB (1536 bytes)"`.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut prefix = 0;
    while value > 1024.0 && prefix < PREFIXES.len() - 1 {
        value /= 1024.0;
        prefix += 1;
    }
    if prefix == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}B ({bytes} bytes)", PREFIXES[prefix])
    }
}
