//! Human-readable formatting helpers

/// Format a byte count for display: `512 B`, `1.5 KB`, `2.0 MB`.
///
/// One decimal place above 1 KB, matching the dashboard's upload list.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
