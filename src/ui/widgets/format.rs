//! Text formatting helpers

/// Seconds as `MM:SS`; minutes keep growing past 59
pub fn format_seconds(total: u32) -> String {
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Truncate a string to fit within max_len characters, adding "…" if truncated
pub fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else if max_len <= 1 {
        "…".to_string()
    } else {
        let truncated: String = name.chars().take(max_len - 1).collect();
        format!("{}…", truncated)
    }
}

/// A text progress bar, e.g. `[#####-----]`
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent.min(100) as usize * width).div_ceil(100).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
