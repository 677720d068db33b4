//! Small string helpers shared by the layers.

/// Longest prefix of `s` that fits in `max_bytes` without splitting a
/// UTF-8 character.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Single-line preview for log output: whitespace runs collapse to one
/// space and an ellipsis marks a cut.
pub fn one_line_preview(s: &str, max_bytes: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    let cut = truncate_str(&flat, max_bytes);
    if cut.len() < flat.len() {
        format!("{}...", cut.trim_end())
    } else {
        flat
    }
}
