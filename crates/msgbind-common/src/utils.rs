//! Shared string helpers for rendering call arguments.

/// Truncates a string to at most `max_chars` characters, ending with `...`
/// when shortened.
///
/// Counts characters rather than bytes so multi-byte text never splits.
#[must_use]
pub fn truncate_display(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Wraps a string in double quotes, escaping embedded quotes and backslashes.
#[must_use]
pub fn quote(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    out.push('"');
    for c in input.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
