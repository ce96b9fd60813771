//! Parser for the line-oriented `.properties` format

use std::collections::BTreeMap;

/// Parse properties text into key/value pairs
///
/// Supports `#` and `!` comments, `=`, `:` or whitespace separators,
/// backslash line continuations and the escapes `\t`, `\n`, `\r`, `\f`,
/// `\uXXXX`. Any other escaped character stands for itself. Later
/// duplicates replace earlier ones.
///
/// Returns an error message naming the line of a malformed escape.
pub fn parse(text: &str) -> Result<BTreeMap<String, String>, String> {
    let mut entries = BTreeMap::new();
    for (line_number, logical) in logical_lines(text) {
        let (key, value) = split_entry(&logical);
        let key = unescape(key).map_err(|e| format!("line {line_number}: {e}"))?;
        let value = unescape(value).map_err(|e| format!("line {line_number}: {e}"))?;
        entries.insert(key, value);
    }
    Ok(entries)
}

/// Join continuation lines, dropping blanks and comments
///
/// Yields each logical line with the number of its first physical line.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (index, raw) in text.lines().enumerate() {
        let trimmed = raw.trim_start_matches([' ', '\t', '\u{c}']);
        let continuing = current.is_some();
        if !continuing && (trimmed.is_empty() || trimmed.starts_with(['#', '!'])) {
            continue;
        }

        let (start, mut buffer) = current.take().unwrap_or((index + 1, String::new()));
        if ends_with_continuation(trimmed) {
            buffer.push_str(&trimmed[..trimmed.len() - 1]);
            current = Some((start, buffer));
        } else {
            buffer.push_str(trimmed);
            lines.push((start, buffer));
        }
    }

    if let Some(last) = current {
        lines.push(last);
    }
    lines
}

/// An odd number of trailing backslashes continues the line
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\u{c}' => {
                key_end = index;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches([' ', '\t', '\u{c}']);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches([' ', '\t', '\u{c}']);
    }
    (key, rest)
}

fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .ok_or_else(|| format!("malformed \\u escape '\\u{hex}'"))?;
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}
