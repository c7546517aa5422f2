/// Universal newline boundaries (the same set `str.splitlines` style
/// splitters recognise).
fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}'
            | '\u{2029}'
    )
}

/// Collapse extracted page text into one phrase per line.
///
/// Lines are trimmed, split wherever two spaces meet, the pieces trimmed
/// again and empty ones dropped. Runs of three or more spaces therefore
/// split exactly like a double space.
pub fn normalize_text(raw: &str) -> String {
    raw.split(is_line_boundary)
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
