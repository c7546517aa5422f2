pub mod cleaner;
pub mod language;
pub mod reader;

#[cfg(test)]
mod tests;

pub use language::detect_language;

/// Plain text of an HTML document with scripts and styles removed, one
/// phrase per line.
///
/// `None` only for empty input: the parser is error-tolerant, so malformed
/// markup still yields whatever text it contains. Markup without any visible
/// text gives `Some("")`.
pub fn extract_text(html: &str) -> Option<String> {
    if html.is_empty() {
        return None;
    }
    Some(cleaner::normalize_text(&reader::visible_text(html)))
}
