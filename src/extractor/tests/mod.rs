use std::fs;

use crate::extractor::extract_text;

#[test]
fn test_extract_article() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let text = extract_text(&html).expect("article should produce text");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines,
        vec![
            "Sample Article",
            "Home",
            "News",
            "Sports",
            "Sample Article",
            "This is the first paragraph of the article.",
            "This is the second paragraph.",
            "Copyright",
            "News Site",
        ]
    );
}

#[test]
fn test_extract_drops_scripts_styles_and_comments() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let text = extract_text(&html).expect("article should produce text");

    assert!(!text.contains("analytics"));
    assert!(!text.contains("font-family"));
    assert!(!text.contains("NewsArticle"));
    assert!(!text.contains("editorial note"));
}

#[test]
fn test_no_line_is_blank_or_padded() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let text = extract_text(&html).expect("article should produce text");
    for line in text.split('\n') {
        assert!(!line.is_empty());
        assert_eq!(line, line.trim());
        assert!(!line.contains("  "));
    }
}

#[test]
fn test_script_only_page_is_empty_text() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/script_only.html")
        .expect("Failed to read test fixture");

    assert_eq!(extract_text(&html), Some(String::new()));
}

#[test]
fn test_empty_input_is_none() {
    assert_eq!(extract_text(""), None);
}

#[test]
fn test_malformed_markup_still_yields_text() {
    let text = extract_text("<div><p>unclosed <b>bold").expect("parser is error tolerant");
    assert_eq!(text, "unclosed bold");
}

#[test]
fn test_plain_text_is_normalized() {
    let text = extract_text("alpha  beta\n\n  gamma ").expect("plain text is accepted");
    assert_eq!(text, "alpha\nbeta\ngamma");
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let _ = extract_text(&html);
        }

        #[test]
        fn test_script_body_never_leaks(body in "[a-z]{12,24}") {
            let html = format!("<p>visible</p><script>{body}</script><style>{body}</style>");
            let text = extract_text(&html).unwrap();
            prop_assert!(!text.contains(&body));
        }

        #[test]
        fn test_output_lines_are_trimmed(html in ".*") {
            if let Some(text) = extract_text(&html) {
                for line in text.split('\n').filter(|l| !l.is_empty()) {
                    prop_assert_eq!(line, line.trim());
                }
            }
        }
    }
}
