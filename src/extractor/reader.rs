use scraper::{Html, Node};

/// Elements whose text never reaches the output.
const SKIPPED_ELEMENTS: [&str; 2] = ["script", "style"];

/// Concatenate every text node of the document in document order, leaving
/// out anything nested inside a skipped element. Comments and doctypes are
/// not text nodes and never appear.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::with_capacity(html.len() / 2);

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            out.push_str(text);
        }
    }

    out
}
