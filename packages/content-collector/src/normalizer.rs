use scraper::{Html, Node, Selector};

/// Title, meta description and cleaned body text extracted from one page
#[derive(Debug, Clone)]
pub struct NormalizedPage {
    pub title: String,
    pub content: String,
    pub meta_description: String,
}

/// Normalize raw HTML into title, meta description and cleaned body text.
///
/// Parsing is lenient: malformed markup degrades to a best-effort result,
/// never an error. Content is capped at `max_content_length` characters;
/// truncation is silent.
pub fn normalize(html: &str, max_content_length: usize) -> NormalizedPage {
    let document = Html::parse_document(html);

    NormalizedPage {
        title: extract_title(&document),
        content: extract_content(&document, max_content_length),
        meta_description: extract_meta_description(&document),
    }
}

/// Text of the first title element, trimmed
fn extract_title(document: &Html) -> String {
    let selector = match Selector::parse("title") {
        Ok(s) => s,
        Err(_) => return String::new(),
    };
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Content attribute of the first `<meta name="description">`, matched
/// case-insensitively on the name value
fn extract_meta_description(document: &Html) -> String {
    let selector = match Selector::parse("meta") {
        Ok(s) => s,
        Err(_) => return String::new(),
    };
    document
        .select(&selector)
        .find(|el| {
            el.value()
                .attr("name")
                .is_some_and(|name| name.eq_ignore_ascii_case("description"))
        })
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

/// Visible text with script/style subtrees excluded, whitespace collapsed,
/// and length capped
fn extract_content(document: &Html, max_content_length: usize) -> String {
    let mut raw = String::new();
    for node in document.root_element().descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
                Node::Element(el) => matches!(el.name(), "script" | "style" | "noscript"),
                _ => false,
            });
            if !hidden {
                raw.push_str(text);
                raw.push(' ');
            }
        }
    }

    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() > max_content_length {
        collapsed.chars().take(max_content_length).collect()
    } else {
        collapsed
    }
}
