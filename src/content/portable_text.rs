//! Portable Text (CMS rich text) rendering

use serde::{Deserialize, Serialize};

use super::model::ImageRef;

/// Rich text field: an ordered list of blocks
pub type RichText = Vec<Block>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Block {
    #[serde(rename = "block")]
    Text(TextBlock),
    #[serde(rename = "image")]
    Image(ImageRef),
    /// Block types this renderer does not know about
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextBlock {
    pub style: Option<String>,
    pub children: Vec<Span>,
    pub mark_defs: Vec<MarkDef>,
    pub list_item: Option<String>,
    pub level: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
    pub text: String,
    pub marks: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    pub href: Option<String>,
}

/// Render rich text using literal image URLs only
pub fn to_html(blocks: &[Block]) -> String {
    to_html_with(blocks, |image| image.url.clone())
}

/// Render rich text, resolving image blocks through `resolve_image`
pub fn to_html_with<F>(blocks: &[Block], resolve_image: F) -> String
where
    F: Fn(&ImageRef) -> Option<String>,
{
    let mut html = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list_tag = match block {
            Block::Text(text) => text.list_item.as_deref().map(|kind| match kind {
                "number" => "ol",
                _ => "ul",
            }),
            _ => None,
        };

        if open_list != list_tag {
            if let Some(tag) = open_list {
                html.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list_tag {
                html.push_str(&format!("<{}>", tag));
            }
            open_list = list_tag;
        }

        match block {
            Block::Text(text) => {
                let inner = render_spans(text);
                if list_tag.is_some() {
                    html.push_str(&format!("<li>{}</li>", inner));
                } else {
                    let tag = match text.style.as_deref().unwrap_or("normal") {
                        style @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote") => style,
                        _ => "p",
                    };
                    html.push_str(&format!("<{tag}>{}</{tag}>", inner));
                }
            }
            Block::Image(image) => {
                if let Some(src) = resolve_image(image) {
                    let alt = escape(image.alt.as_deref().unwrap_or(""));
                    html.push_str(&format!(
                        r#"<figure><img src="{}" alt="{}" loading="lazy">"#,
                        escape(&src),
                        alt
                    ));
                    if let Some(caption) = &image.caption {
                        html.push_str(&format!("<figcaption>{}</figcaption>", escape(caption)));
                    }
                    html.push_str("</figure>");
                }
            }
            Block::Unknown => {}
        }
    }

    if let Some(tag) = open_list {
        html.push_str(&format!("</{}>", tag));
    }

    html
}

/// Concatenate the text of all text blocks, one paragraph per block
pub fn to_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(|block| match block {
            Block::Text(text) => Some(
                text.children
                    .iter()
                    .map(|span| span.text.as_str())
                    .collect::<String>(),
            ),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_spans(block: &TextBlock) -> String {
    let mut out = String::new();
    for span in &block.children {
        let mut text = escape(&span.text).replace('\n', "<br>");
        for mark in &span.marks {
            text = match mark.as_str() {
                "strong" => format!("<strong>{}</strong>", text),
                "em" => format!("<em>{}</em>", text),
                "code" => format!("<code>{}</code>", text),
                "underline" => format!("<u>{}</u>", text),
                "strike-through" => format!("<s>{}</s>", text),
                key => match block
                    .mark_defs
                    .iter()
                    .find(|def| def.key == key)
                    .and_then(|def| def.href.as_deref())
                {
                    Some(href) => link(href, &text),
                    None => text,
                },
            };
        }
        out.push_str(&text);
    }
    out
}

fn link(href: &str, text: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            escape(href),
            text
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, escape(href), text)
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> RichText {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_paragraphs_and_headings() {
        let blocks = parse(serde_json::json!([
            {"_type": "block", "style": "h2", "children": [{"text": "Intro"}]},
            {"_type": "block", "style": "normal", "children": [{"text": "a < b"}]}
        ]));
        assert_eq!(to_html(&blocks), "<h2>Intro</h2><p>a &lt; b</p>");
    }

    #[test]
    fn test_marks_and_links() {
        let blocks = parse(serde_json::json!([{
            "_type": "block",
            "markDefs": [{"_key": "l1", "_type": "link", "href": "https://example.com"}],
            "children": [
                {"text": "bold", "marks": ["strong"]},
                {"text": " and "},
                {"text": "site", "marks": ["l1"]}
            ]
        }]));
        let html = to_html(&blocks);
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains(r#"<a href="https://example.com" target="_blank""#));
    }

    #[test]
    fn test_lists_are_grouped() {
        let blocks = parse(serde_json::json!([
            {"_type": "block", "listItem": "bullet", "children": [{"text": "one"}]},
            {"_type": "block", "listItem": "bullet", "children": [{"text": "two"}]},
            {"_type": "block", "listItem": "number", "children": [{"text": "first"}]},
            {"_type": "block", "children": [{"text": "after"}]}
        ]));
        assert_eq!(
            to_html(&blocks),
            "<ul><li>one</li><li>two</li></ul><ol><li>first</li></ol><p>after</p>"
        );
    }

    #[test]
    fn test_unknown_blocks_and_images() {
        let blocks = parse(serde_json::json!([
            {"_type": "codeEmbed", "code": "x"},
            {"_type": "image", "asset": {"_ref": "image-abc-10x10-png"}, "alt": "Pic"}
        ]));
        assert_eq!(to_html(&blocks), "");
        let html = to_html_with(&blocks, |_| Some("https://cdn/x.png".to_string()));
        assert!(html.contains(r#"<img src="https://cdn/x.png" alt="Pic""#));
    }

    #[test]
    fn test_plain_text() {
        let blocks = parse(serde_json::json!([
            {"_type": "block", "children": [{"text": "Hello "}, {"text": "world"}]},
            {"_type": "image", "url": "x"},
            {"_type": "block", "children": [{"text": "Again"}]}
        ]));
        assert_eq!(to_plain_text(&blocks), "Hello world\n\nAgain");
    }
}
