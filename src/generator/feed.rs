//! Atom feed and sitemap

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::model::BlogPost;
use crate::helpers::{date_xml, entry_path};

/// Build the Atom feed for the newest posts
pub fn atom(config: &SiteConfig, author: &str, posts: &[BlogPost]) -> String {
    let base_url = config.url.trim_end_matches('/');
    let updated = posts
        .iter()
        .filter_map(|p| p.updated_at.or(p.published_at))
        .max()
        .unwrap_or_else(Utc::now);

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
    if !config.description.is_empty() {
        feed.push_str(&format!(
            "  <subtitle>{}</subtitle>\n",
            escape_xml(&config.description)
        ));
    }
    feed.push_str(&format!("  <link href=\"{}/atom.xml\" rel=\"self\"/>\n", base_url));
    feed.push_str(&format!("  <link href=\"{}/\"/>\n", base_url));
    feed.push_str(&format!("  <updated>{}</updated>\n", updated.to_rfc3339()));
    feed.push_str(&format!("  <id>{}/</id>\n", base_url));
    feed.push_str(&format!(
        "  <author><name>{}</name></author>\n",
        escape_xml(author)
    ));

    for post in posts.iter().take(config.feed_limit) {
        let Some(published) = post.published_at else {
            continue;
        };
        let link = match post.external_url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => url.to_string(),
            None => format!("{}{}", base_url, entry_path("blogs", &post.slug.current)),
        };

        feed.push_str("  <entry>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
        feed.push_str(&format!("    <link href=\"{}\"/>\n", escape_xml(&link)));
        feed.push_str(&format!("    <id>{}</id>\n", escape_xml(&link)));
        feed.push_str(&format!("    <published>{}</published>\n", published.to_rfc3339()));
        feed.push_str(&format!(
            "    <updated>{}</updated>\n",
            post.updated_at.unwrap_or(published).to_rfc3339()
        ));
        for tag in &post.tags {
            feed.push_str(&format!("    <category term=\"{}\"/>\n", escape_xml(tag)));
        }
        if let Some(excerpt) = post.excerpt.as_deref().filter(|e| !e.is_empty()) {
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_xml(&strip_invalid_xml_chars(excerpt))
            ));
        }
        let content = convert_relative_urls_to_absolute(&post.body(), base_url);
        feed.push_str(&format!(
            "    <content type=\"html\"><![CDATA[{}]]></content>\n",
            strip_invalid_xml_chars(&content).replace("]]>", "]]]]><![CDATA[>")
        ));
        feed.push_str("  </entry>\n");
    }

    feed.push_str("</feed>\n");
    feed
}

/// A sitemap `<url>` entry
#[derive(Debug, Clone)]
pub struct SitemapEntry {
    pub path: String,
    pub lastmod: Option<DateTime<Utc>>,
    pub priority: f32,
}

impl SitemapEntry {
    pub fn new(path: impl Into<String>, priority: f32) -> Self {
        Self {
            path: path.into(),
            lastmod: None,
            priority,
        }
    }
}

pub fn sitemap(config: &SiteConfig, entries: &[SitemapEntry]) -> String {
    let base_url = config.url.trim_end_matches('/');
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}{}</loc>\n",
            base_url,
            escape_xml(&entry.path)
        ));
        if let Some(lastmod) = entry.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", date_xml(&lastmod)));
        }
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Rewrite `href="/..."` and `src="/..."` so feed readers can resolve them
fn convert_relative_urls_to_absolute(content: &str, base_url: &str) -> String {
    content
        .replace("href=\"/", &format!("href=\"{}/", base_url))
        .replace("src=\"/", &format!("src=\"{}/", base_url))
        .replace("href='/", &format!("href='{}/", base_url))
        .replace("src='/", &format!("src='{}/", base_url))
}

/// Strip characters XML 1.0 does not allow (tab, newline and CR are kept)
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}
