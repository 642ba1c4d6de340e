//! Built-in site templates using the Tera template engine
//!
//! Every page, partial and asset template is embedded in the binary.

pub mod view;

use anyhow::Result;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::{format_date, format_naive_date};

pub use view::ViewBuilder;

/// Static assets rendered once per build, as (template, output path)
pub const ASSETS: [(&str, &str); 4] = [
    ("assets/site.css", "css/site.css"),
    ("assets/palette.js", "js/palette.js"),
    ("assets/music.js", "js/music.js"),
    ("assets/contact.js", "js/contact.js"),
];

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all site templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Bodies arrive as pre-rendered HTML; templates escape explicitly
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("projects.html", include_str!("site/projects.html")),
            ("project.html", include_str!("site/project.html")),
            ("blogs.html", include_str!("site/blogs.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("journey.html", include_str!("site/journey.html")),
            ("resume.html", include_str!("site/resume.html")),
            ("contact.html", include_str!("site/contact.html")),
            ("404.html", include_str!("site/404.html")),
            // Partials
            ("partials/head.html", include_str!("site/partials/head.html")),
            ("partials/nav.html", include_str!("site/partials/nav.html")),
            ("partials/footer.html", include_str!("site/partials/footer.html")),
            ("partials/palette.html", include_str!("site/partials/palette.html")),
            ("partials/music.html", include_str!("site/partials/music.html")),
            ("partials/project_card.html", include_str!("site/partials/project_card.html")),
            ("partials/post_card.html", include_str!("site/partials/post_card.html")),
            // Assets
            ("assets/site.css", include_str!("site/assets/site.css")),
            ("assets/palette.js", include_str!("site/assets/palette.js")),
            ("assets/music.js", include_str!("site/assets/music.js")),
            ("assets/contact.js", include_str!("site/assets/contact.js")),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(strip_html(&s)))
}

pub(crate) fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Tera filter: reformat an RFC 3339 timestamp or `YYYY-MM-DD` date
/// with a Moment.js-style format (default `LL`)
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "LL".to_string(),
    };

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
        return Ok(tera::Value::String(format_date(&dt, &format)));
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return Ok(tera::Value::String(format_naive_date(&date, &format)));
    }

    // Unparseable values pass through untouched
    Ok(tera::Value::String(s))
}
