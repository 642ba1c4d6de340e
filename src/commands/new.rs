//! Scaffold a new blog post, project or toy

use anyhow::{bail, Result};
use clap::ValueEnum;
use std::fs;
use std::path::PathBuf;

use crate::Portfolio;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntryKind {
    Blog,
    Project,
    Toy,
}

impl EntryKind {
    /// Collection directory name under `content/`
    pub fn collection(&self) -> &'static str {
        match self {
            EntryKind::Blog => "blogs",
            EntryKind::Project => "projects",
            EntryKind::Toy => "toys",
        }
    }
}

/// Built-in scaffold with `{{TITLE}}`, `{{SLUG}}` and `{{DATE}}` placeholders
pub fn template_for(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Blog => BLOG_TEMPLATE,
        EntryKind::Project => PROJECT_TEMPLATE,
        EntryKind::Toy => TOY_TEMPLATE,
    }
}

const BLOG_TEMPLATE: &str = r#"---
title: {{TITLE}}
publishDate: {{DATE}}
tags:
  - notes
excerpt: One or two sentences shown on the blog index.
heroImage: /assets/blogs/{{SLUG}}/hero.png
featured: false
---

Write the post here.
"#;

const PROJECT_TEMPLATE: &str = r#"---
title: {{TITLE}}
role: Developer
tech:
  - Rust
summary: One line shown on the project grid.
description: A longer description used when the body is empty.
gallery:
  - src: /assets/projects/{{SLUG}}/cover.png
    alt: {{TITLE}}
links: []
featured: false
sortOrder: 0
---
"#;

const TOY_TEMPLATE: &str = r#"---
title: {{TITLE}}
description: A small experiment.
tech:
  - JavaScript
category: experiment
created: {{DATE}}
featured: false
sortOrder: 0
---
"#;

/// "my-first_post" -> "My First Post"
pub fn title_from_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Write `content/<kind>s/<slug>.md` and create its asset folder
pub fn create_entry(
    portfolio: &Portfolio,
    kind: EntryKind,
    slug: &str,
    title: Option<&str>,
) -> Result<PathBuf> {
    let raw = slug.trim();
    if raw.is_empty() || raw.contains(['/', '\\']) || raw.starts_with('.') {
        bail!("Invalid slug: {:?}", raw);
    }
    let normalized = slug::slugify(raw);
    if normalized.is_empty() {
        bail!("Invalid slug: {:?}", raw);
    }
    if normalized != raw {
        tracing::info!("Using slug '{}' for '{}'", normalized, raw);
    }
    let slug = normalized.as_str();

    let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => title.to_string(),
        None => title_from_slug(slug),
    };

    let target_dir = portfolio.content_dir.join(kind.collection());
    fs::create_dir_all(&target_dir)?;
    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    // A site-level template overrides the built-in one
    let custom = portfolio
        .base_dir
        .join("templates")
        .join(format!("{}-template.md", kind.collection().trim_end_matches('s')));
    let template = if custom.exists() {
        fs::read_to_string(&custom)?
    } else {
        template_for(kind).to_string()
    };

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let content = template
        .replace("{{TITLE}}", &title)
        .replace("{{SLUG}}", slug)
        .replace("{{DATE}}", &today);
    fs::write(&file_path, content)?;

    let assets_dir = portfolio
        .static_dir
        .join("assets")
        .join(kind.collection())
        .join(slug);
    fs::create_dir_all(&assets_dir)?;

    tracing::info!("Created: {:?}", file_path);
    tracing::info!("Drop assets into {:?} before publishing", assets_dir);
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::loader::ContentLoader;
    use tempfile::TempDir;

    #[test]
    fn test_title_from_slug() {
        assert_eq!(title_from_slug("my-first_post"), "My First Post");
        assert_eq!(title_from_slug("rust"), "Rust");
        assert_eq!(title_from_slug("a--b"), "A B");
    }

    #[test]
    fn test_created_blog_loads() {
        let tmp = TempDir::new().unwrap();
        let portfolio = Portfolio::with_config(tmp.path(), SiteConfig::default());

        let path = create_entry(&portfolio, EntryKind::Blog, "hello-rust", None).unwrap();
        assert!(path.ends_with("content/blogs/hello-rust.md"));
        assert!(tmp.path().join("static/assets/blogs/hello-rust").is_dir());

        let posts = ContentLoader::new(&portfolio).load_blogs().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Hello Rust");
    }

    #[test]
    fn test_project_and_toy_templates_load() {
        let tmp = TempDir::new().unwrap();
        let portfolio = Portfolio::with_config(tmp.path(), SiteConfig::default());
        create_entry(&portfolio, EntryKind::Project, "engine", Some("Game Engine")).unwrap();
        create_entry(&portfolio, EntryKind::Toy, "tiny", None).unwrap();

        let loader = ContentLoader::new(&portfolio);
        assert_eq!(loader.load_projects().unwrap()[0].title, "Game Engine");
        assert_eq!(loader.load_toys().unwrap()[0].title, "Tiny");
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let portfolio = Portfolio::with_config(tmp.path(), SiteConfig::default());
        create_entry(&portfolio, EntryKind::Toy, "tiny", None).unwrap();
        assert!(create_entry(&portfolio, EntryKind::Toy, "tiny", None).is_err());
        assert!(create_entry(&portfolio, EntryKind::Toy, "../escape", None).is_err());
    }

    #[test]
    fn test_slug_is_normalized() {
        let tmp = TempDir::new().unwrap();
        let portfolio = Portfolio::with_config(tmp.path(), SiteConfig::default());
        let path = create_entry(&portfolio, EntryKind::Blog, "Hello World", None).unwrap();
        assert!(path.ends_with("content/blogs/hello-world.md"));
        let posts = ContentLoader::new(&portfolio).load_blogs().unwrap();
        assert_eq!(posts[0].title, "Hello World");
    }
}
