//! Initialize a new portfolio site

use anyhow::Result;
use std::fs;
use std::path::Path;

use super::new::{template_for, EntryKind};

const CONFIG_TEMPLATE: &str = r#"# Portfolio configuration
# Environment variables override the matching keys:
#   SANITY_PROJECT_ID, SANITY_DATASET, SANITY_API_TOKEN, SITE_URL,
#   EMAILJS_SERVICE_ID, EMAILJS_TEMPLATE_ID, EMAILJS_USER_ID

# Site
title: Jack Luo - Portfolio
description: Projects, writing and the journey so far
keywords:
  - portfolio
  - developer
author: Jack Luo
language: en
timezone: ''

# URL
url: http://localhost:4000
root: /

# Directory
content_dir: content
static_dir: static
public_dir: public

# Feed
feed_limit: 20

# Headless CMS; leave project_id unset to build from sample content
cms:
  project_id: your-project-id
  dataset: production
  api_version: '2023-05-03'
  use_cdn: false

# Contact form relay (EmailJS)
contact:
  to_name: Jack Luo
  fallback_email: jack@hexahacks.com

# Music player
music:
  enable: true
"#;

const SAMPLE_POST: &str = r#"---
title: Hello World
publishDate: {{DATE}}
tags:
  - notes
excerpt: The first post on a freshly initialized portfolio.
heroImage: /assets/blogs/hello-world/hero.png
---

Welcome! Posts in `content/blogs/` are merged with posts from the CMS.

## Quick start

```bash
$ portfolio-ssg new blog my-next-post
$ portfolio-ssg server
```
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    for dir in [
        "content/blogs",
        "content/projects",
        "content/toys",
        "static/assets/images",
        "templates",
    ] {
        fs::create_dir_all(target_dir.join(dir))?;
    }

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        tracing::warn!("Keeping existing {:?}", config_path);
    } else {
        fs::write(&config_path, CONFIG_TEMPLATE)?;
    }

    // Scaffolds used by `new`; editable per site
    for (name, body) in [
        ("blog-template.md", template_for(EntryKind::Blog)),
        ("project-template.md", template_for(EntryKind::Project)),
        ("toy-template.md", template_for(EntryKind::Toy)),
    ] {
        let path = target_dir.join("templates").join(name);
        if !path.exists() {
            fs::write(path, body)?;
        }
    }

    let sample = target_dir.join("content/blogs/hello-world.md");
    if !sample.exists() {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        fs::write(sample, SAMPLE_POST.replace("{{DATE}}", &today))?;
    }

    Ok(())
}
