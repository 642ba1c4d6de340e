//! Page metadata (Open Graph, Twitter cards) and JSON-LD structured data

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::SiteConfig;
use crate::content::{BlogPost, Project, SiteSettings};

/// Shared social card used when a page has no image of its own
pub const DEFAULT_OG_IMAGE: &str = "/assets/images/og-default.jpg";

#[derive(Debug, Clone, Serialize)]
pub struct SeoData {
    pub title: String,
    pub description: String,
    /// Site-relative path
    pub url: String,
    pub canonical: String,
    pub image: String,
    /// Open Graph type: website, article or profile
    pub og_type: &'static str,
    pub author: String,
    pub published_time: Option<String>,
    pub modified_time: Option<String>,
    pub tags: Vec<String>,
}

impl SeoData {
    pub fn keywords(&self) -> String {
        self.tags.join(", ")
    }
}

/// Builds metadata for every page kind from the site identity
#[derive(Debug, Clone)]
pub struct Seo {
    base_url: String,
    author: String,
    site_name: String,
    language: String,
}

impl Seo {
    pub fn new(config: &SiteConfig, settings: &SiteSettings) -> Self {
        let author = if settings.author.name.trim().is_empty() {
            config.author.clone()
        } else {
            settings.author.name.clone()
        };
        Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            site_name: format!("{} Portfolio", author),
            author,
            language: config.language.clone(),
        }
    }

    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    fn image_or_default(&self, image: Option<&str>) -> String {
        self.absolute(image.unwrap_or(DEFAULT_OG_IMAGE))
    }

    fn data(&self, title: String, description: String, url: String, og_type: &'static str) -> SeoData {
        SeoData {
            canonical: self.absolute(&url),
            image: self.image_or_default(None),
            title,
            description,
            url,
            og_type,
            author: self.author.clone(),
            published_time: None,
            modified_time: None,
            tags: Vec::new(),
        }
    }

    pub fn homepage(&self, settings: &SiteSettings, image: Option<&str>) -> SeoData {
        let title = non_empty(&settings.site_title)
            .unwrap_or_else(|| format!("{} - Full-Stack Developer", self.author));
        let description = non_empty(&settings.site_description).unwrap_or_else(|| {
            format!("Projects, writing and the journey of {}.", self.author)
        });
        SeoData {
            image: self.image_or_default(image),
            tags: settings.site_keywords.clone(),
            ..self.data(title, description, "/".to_string(), "profile")
        }
    }

    /// Listing pages such as `/blogs/`
    pub fn page(&self, title: &str, description: &str, path: &str) -> SeoData {
        self.data(
            format!("{} | {}", title, self.author),
            description.to_string(),
            path.to_string(),
            "website",
        )
    }

    pub fn blog_post(&self, post: &BlogPost, image: Option<&str>) -> SeoData {
        let description = post
            .excerpt
            .as_deref()
            .and_then(non_empty)
            .unwrap_or_else(|| format!("Read {} by {}.", post.title, self.author));
        SeoData {
            image: self.image_or_default(image),
            published_time: post.published_at.map(|d| d.to_rfc3339()),
            modified_time: post.updated_at.map(|d| d.to_rfc3339()),
            tags: post.tags.clone(),
            ..self.data(
                format!("{} | {}", post.title, self.author),
                description,
                format!("/blogs/{}/", post.slug.current),
                "article",
            )
        }
    }

    pub fn project(&self, project: &Project, image: Option<&str>) -> SeoData {
        let description = non_empty(&project.description)
            .unwrap_or_else(|| format!("Explore {}, a project by {}.", project.title, self.author));
        SeoData {
            image: self.image_or_default(image),
            tags: project.technologies.clone(),
            ..self.data(
                format!("{} | {} Projects", project.title, self.author),
                description,
                format!("/projects/{}/", project.slug.current),
                "website",
            )
        }
    }

    fn person(&self) -> Value {
        json!({"@type": "Person", "name": self.author, "url": self.base_url})
    }

    pub fn person_json_ld(&self, settings: &SiteSettings) -> Value {
        let same_as: Vec<&str> = settings
            .social_links
            .entries()
            .into_iter()
            .map(|(_, url)| url)
            .collect();
        prune(json!({
            "@context": "https://schema.org",
            "@type": "Person",
            "name": self.author,
            "description": settings.author.bio,
            "url": self.base_url,
            "image": settings.author.profile_image.as_ref().and_then(|i| i.url.as_deref()).map(|u| self.absolute(u)),
            "sameAs": same_as,
            "email": settings.contact.email.as_ref().or(settings.author.email.as_ref()),
            "telephone": settings.contact.phone,
            "address": settings.contact.address.as_ref().map(|a| json!({
                "@type": "PostalAddress",
                "addressLocality": a,
            })),
        }))
    }

    pub fn blog_json_ld(&self, post: &BlogPost, image: Option<&str>) -> Value {
        let url = self.absolute(&format!("/blogs/{}/", post.slug.current));
        prune(json!({
            "@context": "https://schema.org",
            "@type": "BlogPosting",
            "headline": post.title,
            "description": post.excerpt,
            "image": self.image_or_default(image),
            "datePublished": post.published_at.map(|d| d.to_rfc3339()),
            "dateModified": post.updated_at.map(|d| d.to_rfc3339()),
            "author": self.person(),
            "publisher": self.person(),
            "mainEntityOfPage": {"@type": "WebPage", "@id": url},
            "keywords": (!post.tags.is_empty()).then(|| post.tags.join(", ")),
            "inLanguage": self.language,
        }))
    }

    pub fn project_json_ld(&self, project: &Project, image: Option<&str>) -> Value {
        let url = project
            .live_url
            .clone()
            .unwrap_or_else(|| self.absolute(&format!("/projects/{}/", project.slug.current)));
        prune(json!({
            "@context": "https://schema.org",
            "@type": "CreativeWork",
            "name": project.title,
            "description": non_empty(&project.description),
            "image": self.image_or_default(image),
            "url": url,
            "creator": self.person(),
            "dateCreated": project.start_date.map(|d| d.to_string()),
            "dateModified": project.end_date.map(|d| d.to_string()),
            "keywords": (!project.technologies.is_empty()).then(|| project.technologies.join(", ")),
            "genre": non_empty(&project.category),
            "codeRepository": project.github_url,
        }))
    }

    pub fn website_json_ld(&self, description: &str, year: i32) -> Value {
        prune(json!({
            "@context": "https://schema.org",
            "@type": "WebSite",
            "name": self.site_name,
            "description": non_empty(description),
            "url": self.base_url,
            "author": self.person(),
            "inLanguage": self.language,
            "copyrightYear": year,
            "copyrightHolder": {"@type": "Person", "name": self.author},
        }))
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Drop null members so absent fields are omitted from the markup
fn prune(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, prune(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(prune).collect()),
        other => other,
    }
}
