//! Generator module - renders the portfolio to static files using the
//! built-in Tera templates

mod content;
mod feed;

pub use content::{fetch_details, SiteContent};

use anyhow::{anyhow, Result};
use chrono::Datelike;
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tera::Context;
use walkdir::WalkDir;

use crate::content::model::{ImageRef, SiteSettings};
use crate::helpers::image::ImageOptions;
use crate::helpers::seo::{Seo, SeoData};
use crate::palette::PaletteView;
use crate::templates::view::SiteView;
use crate::templates::{TemplateRenderer, ViewBuilder, ASSETS};
use crate::Portfolio;
use feed::SitemapEntry;

/// Link to a neighbouring post
#[derive(Debug, Clone, Serialize)]
struct NavPost {
    title: String,
    href: String,
}

/// Static site generator using Tera templates
pub struct Generator {
    portfolio: Portfolio,
    renderer: TemplateRenderer,
    views: ViewBuilder,
}

/// Per-build values shared by every page
struct Build<'a> {
    content: &'a SiteContent,
    site: SiteView,
    seo: Seo,
    sitemap: Vec<SitemapEntry>,
}

impl Generator {
    /// Create a new generator
    pub fn new(portfolio: &Portfolio) -> Result<Self> {
        Ok(Self {
            portfolio: portfolio.clone(),
            renderer: TemplateRenderer::new()?,
            views: ViewBuilder::new(&portfolio.config),
        })
    }

    /// Render every route and artifact for already fetched content
    pub fn generate(&self, content: &SiteContent) -> Result<usize> {
        let public_dir = &self.portfolio.public_dir;
        fs::create_dir_all(public_dir)?;

        let config = &self.portfolio.config;
        let year = chrono::Utc::now().with_timezone(&config.tz()).year();
        let mut build = Build {
            content,
            site: self.views.site(config, &content.settings, year),
            seo: Seo::new(config, &content.settings),
            sitemap: Vec::new(),
        };

        self.render_assets(&build.site)?;
        self.generate_home(&mut build)?;
        self.generate_projects(&mut build)?;
        self.generate_blogs(&mut build)?;
        self.generate_journey(&mut build)?;
        self.generate_resume(&mut build)?;
        self.generate_contact(&mut build)?;
        self.generate_not_found(&build)?;

        let author = build.site.author.clone();
        self.write_file(
            "atom.xml",
            feed::atom(config, &author, &content.feed_posts()),
        )?;
        self.write_file("sitemap.xml", feed::sitemap(config, &build.sitemap))?;
        self.generate_commands(content)?;
        self.write_file(
            "playlist.json",
            serde_json::to_string_pretty(&config.music.songs)?,
        )?;

        self.copy_static_assets()?;

        let pages = build.sitemap.len() + 1;
        tracing::info!("Generated {} pages", pages);
        Ok(pages)
    }

    /// Create a base context with common variables
    fn base_context(&self, build: &Build, seo: &SeoData, json_ld: &[Value], path: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", &build.site);
        context.insert("seo", seo);
        let json_ld: Vec<String> = json_ld.iter().map(Value::to_string).collect();
        context.insert("json_ld", &json_ld);
        context.insert("current_path", path);
        context
    }

    /// Social card URL for an image field, cropped to 1200x630
    fn og_image(&self, image: Option<&ImageRef>) -> Option<String> {
        let opts = ImageOptions {
            width: Some(1200),
            height: Some(630),
            ..Default::default()
        };
        image.and_then(|img| self.views.images().url_with(img, &opts))
    }

    fn generate_home(&self, build: &mut Build) -> Result<()> {
        let content = build.content;
        let settings: &SiteSettings = &content.settings;
        let og = self.og_image(settings.og_image.as_ref());
        let seo = build.seo.homepage(settings, og.as_deref());
        let json_ld = [
            build.seo.person_json_ld(settings),
            build.seo.website_json_ld(&build.site.description, build.site.year),
        ];

        let mut context = self.base_context(build, &seo, &json_ld, "/");
        let featured_projects: Vec<_> = content
            .featured_projects
            .iter()
            .map(|p| self.views.project(p, false))
            .collect();
        let featured_posts: Vec<_> = content
            .featured_posts
            .iter()
            .map(|p| self.views.post(p, false))
            .collect();
        context.insert("featured_projects", &featured_projects);
        context.insert("featured_posts", &featured_posts);
        context.insert("skill_groups", &self.views.skill_groups(&content.skill_groups));

        self.write_page(build, "home.html", &context, "/", 1.0)
    }

    fn generate_projects(&self, build: &mut Build) -> Result<()> {
        let content = build.content;
        let seo = build.seo.page(
            "Projects",
            "Projects I have designed, built and shipped.",
            "/projects/",
        );
        let mut context = self.base_context(build, &seo, &[], "/projects/");
        let projects: Vec<_> = content
            .projects
            .iter()
            .map(|p| self.views.project(p, false))
            .collect();
        let toys: Vec<_> = content.toys.iter().map(|t| self.views.toy(t)).collect();
        context.insert("projects", &projects);
        context.insert("toys", &toys);
        self.write_page(build, "projects.html", &context, "/projects/", 0.8)?;

        for project in &content.project_pages {
            let view = self.views.project(project, true);
            let og = self.og_image(project.image.as_ref());
            let seo = build.seo.project(project, og.as_deref());
            let json_ld = [build.seo.project_json_ld(project, og.as_deref())];
            let mut context = self.base_context(build, &seo, &json_ld, &view.href);
            context.insert("project", &view);
            self.write_page(build, "project.html", &context, &view.href, 0.7)?;
        }
        Ok(())
    }

    fn generate_blogs(&self, build: &mut Build) -> Result<()> {
        let content = build.content;
        let seo = build.seo.page(
            "Writing",
            "Notes on building, learning and everything in between.",
            "/blogs/",
        );
        let mut context = self.base_context(build, &seo, &[], "/blogs/");
        let posts: Vec<_> = content
            .posts
            .iter()
            .map(|p| self.views.post(p, false))
            .collect();
        let tags: IndexSet<&str> = content
            .posts
            .iter()
            .flat_map(|p| p.tags.iter().map(String::as_str))
            .collect();
        context.insert("posts", &posts);
        context.insert("tags", &tags);
        self.write_page(build, "blogs.html", &context, "/blogs/", 0.8)?;

        let pages = &content.post_pages;
        for (i, post) in pages.iter().enumerate() {
            let view = self.views.post(post, true);
            let path = crate::helpers::entry_path("blogs", &post.slug.current);
            // Newest first: the previous post is the older one
            let prev_post = pages.get(i + 1).map(|p| NavPost {
                title: p.title.clone(),
                href: crate::helpers::entry_path("blogs", &p.slug.current),
            });
            let next_post = i.checked_sub(1).and_then(|j| pages.get(j)).map(|p| NavPost {
                title: p.title.clone(),
                href: crate::helpers::entry_path("blogs", &p.slug.current),
            });

            let og = self.og_image(post.cover_image.as_ref());
            let seo = build.seo.blog_post(post, og.as_deref());
            let json_ld = [build.seo.blog_json_ld(post, og.as_deref())];
            let mut context = self.base_context(build, &seo, &json_ld, &path);
            context.insert("post", &view);
            if let Some(prev) = &prev_post {
                context.insert("prev_post", prev);
            }
            if let Some(next) = &next_post {
                context.insert("next_post", next);
            }
            self.write_page(build, "blog.html", &context, &path, 0.6)?;

            if let Some(entry) = build.sitemap.last_mut() {
                entry.lastmod = post.updated_at.or(post.published_at);
            }
        }
        Ok(())
    }

    fn generate_journey(&self, build: &mut Build) -> Result<()> {
        let content = build.content;
        let seo = build
            .seo
            .page("Journey", "Projects and experience along the way.", "/journey/");
        let mut context = self.base_context(build, &seo, &[], "/journey/");
        let projects: Vec<_> = content
            .projects
            .iter()
            .map(|p| self.views.project(p, false))
            .collect();
        let experience: Vec<_> = content
            .experience
            .iter()
            .map(|e| self.views.experience(e))
            .collect();
        let toys: Vec<_> = content.toys.iter().map(|t| self.views.toy(t)).collect();
        context.insert("projects", &projects);
        context.insert("experience", &experience);
        context.insert("toys", &toys);
        self.write_page(build, "journey.html", &context, "/journey/", 0.7)
    }

    fn generate_resume(&self, build: &mut Build) -> Result<()> {
        let content = build.content;
        let seo = build.seo.page(
            "Resume",
            &format!("{}'s resume: experience, education and skills.", build.site.author),
            "/resume/",
        );
        let mut context = self.base_context(build, &seo, &[], "/resume/");
        let experience: Vec<_> = content
            .experience
            .iter()
            .map(|e| self.views.experience(e))
            .collect();
        let education: Vec<_> = content
            .education
            .iter()
            .map(|e| self.views.education(e))
            .collect();
        context.insert("experience", &experience);
        context.insert("education", &education);
        context.insert("skill_groups", &self.views.skill_groups(&content.skill_groups));
        context.insert("resume_url", &self.portfolio.config.resume_url);
        self.write_page(build, "resume.html", &context, "/resume/", 0.7)
    }

    fn generate_contact(&self, build: &mut Build) -> Result<()> {
        let seo = build.seo.page(
            "Contact",
            &format!("Get in touch with {}.", build.site.author),
            "/contact/",
        );
        let mut context = self.base_context(build, &seo, &[], "/contact/");
        let fallback_email = build
            .site
            .email
            .clone()
            .unwrap_or_else(|| self.portfolio.config.contact.fallback_email.clone());
        context.insert("fallback_email", &fallback_email);
        self.write_page(build, "contact.html", &context, "/contact/", 0.5)
    }

    fn generate_not_found(&self, build: &Build) -> Result<()> {
        let seo = build.seo.page(
            "Page Not Found",
            "The page you're looking for doesn't exist or has been moved.",
            "/404.html",
        );
        let context = self.base_context(build, &seo, &[], "/404.html");
        let html = self.renderer.render("404.html", &context)?;
        self.write_file("404.html", html)
    }

    /// commands.json: the palette's unfiltered, grouped command list
    fn generate_commands(&self, content: &SiteContent) -> Result<()> {
        let commands = content.commands();
        let view = PaletteView::search(&commands, "");
        self.write_file("commands.json", serde_json::to_string(&view)?)
    }

    fn render_assets(&self, site: &SiteView) -> Result<()> {
        let mut context = Context::new();
        context.insert("site", site);
        for (template, output) in ASSETS {
            let rendered = self.renderer.render(template, &context)?;
            self.write_file(output, rendered)?;
        }
        Ok(())
    }

    /// Render a route to `<route>/index.html` and record it for the sitemap
    fn write_page(
        &self,
        build: &mut Build,
        template: &str,
        context: &Context,
        route: &str,
        priority: f32,
    ) -> Result<()> {
        let html = self.renderer.render(template, context)?;
        let relative = format!("{}/index.html", route.trim_matches('/'));
        self.write_file(relative.trim_start_matches('/'), html)?;
        build.sitemap.push(SitemapEntry::new(route, priority));
        Ok(())
    }

    fn write_file(&self, relative: &str, contents: String) -> Result<()> {
        let output_path = self.output_path(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, contents)
            .map_err(|e| anyhow!("Failed to write {:?}: {}", output_path, e))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    fn output_path(&self, relative: &str) -> PathBuf {
        self.portfolio.public_dir.join(relative)
    }

    /// Copy the static directory verbatim into the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.portfolio.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            // Dotfiles such as .DS_Store stay behind
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'))
            {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.portfolio.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
            copied += 1;
        }

        tracing::debug!("Copied {} static files", copied);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::ContentClient;
    use crate::config::SiteConfig;
    use crate::content::loader::ContentLoader;
    use tempfile::TempDir;

    async fn build_site(tmp: &TempDir) -> Portfolio {
        let config = SiteConfig {
            url: "https://jack-luo.com".to_string(),
            ..Default::default()
        };
        let portfolio = Portfolio::with_config(tmp.path(), config);
        fs::create_dir_all(portfolio.static_dir.join("assets/images")).unwrap();
        fs::write(portfolio.static_dir.join("assets/images/me.png"), b"png").unwrap();
        fs::write(portfolio.static_dir.join(".DS_Store"), b"x").unwrap();

        let loader = ContentLoader::new(&portfolio);
        let content = SiteContent::load(&ContentClient::offline(), &loader).await;
        Generator::new(&portfolio).unwrap().generate(&content).unwrap();
        portfolio
    }

    #[tokio::test]
    async fn test_generate_offline_site() {
        let tmp = TempDir::new().unwrap();
        let portfolio = build_site(&tmp).await;
        let public = &portfolio.public_dir;

        for route in [
            "index.html",
            "projects/index.html",
            "projects/portfolio-site/index.html",
            "blogs/index.html",
            "blogs/hello-world/index.html",
            "journey/index.html",
            "resume/index.html",
            "contact/index.html",
            "404.html",
            "atom.xml",
            "sitemap.xml",
            "commands.json",
            "playlist.json",
            "css/site.css",
            "js/palette.js",
        ] {
            assert!(public.join(route).exists(), "missing {}", route);
        }

        assert!(public.join("assets/images/me.png").exists());
        assert!(!public.join(".DS_Store").exists());
    }

    #[tokio::test]
    async fn test_pages_carry_content_and_metadata() {
        let tmp = TempDir::new().unwrap();
        let portfolio = build_site(&tmp).await;
        let public = &portfolio.public_dir;

        let home = fs::read_to_string(public.join("index.html")).unwrap();
        assert!(home.contains("<h1 class=\"hero-name\">Jack Luo</h1>"));
        assert!(home.contains("application/ld+json"));
        assert!(home.contains("Portfolio Site"));

        let post = fs::read_to_string(public.join("blogs/hello-world/index.html")).unwrap();
        assert!(post.contains("<h2>Why a portfolio</h2>"));
        assert!(post.contains("<link rel=\"canonical\" href=\"https://jack-luo.com/blogs/hello-world/\">"));
        assert!(post.contains("BlogPosting"));

        let sitemap = fs::read_to_string(public.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://jack-luo.com/journey/</loc>"));
        assert!(!sitemap.contains("404"));
    }

    #[tokio::test]
    async fn test_commands_json_is_grouped() {
        let tmp = TempDir::new().unwrap();
        let portfolio = build_site(&tmp).await;

        let raw = fs::read_to_string(portfolio.public_dir.join("commands.json")).unwrap();
        let view: Value = serde_json::from_str(&raw).unwrap();
        let groups = view["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 6);
        assert_eq!(groups[0]["label"], "Navigation");
        assert!(view["total"].as_u64().unwrap() > 0);

        let playlist = fs::read_to_string(portfolio.public_dir.join("playlist.json")).unwrap();
        let songs: Vec<Value> = serde_json::from_str(&playlist).unwrap();
        assert_eq!(songs.len(), 7);
    }
}
