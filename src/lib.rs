//! portfolio-ssg: static site generator for a developer portfolio
//!
//! Content comes from a headless CMS with a built-in mock fallback,
//! optionally merged with local markdown collections, and is rendered
//! through embedded Tera templates.

pub mod cms;
pub mod commands;
pub mod config;
pub mod contact;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod music;
pub mod palette;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main application handle
#[derive(Clone)]
pub struct Portfolio {
    /// Site configuration, with environment overrides applied
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Local markdown collections
    pub content_dir: PathBuf,
    /// Files copied verbatim into the output
    pub static_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Portfolio {
    /// Load a site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");
        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();
        Ok(Self::with_config(base_dir, config))
    }

    /// Build a handle around an already resolved configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        Self {
            content_dir: base_dir.join(&config.content_dir),
            static_dir: base_dir.join(&config.static_dir),
            public_dir: base_dir.join(&config.public_dir),
            config,
            base_dir,
        }
    }

    /// Content client for the configured CMS project (mock mode without one)
    pub fn content_client(&self) -> Result<cms::ContentClient> {
        Ok(cms::ContentClient::new(&self.config.cms)?)
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Scaffold a new blog post, project or toy
    pub fn new_entry(&self, kind: commands::new::EntryKind, slug: &str, title: Option<&str>) -> Result<PathBuf> {
        commands::new::create_entry(self, kind, slug, title)
    }
}
