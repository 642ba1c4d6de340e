//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::music::Song;

/// Placeholder project id shipped in starter configs; treated as unset
const PLACEHOLDER_PROJECT_ID: &str = "your-project-id";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub keywords: Option<Vec<String>>,
    pub author: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub static_dir: String,
    pub public_dir: String,

    // Feed
    pub feed_limit: usize,

    /// PDF embedded on /resume/
    pub resume_url: String,

    #[serde(default)]
    pub cms: CmsConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub music: MusicConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            keywords: None,
            author: "Jack Luo".to_string(),
            language: "en".to_string(),
            timezone: String::new(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            feed_limit: 20,
            resume_url: "https://github.com/thejackluo/resume/raw/main/resume.pdf".to_string(),

            cms: CmsConfig::default(),
            contact: ContactConfig::default(),
            music: MusicConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides from an arbitrary lookup
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SANITY_PROJECT_ID") {
            self.cms.project_id = Some(v);
        }
        if let Some(v) = get("SANITY_DATASET") {
            self.cms.dataset = v;
        }
        if let Some(v) = get("SANITY_API_TOKEN") {
            self.cms.token = Some(v);
        }
        if let Some(v) = get("SITE_URL") {
            self.url = v;
        }
        if let Some(v) = get("EMAILJS_SERVICE_ID") {
            self.contact.service_id = Some(v);
        }
        if let Some(v) = get("EMAILJS_TEMPLATE_ID") {
            self.contact.template_id = Some(v);
        }
        if let Some(v) = get("EMAILJS_USER_ID") {
            self.contact.user_id = Some(v);
        }
    }

    /// Resolve the configured timezone, falling back to UTC
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }
}

/// Headless CMS connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    pub project_id: Option<String>,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub token: Option<String>,
    /// Overrides `https://{project}.api.sanity.io` (proxies, tests)
    pub api_host: Option<String>,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            dataset: "production".to_string(),
            api_version: "2023-05-03".to_string(),
            use_cdn: false,
            token: None,
            api_host: None,
            timeout: 10,
        }
    }
}

impl CmsConfig {
    /// The project id, unless it is missing, blank or the starter placeholder
    pub fn project_id(&self) -> Option<&str> {
        self.project_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && *id != PLACEHOLDER_PROJECT_ID)
    }

    /// Whether queries should go to the CMS at all
    pub fn is_configured(&self) -> bool {
        self.project_id().is_some()
    }
}

/// Contact form mail relay (EmailJS)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub user_id: Option<String>,
    pub endpoint: String,
    pub to_name: String,
    /// Address shown when the relay is not configured
    pub fallback_email: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            service_id: None,
            template_id: None,
            user_id: None,
            endpoint: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            to_name: "Jack Luo".to_string(),
            fallback_email: "jack@hexahacks.com".to_string(),
        }
    }
}

/// Music player widget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    pub enable: bool,
    pub songs: Vec<Song>,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            enable: true,
            songs: crate::music::default_playlist(),
        }
    }
}
