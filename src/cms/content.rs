//! Typed content queries with mock fallback.
//!
//! Every operation makes at most one request. When no project is configured
//! the mock provider answers directly; when a request fails the error is
//! logged and lists fall back to mock data while single-item lookups
//! return `None`.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use super::client::{QueryParams, SanityClient};
use super::{queries, Result};
use crate::config::CmsConfig;
use crate::content::model::{self, BlogPost, Education, Experience, Project, SiteSettings, Skill, ToyProject};
use crate::content::mock;

/// Featured posts shown on the home page
const FEATURED_POST_LIMIT: usize = 3;

/// Skills grouped by category value, in first-seen order
pub type SkillGroups = IndexMap<String, Vec<Skill>>;

#[derive(Debug, Clone)]
pub struct ContentClient {
    cms: Option<SanityClient>,
}

impl ContentClient {
    /// Connect to the configured project, or run on mock data when there is none
    pub fn new(config: &CmsConfig) -> Result<Self> {
        if !config.is_configured() {
            tracing::info!("CMS project id not set, serving mock content");
            return Ok(Self::offline());
        }
        let cms = SanityClient::new(config)?;
        tracing::info!("CMS endpoint: {}", cms.endpoint());
        Ok(Self { cms: Some(cms) })
    }

    pub fn offline() -> Self {
        Self { cms: None }
    }

    /// Whether queries go to the CMS
    pub fn is_live(&self) -> bool {
        self.cms.is_some()
    }

    async fn list<T, F>(&self, label: &str, query: &str, fallback: F) -> Vec<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        let Some(cms) = &self.cms else {
            return fallback();
        };
        match cms.fetch::<Option<Vec<T>>>(query, &QueryParams::new()).await {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                tracing::error!("Error fetching {}: {}", label, e);
                fallback()
            }
        }
    }

    async fn by_slug<T, F>(&self, label: &str, query: &str, slug: &str, fallback: F) -> Option<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Option<T>,
    {
        let Some(cms) = &self.cms else {
            return fallback();
        };
        let mut params = QueryParams::new();
        params.insert("slug".to_string(), serde_json::Value::from(slug));
        match cms.fetch::<Option<T>>(query, &params).await {
            Ok(item) => item,
            Err(e) => {
                tracing::error!("Error fetching {} '{}': {}", label, slug, e);
                None
            }
        }
    }

    pub async fn blog_posts(&self) -> Vec<BlogPost> {
        self.list("blog posts", queries::BLOG_POSTS, mock::blog_posts)
            .await
    }

    pub async fn blog_post(&self, slug: &str) -> Option<BlogPost> {
        self.by_slug("blog post", queries::BLOG_POST, slug, || {
            mock::blog_posts()
                .into_iter()
                .find(|p| p.slug.current == slug)
        })
        .await
    }

    pub async fn featured_blog_posts(&self) -> Vec<BlogPost> {
        self.list("featured blog posts", queries::FEATURED_BLOG_POSTS, || {
            mock::blog_posts()
                .into_iter()
                .filter(|p| p.featured)
                .take(FEATURED_POST_LIMIT)
                .collect()
        })
        .await
    }

    pub async fn projects(&self) -> Vec<Project> {
        self.list("projects", queries::PROJECTS, mock::projects).await
    }

    pub async fn project(&self, slug: &str) -> Option<Project> {
        self.by_slug("project", queries::PROJECT, slug, || {
            mock::projects().into_iter().find(|p| p.slug.current == slug)
        })
        .await
    }

    pub async fn featured_projects(&self) -> Vec<Project> {
        self.list("featured projects", queries::FEATURED_PROJECTS, || {
            mock::projects().into_iter().filter(|p| p.featured).collect()
        })
        .await
    }

    pub async fn toy_projects(&self) -> Vec<ToyProject> {
        self.list("toy projects", queries::TOY_PROJECTS, mock::toy_projects)
            .await
    }

    pub async fn experience(&self) -> Vec<Experience> {
        self.list("experience", queries::EXPERIENCE, mock::experience)
            .await
    }

    pub async fn education(&self) -> Vec<Education> {
        self.list("education", queries::EDUCATION, mock::education)
            .await
    }

    pub async fn skills(&self) -> Vec<Skill> {
        self.list("skills", queries::SKILLS, mock::skills).await
    }

    pub async fn skills_by_category(&self) -> SkillGroups {
        let skills = self
            .list("skills by category", queries::SKILLS_BY_CATEGORY, || {
                let mut skills = mock::skills();
                skills.sort_by(|a, b| b.proficiency_score.cmp(&a.proficiency_score));
                skills
            })
            .await;
        group_skills(skills)
    }

    pub async fn site_settings(&self) -> SiteSettings {
        let Some(cms) = &self.cms else {
            return mock::site_settings();
        };
        match cms
            .fetch::<Option<SiteSettings>>(queries::SITE_SETTINGS, &QueryParams::new())
            .await
        {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                tracing::warn!("No site settings document in the CMS, using defaults");
                mock::site_settings()
            }
            Err(e) => {
                tracing::error!("Error fetching site settings: {}", e);
                mock::site_settings()
            }
        }
    }
}

/// Group skills by category, keeping the order categories first appear in
pub fn group_skills(skills: Vec<Skill>) -> SkillGroups {
    let mut groups = SkillGroups::new();
    for skill in skills {
        let key = if skill.category.is_empty() {
            "other".to_string()
        } else {
            skill.category.clone()
        };
        groups.entry(key).or_default().push(skill);
    }
    groups
}

/// Display label for a group key
pub fn group_label(category: &str) -> &str {
    model::skill_category_label(category)
}
