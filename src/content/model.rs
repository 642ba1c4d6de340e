//! Content records read from the CMS, the mock provider or local collections

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;

use super::portable_text::{self, RichText};

/// URL-safe document identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    pub current: String,
}

impl Slug {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }
}

/// Reference to an uploaded asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref")]
    pub reference: String,
}

/// An image field: either a CMS asset reference or a literal URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl ImageRef {
    pub fn from_url(url: impl Into<String>, alt: Option<String>) -> Self {
        Self {
            asset: None,
            url: Some(url.into()),
            alt,
            caption: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: Slug,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub content: RichText,
    /// Pre-rendered body for posts from local markdown collections
    #[serde(default, skip_deserializing)]
    pub body_html: Option<String>,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "_updatedAt", deserialize_with = "flexible_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub featured: bool,
    #[serde(default)]
    pub cover_image: Option<ImageRef>,
    #[serde(default)]
    pub reading_time: Option<u32>,
    #[serde(default)]
    pub external_url: Option<String>,
}

impl BlogPost {
    /// Rendered HTML body, from local markdown or portable text
    pub fn body(&self) -> String {
        match &self.body_html {
            Some(html) => html.clone(),
            None => portable_text::to_html(&self.content),
        }
    }

    /// Reading time in minutes, computed when the CMS did not supply one
    pub fn reading_minutes(&self) -> u32 {
        match self.reading_time {
            Some(minutes) if minutes > 0 => minutes,
            _ => super::reading_time::calculate(&portable_text::to_plain_text(&self.content)),
        }
    }
}

/// Titled link on a project page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: Slug,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub long_description: RichText,
    #[serde(default, skip_deserializing)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default, deserialize_with = "null_default")]
    pub technologies: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_default")]
    pub featured: bool,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub team_size: Option<u32>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub sort_order: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub gallery: Vec<ImageRef>,
    #[serde(default, deserialize_with = "null_default")]
    pub links: Vec<ProjectLink>,
}

impl Project {
    pub fn body(&self) -> String {
        match &self.body_html {
            Some(html) => html.clone(),
            None => portable_text::to_html(&self.long_description),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToyProject {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: Slug,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub technologies: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub category: String,
    #[serde(default, deserialize_with = "flexible_date")]
    pub created_at: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_default")]
    pub featured: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub description: RichText,
    #[serde(default, deserialize_with = "flexible_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_default")]
    pub current: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub company_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(rename = "_id")]
    pub id: String,
    pub degree: String,
    #[serde(default)]
    pub field: Option<String>,
    pub institution: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub gpa: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub honors: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub activities: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub relevant_courses: Vec<String>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_default")]
    pub current: bool,
    #[serde(default)]
    pub institution_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_default")]
    pub proficiency: String,
    #[serde(default, deserialize_with = "null_default")]
    pub proficiency_score: u8,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<f32>,
    #[serde(default, deserialize_with = "null_default")]
    pub certifications: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub projects: Vec<String>,
    #[serde(default)]
    pub icon: Option<ImageRef>,
    #[serde(default, deserialize_with = "null_default")]
    pub featured: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub sort_order: i64,
}

/// Display label for a skill category value
pub fn skill_category_label(value: &str) -> &str {
    match value {
        "programming" => "Programming Languages",
        "frameworks" => "Frameworks & Libraries",
        "tools" => "Tools & Technologies",
        "databases" => "Databases",
        "cloud" => "Cloud & DevOps",
        "design" => "Design & UI/UX",
        "soft" => "Soft Skills",
        "other" => "Other",
        other => other,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_image: Option<ImageRef>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub youtube: Option<String>,
    pub dribbble: Option<String>,
    pub behance: Option<String>,
}

impl SocialLinks {
    /// Configured links as (platform, url) pairs, in display order
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("GitHub", &self.github),
            ("LinkedIn", &self.linkedin),
            ("Twitter", &self.twitter),
            ("Instagram", &self.instagram),
            ("Facebook", &self.facebook),
            ("YouTube", &self.youtube),
            ("Dribbble", &self.dribbble),
            ("Behance", &self.behance),
        ]
        .into_iter()
        .filter_map(|(name, url)| {
            url.as_deref()
                .filter(|u| !u.is_empty())
                .map(|u| (name, u))
        })
        .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub availability: Option<String>,
    pub preferred_contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,
    pub href: String,
    #[serde(default)]
    pub external: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeSettings {
    pub primary_color: Option<String>,
    pub dark_mode: bool,
    pub animations_enabled: bool,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: None,
            dark_mode: false,
            animations_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Analytics {
    pub google_analytics: Option<String>,
    pub gtag: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub site_description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub site_keywords: Vec<String>,
    #[serde(default)]
    pub og_image: Option<ImageRef>,
    #[serde(default)]
    pub favicon: Option<ImageRef>,
    #[serde(default, deserialize_with = "null_default")]
    pub author: Author,
    #[serde(default, deserialize_with = "null_default")]
    pub social_links: SocialLinks,
    #[serde(default, deserialize_with = "null_default")]
    pub contact: ContactInfo,
    #[serde(default, deserialize_with = "null_default")]
    pub navigation: Vec<NavItem>,
    #[serde(default, deserialize_with = "null_default")]
    pub theme: ThemeSettings,
    #[serde(default, deserialize_with = "null_default")]
    pub analytics: Analytics,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

// Orderings matching the CMS `order()` clauses

/// Newest first; undated posts last
pub fn sort_posts(posts: &mut [BlogPost]) {
    posts.sort_by(|a, b| desc_option(&a.published_at, &b.published_at));
}

/// Featured first, then ascending sort order
pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by(|a, b| {
        b.featured
            .cmp(&a.featured)
            .then(a.sort_order.cmp(&b.sort_order))
    });
}

pub fn sort_toy_projects(toys: &mut [ToyProject]) {
    toys.sort_by(|a, b| {
        b.featured
            .cmp(&a.featured)
            .then(a.sort_order.cmp(&b.sort_order))
    });
}

pub fn sort_experience(items: &mut [Experience]) {
    items.sort_by(|a, b| desc_option(&a.start_date, &b.start_date));
}

pub fn sort_education(items: &mut [Education]) {
    items.sort_by(|a, b| desc_option(&a.start_date, &b.start_date));
}

/// Category ascending, then highest proficiency first
pub fn sort_skills(skills: &mut [Skill]) {
    skills.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then(b.proficiency_score.cmp(&a.proficiency_score))
    });
}

fn desc_option<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// Lenient field decoding

/// Treat an explicit `null` like a missing field
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept `YYYY-MM-DD` or a full RFC 3339 timestamp for date fields
fn flexible_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

/// Accept a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date
fn flexible_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_datetime))
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date_naive()))
}

pub(crate) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_cms_blog_post() {
        let json = serde_json::json!({
            "_id": "post-1",
            "title": "Hello",
            "slug": {"_type": "slug", "current": "hello"},
            "excerpt": null,
            "publishedAt": "2024-03-01T12:00:00Z",
            "tags": null,
            "featured": true,
            "readingTime": 4,
            "content": [
                {"_type": "block", "_key": "a", "style": "normal",
                 "children": [{"_type": "span", "_key": "b", "text": "Hi there"}]}
            ]
        });
        let post: BlogPost = serde_json::from_value(json).unwrap();
        assert_eq!(post.slug.current, "hello");
        assert!(post.tags.is_empty());
        assert!(post.featured);
        assert_eq!(post.reading_minutes(), 4);
        assert_eq!(
            post.published_at.unwrap().format("%Y-%m-%d").to_string(),
            "2024-03-01"
        );
        assert!(post.body().contains("<p>Hi there</p>"));
    }

    #[test]
    fn test_date_fields_accept_datetime() {
        let json = serde_json::json!({
            "_id": "p",
            "title": "P",
            "slug": {"current": "p"},
            "startDate": "2023-05-01",
            "endDate": "2024-01-02T08:00:00.000Z"
        });
        let project: Project = serde_json::from_value(json).unwrap();
        assert_eq!(project.start_date, NaiveDate::from_ymd_opt(2023, 5, 1));
        assert_eq!(project.end_date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert!(project.technologies.is_empty());
    }

    #[test]
    fn test_sort_projects_featured_then_order() {
        let make = |id: &str, featured: bool, order: i64| Project {
            id: id.to_string(),
            title: id.to_string(),
            slug: Slug::new(id),
            description: String::new(),
            long_description: Vec::new(),
            body_html: None,
            image: None,
            technologies: Vec::new(),
            category: String::new(),
            status: String::new(),
            featured,
            live_url: None,
            github_url: None,
            start_date: None,
            end_date: None,
            team_size: None,
            role: None,
            sort_order: order,
            gallery: Vec::new(),
            links: Vec::new(),
        };
        let mut projects = vec![make("a", false, 1), make("b", true, 5), make("c", true, 2)];
        sort_projects(&mut projects);
        let ids: Vec<_> = projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_social_links_entries() {
        let links = SocialLinks {
            github: Some("https://github.com/x".to_string()),
            twitter: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(links.entries(), vec![("GitHub", "https://github.com/x")]);
    }

    #[test]
    fn test_skill_category_label() {
        assert_eq!(skill_category_label("cloud"), "Cloud & DevOps");
        assert_eq!(skill_category_label("quantum"), "quantum");
    }
}
