//! Template-facing view data built from content records

use chrono_tz::Tz;
use serde::Serialize;

use crate::cms::{group_label, ImageUrlBuilder, SkillGroups};
use crate::config::SiteConfig;
use crate::content::model::{NavItem, ProjectLink};
use crate::content::portable_text;
use crate::content::{
    reading_time, BlogPost, Education, Experience, ImageRef, Project, SiteSettings, ToyProject,
};
use crate::helpers::image::{
    blur_placeholder, loading_strategy, responsive_srcset, ImageOptions, DEFAULT_SIZES,
};
use crate::helpers::{date_range, entry_path, format_date, month_year};

#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    pub src: String,
    pub srcset: String,
    pub placeholder: String,
    pub alt: String,
    pub caption: Option<String>,
    pub loading: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub slug: String,
    /// Where a card links to: the post page or its external URL
    pub href: String,
    pub external: bool,
    pub excerpt: String,
    pub date: String,
    pub date_iso: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub reading_time: String,
    pub cover: Option<ImageView>,
    /// Rendered body; empty for listing cards
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub title: String,
    pub slug: String,
    pub href: String,
    pub description: String,
    pub content: String,
    pub image: Option<ImageView>,
    pub technologies: Vec<String>,
    pub category: String,
    pub status: String,
    pub featured: bool,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub period: String,
    pub team_size: Option<u32>,
    pub role: Option<String>,
    pub gallery: Vec<ImageView>,
    pub links: Vec<ProjectLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToyView {
    pub title: String,
    pub slug: String,
    pub anchor: String,
    pub description: String,
    pub image: Option<ImageView>,
    pub url: Option<String>,
    pub technologies: Vec<String>,
    pub category: String,
    pub created: String,
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperienceView {
    pub title: String,
    pub company: String,
    pub company_url: Option<String>,
    pub location: Option<String>,
    pub kind: Option<String>,
    pub period: String,
    pub current: bool,
    pub description: String,
    pub skills: Vec<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EducationView {
    pub degree: String,
    pub field: Option<String>,
    pub institution: String,
    pub institution_url: Option<String>,
    pub location: Option<String>,
    pub period: String,
    pub description: Option<String>,
    pub gpa: Option<String>,
    pub honors: Vec<String>,
    pub activities: Vec<String>,
    pub relevant_courses: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillView {
    pub name: String,
    pub proficiency: String,
    pub score: u8,
    pub description: Option<String>,
    pub years: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillGroupView {
    pub category: String,
    pub label: String,
    pub skills: Vec<SkillView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialView {
    pub platform: &'static str,
    pub url: String,
}

/// Site-wide values every page layout needs
#[derive(Debug, Clone, Serialize)]
pub struct SiteView {
    pub title: String,
    pub description: String,
    pub author: String,
    pub bio: String,
    pub location: Option<String>,
    pub avatar: Option<ImageView>,
    pub url: String,
    pub root: String,
    pub language: String,
    pub year: i32,
    pub nav: Vec<NavItem>,
    pub social: Vec<SocialView>,
    pub email: Option<String>,
    pub availability: Option<String>,
    pub primary_color: Option<String>,
    pub dark_mode: bool,
    pub animations: bool,
    pub analytics_id: Option<String>,
    pub music_enabled: bool,
}

/// Turns content records into template views
pub struct ViewBuilder {
    images: ImageUrlBuilder,
    tz: Tz,
}

impl ViewBuilder {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            images: ImageUrlBuilder::new(&config.cms),
            tz: config.tz(),
        }
    }

    pub fn images(&self) -> &ImageUrlBuilder {
        &self.images
    }

    /// Resolve an image; `None` when it has no usable source
    pub fn image(&self, image: &ImageRef, width: u32, above_fold: bool) -> Option<ImageView> {
        let src = self.images.url_with(image, &ImageOptions::width(width))?;
        let (srcset, placeholder) = match image.url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => (responsive_srcset(url, &DEFAULT_SIZES), blur_placeholder(url)),
            None => {
                let srcset = DEFAULT_SIZES
                    .iter()
                    .filter_map(|&size| {
                        self.images
                            .url_with(image, &ImageOptions::width(size))
                            .map(|u| format!("{} {}w", u, size))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                let placeholder = self
                    .images
                    .url_with(
                        image,
                        &ImageOptions {
                            width: Some(20),
                            height: Some(20),
                            quality: Some(10),
                            blur: true,
                            ..Default::default()
                        },
                    )
                    .unwrap_or_default();
                (srcset, placeholder)
            }
        };
        Some(ImageView {
            src,
            srcset,
            placeholder,
            alt: image.alt.clone().unwrap_or_default(),
            caption: image.caption.clone(),
            loading: loading_strategy(above_fold, false).as_str(),
        })
    }

    fn rich_text(&self, blocks: &[portable_text::Block]) -> String {
        portable_text::to_html_with(blocks, |image| self.images.url(image))
    }

    /// Card or full view of a post; `full` renders the body
    pub fn post(&self, post: &BlogPost, full: bool) -> PostView {
        let path = entry_path("blogs", &post.slug.current);
        let external = post.external_url.as_deref().filter(|u| !u.is_empty());
        let content = if !full {
            String::new()
        } else if post.body_html.is_some() {
            post.body()
        } else {
            self.rich_text(&post.content)
        };
        PostView {
            title: post.title.clone(),
            slug: post.slug.current.clone(),
            href: external.map(str::to_string).unwrap_or(path),
            external: external.is_some(),
            excerpt: post.excerpt.clone().unwrap_or_default(),
            date: post
                .published_at
                .map(|d| format_date(&d.with_timezone(&self.tz), "LL"))
                .unwrap_or_default(),
            date_iso: post
                .published_at
                .map(|d| d.to_rfc3339())
                .unwrap_or_default(),
            tags: post.tags.clone(),
            featured: post.featured,
            reading_time: reading_time::format(post.reading_minutes()),
            cover: post
                .cover_image
                .as_ref()
                .and_then(|img| self.image(img, 1200, full)),
            content,
        }
    }

    pub fn project(&self, project: &Project, full: bool) -> ProjectView {
        let content = if !full {
            String::new()
        } else if project.body_html.is_some() {
            project.body()
        } else {
            self.rich_text(&project.long_description)
        };
        ProjectView {
            title: project.title.clone(),
            slug: project.slug.current.clone(),
            href: entry_path("projects", &project.slug.current),
            description: project.description.clone(),
            content,
            image: project
                .image
                .as_ref()
                .and_then(|img| self.image(img, 1024, full)),
            technologies: project.technologies.clone(),
            category: project.category.clone(),
            status: project.status.clone(),
            featured: project.featured,
            live_url: project.live_url.clone(),
            github_url: project.github_url.clone(),
            period: date_range(project.start_date.as_ref(), project.end_date.as_ref(), false),
            team_size: project.team_size,
            role: project.role.clone(),
            gallery: if full {
                project
                    .gallery
                    .iter()
                    .filter_map(|img| self.image(img, 1280, false))
                    .collect()
            } else {
                Vec::new()
            },
            links: project.links.clone(),
        }
    }

    pub fn toy(&self, toy: &ToyProject) -> ToyView {
        ToyView {
            title: toy.title.clone(),
            slug: toy.slug.current.clone(),
            anchor: format!("toy-{}", toy.slug.current),
            description: toy.description.clone(),
            image: toy.image.as_ref().and_then(|img| self.image(img, 640, false)),
            url: toy.url.clone().filter(|u| !u.is_empty()),
            technologies: toy.technologies.clone(),
            category: toy.category.clone(),
            created: toy.created_at.as_ref().map(month_year).unwrap_or_default(),
            featured: toy.featured,
        }
    }

    pub fn experience(&self, item: &Experience) -> ExperienceView {
        ExperienceView {
            title: item.title.clone(),
            company: item.company.clone(),
            company_url: item.company_url.clone(),
            location: item.location.clone(),
            kind: item.kind.clone(),
            period: date_range(item.start_date.as_ref(), item.end_date.as_ref(), item.current),
            current: item.current,
            description: self.rich_text(&item.description),
            skills: item.skills.clone(),
            achievements: item.achievements.clone(),
        }
    }

    pub fn education(&self, item: &Education) -> EducationView {
        EducationView {
            degree: item.degree.clone(),
            field: item.field.clone(),
            institution: item.institution.clone(),
            institution_url: item.institution_url.clone(),
            location: item.location.clone(),
            period: date_range(item.start_date.as_ref(), item.end_date.as_ref(), item.current),
            description: item.description.clone(),
            gpa: item.gpa.clone(),
            honors: item.honors.clone(),
            activities: item.activities.clone(),
            relevant_courses: item.relevant_courses.clone(),
        }
    }

    pub fn skill_groups(&self, groups: &SkillGroups) -> Vec<SkillGroupView> {
        groups
            .iter()
            .map(|(category, skills)| SkillGroupView {
                category: category.clone(),
                label: group_label(category).to_string(),
                skills: skills
                    .iter()
                    .map(|s| SkillView {
                        name: s.name.clone(),
                        proficiency: s.proficiency.clone(),
                        score: s.proficiency_score,
                        description: s.description.clone(),
                        years: s.years_of_experience,
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn site(&self, config: &SiteConfig, settings: &SiteSettings, year: i32) -> SiteView {
        let author = if settings.author.name.trim().is_empty() {
            config.author.clone()
        } else {
            settings.author.name.clone()
        };
        let title = if settings.site_title.trim().is_empty() {
            config.title.clone()
        } else {
            settings.site_title.clone()
        };
        let description = if settings.site_description.trim().is_empty() {
            config.description.clone()
        } else {
            settings.site_description.clone()
        };
        let analytics_id = settings
            .analytics
            .gtag
            .clone()
            .or_else(|| settings.analytics.google_analytics.clone())
            .filter(|id| !id.trim().is_empty());

        SiteView {
            title,
            description,
            bio: settings.author.bio.clone().unwrap_or_default(),
            location: settings.author.location.clone(),
            avatar: settings
                .author
                .profile_image
                .as_ref()
                .and_then(|img| self.image(img, 400, true)),
            author,
            url: config.url.trim_end_matches('/').to_string(),
            root: config.root.clone(),
            language: config.language.clone(),
            year,
            nav: settings.navigation.clone(),
            social: settings
                .social_links
                .entries()
                .into_iter()
                .map(|(platform, url)| SocialView {
                    platform,
                    url: url.to_string(),
                })
                .collect(),
            email: settings
                .contact
                .email
                .clone()
                .or_else(|| settings.author.email.clone())
                .filter(|e| !e.trim().is_empty()),
            availability: settings.contact.availability.clone(),
            primary_color: settings.theme.primary_color.clone(),
            dark_mode: settings.theme.dark_mode,
            animations: settings.theme.animations_enabled,
            analytics_id,
            music_enabled: config.music.enable && !config.music.songs.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CmsConfig;
    use crate::content::model::AssetRef;
    use crate::content::mock;

    fn builder() -> ViewBuilder {
        ViewBuilder::new(&SiteConfig::default())
    }

    #[test]
    fn test_literal_image_view() {
        let image = ImageRef::from_url("/assets/p.png", Some("Cover".to_string()));
        let view = builder().image(&image, 800, true).unwrap();
        assert_eq!(view.src, "/assets/p.png?w=800");
        assert!(view.srcset.starts_with("/assets/p.png?w=640 640w"));
        assert_eq!(view.placeholder, "/assets/p.png?w=20&h=20&q=10");
        assert_eq!(view.alt, "Cover");
        assert_eq!(view.loading, "eager");
    }

    #[test]
    fn test_asset_image_needs_project() {
        let image = ImageRef {
            asset: Some(AssetRef {
                reference: "image-abc-600x400-png".to_string(),
            }),
            ..Default::default()
        };
        assert!(builder().image(&image, 800, false).is_none());

        let config = SiteConfig {
            cms: CmsConfig {
                project_id: Some("proj".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let view = ViewBuilder::new(&config).image(&image, 800, false).unwrap();
        assert_eq!(
            view.src,
            "https://cdn.sanity.io/images/proj/production/abc-600x400.png?w=800"
        );
        assert_eq!(view.srcset.split(", ").count(), DEFAULT_SIZES.len());
        assert_eq!(view.loading, "lazy");
    }

    #[test]
    fn test_post_card_has_no_body() {
        let post = mock::blog_posts().remove(0);
        let card = builder().post(&post, false);
        assert!(card.content.is_empty());
        assert_eq!(card.href, format!("/blogs/{}/", post.slug.current));
        assert!(card.reading_time.ends_with("min read"));

        let full = builder().post(&post, true);
        assert!(!full.content.is_empty());
    }

    #[test]
    fn test_external_post_links_out() {
        let mut post = mock::blog_posts().remove(0);
        post.external_url = Some("https://medium.com/@jack/post".to_string());
        let card = builder().post(&post, false);
        assert!(card.external);
        assert_eq!(card.href, "https://medium.com/@jack/post");
    }

    #[test]
    fn test_site_view_falls_back_to_config() {
        let config = SiteConfig {
            title: "Config Title".to_string(),
            ..Default::default()
        };
        let view = builder().site(&config, &SiteSettings::default(), 2026);
        assert_eq!(view.title, "Config Title");
        assert_eq!(view.author, "Jack Luo");
        assert!(view.nav.is_empty());
        assert!(view.music_enabled);
    }

    #[test]
    fn test_experience_period() {
        let item = mock::experience().remove(0);
        let view = builder().experience(&item);
        if item.current {
            assert!(view.period.ends_with("Present"));
        }
        assert!(!view.period.is_empty());
    }
}
