//! Hardcoded sample content used when the CMS is unconfigured or unreachable.
//!
//! Every list is returned in the same order the CMS queries request.

use chrono::NaiveDate;

use super::model::*;
use super::portable_text::{Block, RichText, Span, TextBlock};

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn paragraph(text: &str) -> Block {
    Block::Text(TextBlock {
        style: Some("normal".to_string()),
        children: vec![Span {
            text: text.to_string(),
            marks: Vec::new(),
        }],
        ..Default::default()
    })
}

fn heading(text: &str) -> Block {
    Block::Text(TextBlock {
        style: Some("h2".to_string()),
        children: vec![Span {
            text: text.to_string(),
            marks: Vec::new(),
        }],
        ..Default::default()
    })
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn site_settings() -> SiteSettings {
    SiteSettings {
        site_title: "Jack Luo - Portfolio".to_string(),
        site_description:
            "Personal portfolio website showcasing Jack Luo's projects, journey, and creative work"
                .to_string(),
        site_keywords: strings(&["Jack Luo", "Developer", "Portfolio"]),
        author: Author {
            name: "Jack Luo".to_string(),
            bio: Some("Developer and creative thinker".to_string()),
            ..Default::default()
        },
        social_links: SocialLinks {
            github: Some("https://github.com/jackluo".to_string()),
            linkedin: Some("https://linkedin.com/in/jackluo".to_string()),
            ..Default::default()
        },
        contact: ContactInfo {
            email: Some("contact@jack-luo.com".to_string()),
            ..Default::default()
        },
        navigation: vec![
            nav("Home", "/"),
            nav("Projects", "/projects/"),
            nav("Blog", "/blogs/"),
            nav("Journey", "/journey/"),
        ],
        theme: ThemeSettings {
            primary_color: None,
            dark_mode: false,
            animations_enabled: true,
        },
        ..Default::default()
    }
}

fn nav(title: &str, href: &str) -> NavItem {
    NavItem {
        title: title.to_string(),
        href: href.to_string(),
        external: false,
    }
}

pub fn blog_posts() -> Vec<BlogPost> {
    let post = |id: &str, title: &str, slug: &str, published: &str, featured: bool, body: RichText| {
        BlogPost {
            id: id.to_string(),
            title: title.to_string(),
            slug: Slug::new(slug),
            excerpt: Some(format!("A short note: {}.", title.to_lowercase())),
            content: body,
            body_html: None,
            published_at: parse_datetime(published),
            updated_at: None,
            tags: strings(&["notes", "engineering"]),
            featured,
            cover_image: None,
            reading_time: None,
            external_url: None,
        }
    };

    let mut posts = vec![
        post(
            "mock-post-hello",
            "Hello, World",
            "hello-world",
            "2024-01-15T09:00:00Z",
            true,
            vec![
                heading("Why a portfolio"),
                paragraph("This site collects projects, writing and the odd experiment."),
                paragraph("The content you are reading is sample data shown while the CMS is offline."),
            ],
        ),
        post(
            "mock-post-building",
            "Building in Public",
            "building-in-public",
            "2024-06-02T15:30:00Z",
            false,
            vec![paragraph(
                "Shipping small things every week beats planning large things every month.",
            )],
        ),
    ];
    sort_posts(&mut posts);
    posts
}

pub fn projects() -> Vec<Project> {
    let project = |id: &str, title: &str, slug: &str, featured: bool, order: i64| Project {
        id: id.to_string(),
        title: title.to_string(),
        slug: Slug::new(slug),
        description: format!("{} is a sample project shown while the CMS is offline.", title),
        long_description: vec![paragraph("Placeholder project write-up.")],
        body_html: None,
        image: None,
        technologies: strings(&["Rust", "TypeScript"]),
        category: "web".to_string(),
        status: "completed".to_string(),
        featured,
        live_url: None,
        github_url: Some("https://github.com/jackluo".to_string()),
        start_date: date(2023, 9, 1),
        end_date: None,
        team_size: Some(1),
        role: Some("Developer".to_string()),
        sort_order: order,
        gallery: Vec::new(),
        links: Vec::new(),
    };

    let mut projects = vec![
        project("mock-project-portfolio", "Portfolio Site", "portfolio-site", true, 1),
        project("mock-project-cli", "Habit Tracker CLI", "habit-tracker-cli", false, 2),
    ];
    sort_projects(&mut projects);
    projects
}

pub fn toy_projects() -> Vec<ToyProject> {
    let mut toys = vec![ToyProject {
        id: "mock-toy-palette".to_string(),
        title: "Command Palette".to_string(),
        slug: Slug::new("command-palette"),
        description: "A keyboard-first launcher for this site.".to_string(),
        image: None,
        url: None,
        technologies: strings(&["JavaScript"]),
        category: "tool".to_string(),
        created_at: date(2024, 2, 10),
        featured: true,
        sort_order: 1,
    }];
    sort_toy_projects(&mut toys);
    toys
}

pub fn experience() -> Vec<Experience> {
    let mut items = vec![Experience {
        id: "mock-experience-1".to_string(),
        title: "Software Engineer".to_string(),
        company: "Sample Co".to_string(),
        location: Some("Remote".to_string()),
        kind: Some("internship".to_string()),
        description: vec![paragraph("Built internal tools and shipped customer features.")],
        start_date: date(2024, 6, 1),
        end_date: date(2024, 8, 31),
        current: false,
        skills: strings(&["Rust", "PostgreSQL"]),
        achievements: strings(&["Cut build times in half"]),
        company_url: None,
        sort_order: 1,
    }];
    sort_experience(&mut items);
    items
}

pub fn education() -> Vec<Education> {
    let mut items = vec![Education {
        id: "mock-education-1".to_string(),
        degree: "B.S.".to_string(),
        field: Some("Computer Science and Mathematics".to_string()),
        institution: "Sample University".to_string(),
        location: None,
        description: None,
        gpa: None,
        honors: Vec::new(),
        activities: Vec::new(),
        relevant_courses: strings(&["Algorithms", "Distributed Systems"]),
        start_date: date(2022, 9, 1),
        end_date: None,
        current: true,
        institution_url: None,
        sort_order: 1,
    }];
    sort_education(&mut items);
    items
}

pub fn skills() -> Vec<Skill> {
    let skill = |id: &str, name: &str, category: &str, proficiency: &str, score: u8| Skill {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        proficiency: proficiency.to_string(),
        proficiency_score: score,
        description: None,
        years_of_experience: None,
        certifications: Vec::new(),
        projects: Vec::new(),
        icon: None,
        featured: false,
        sort_order: 0,
    };

    let mut skills = vec![
        skill("mock-skill-rust", "Rust", "programming", "advanced", 80),
        skill("mock-skill-ts", "TypeScript", "programming", "expert", 90),
        skill("mock-skill-react", "React", "frameworks", "advanced", 85),
        skill("mock-skill-git", "Git", "tools", "expert", 95),
    ];
    sort_skills(&mut skills);
    skills
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_sample_data() {
        assert!(!blog_posts().is_empty());
        assert!(!projects().is_empty());
        assert!(!toy_projects().is_empty());
        assert!(!experience().is_empty());
        assert!(!education().is_empty());
        assert!(!skills().is_empty());
        assert_eq!(site_settings().site_title, "Jack Luo - Portfolio");
    }

    #[test]
    fn test_mock_lists_are_ordered() {
        let posts = blog_posts();
        assert_eq!(posts[0].slug.current, "building-in-public");
        assert!(projects()[0].featured);
        let skills = skills();
        assert_eq!(skills[0].category, "frameworks");
        assert_eq!(skills[1].name, "TypeScript");
    }

    #[test]
    fn test_settings_defaults() {
        let settings = site_settings();
        assert_eq!(settings.navigation.len(), 4);
        assert!(settings.theme.animations_enabled);
        assert!(!settings.theme.dark_mode);
        assert_eq!(settings.social_links.entries().len(), 2);
    }
}
