use super::{Command, CommandCategory, CommandTarget};
use crate::content::{BlogPost, Project, SiteSettings, ToyProject};

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn navigation(
    id: &str,
    title: &str,
    description: &str,
    path: &str,
    icon: Option<&str>,
    keywords: &[&str],
) -> Command {
    Command {
        id: format!("nav-{}", id),
        title: title.to_string(),
        description: Some(description.to_string()),
        icon: icon.map(str::to_string),
        category: CommandCategory::Navigation,
        target: CommandTarget::Navigate(path.to_string()),
        keywords: words(keywords),
    }
}

/// (description, keywords) for a social platform
fn social_copy(platform: &str) -> (String, Vec<String>) {
    let (description, keywords): (String, &[&str]) = match platform {
        "GitHub" => ("Visit my GitHub profile".into(), &["github", "code", "repos", "repositories"][..]),
        "LinkedIn" => ("Connect with me on LinkedIn".into(), &["linkedin", "professional", "network"][..]),
        "Twitter" => ("Follow me on Twitter".into(), &["twitter", "tweets", "social"][..]),
        "Instagram" => ("Follow me on Instagram".into(), &["instagram", "photos", "social"][..]),
        other => (format!("Find me on {}", other), &["social"][..]),
    };
    let mut keywords = words(keywords);
    let lower = platform.to_lowercase();
    if !keywords.contains(&lower) {
        keywords.insert(0, lower);
    }
    (description, keywords)
}

/// Build the full command list shown by the palette
pub fn build_commands(
    settings: &SiteSettings,
    projects: &[Project],
    posts: &[BlogPost],
    toys: &[ToyProject],
) -> Vec<Command> {
    let mut commands = vec![
        navigation("home", "Home", "Go to homepage", "/", None, &["home", "index", "main"]),
        navigation(
            "journey",
            "Journey",
            "View my project journey",
            "/journey/",
            None,
            &["journey", "projects", "work"],
        ),
        navigation(
            "writing",
            "Writing",
            "Read my blog posts",
            "/blogs/",
            None,
            &["writing", "blog", "articles", "posts"],
        ),
        navigation(
            "contact",
            "Contact",
            "Get in touch with me",
            "/contact/",
            Some("/assets/icons/sm/mail.png"),
            &["contact", "email", "reach", "message"],
        ),
        navigation(
            "resume",
            "Resume",
            "View my resume",
            "/resume/",
            None,
            &["resume", "cv", "curriculum vitae"],
        ),
    ];

    for project in projects {
        let mut keywords = project.technologies.clone();
        keywords.extend(
            [&project.category, &project.status]
                .into_iter()
                .filter(|s| !s.is_empty())
                .cloned(),
        );
        keywords.extend(project.role.clone());
        commands.push(Command {
            id: format!("project-{}", project.id),
            title: project.title.clone(),
            description: Some(project.description.clone()).filter(|d| !d.is_empty()),
            icon: None,
            category: CommandCategory::Projects,
            target: CommandTarget::OpenProject(project.slug.current.clone()),
            keywords,
        });
    }

    for post in posts {
        let mut keywords = post.tags.clone();
        keywords.extend(words(&["blog", "article", "post"]));
        let target = match &post.external_url {
            Some(url) => CommandTarget::External(url.clone()),
            None => CommandTarget::Navigate(crate::helpers::entry_path("blogs", &post.slug.current)),
        };
        commands.push(Command {
            id: format!("blog-{}", post.id),
            title: post.title.clone(),
            description: Some(
                post.excerpt
                    .clone()
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "Read this blog post".to_string()),
            ),
            icon: None,
            category: CommandCategory::Blogs,
            target,
            keywords,
        });
    }

    for toy in toys {
        let mut keywords = toy.technologies.clone();
        if !toy.category.is_empty() {
            keywords.push(toy.category.clone());
        }
        keywords.extend(words(&["toy", "experiment"]));
        let target = match &toy.url {
            Some(url) => CommandTarget::External(url.clone()),
            None => CommandTarget::Navigate(format!("/projects/#toy-{}", toy.slug.current)),
        };
        commands.push(Command {
            id: format!("toy-{}", toy.id),
            title: toy.title.clone(),
            description: Some(toy.description.clone()).filter(|d| !d.is_empty()),
            icon: None,
            category: CommandCategory::Toys,
            target,
            keywords,
        });
    }

    for (platform, url) in settings.social_links.entries() {
        let (description, keywords) = social_copy(platform);
        let id = platform.to_lowercase();
        commands.push(Command {
            icon: Some(format!("/assets/icons/sm/{}.png", id)),
            id: format!("social-{}", id),
            title: platform.to_string(),
            description: Some(description),
            category: CommandCategory::Social,
            target: CommandTarget::External(url.to_string()),
            keywords,
        });
    }

    let email = settings
        .contact
        .email
        .as_deref()
        .or(settings.author.email.as_deref())
        .filter(|e| !e.is_empty());
    if let Some(email) = email {
        commands.push(Command {
            id: "action-email".to_string(),
            title: "Send Email".to_string(),
            description: Some(format!("Email me at {}", email)),
            icon: Some("/assets/icons/sm/mail.png".to_string()),
            category: CommandCategory::Actions,
            target: CommandTarget::External(format!("mailto:{}", email)),
            keywords: words(&["email", "contact", "mail", "message"]),
        });
    }

    commands
}
