//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::cms::group_label;
use crate::content::loader::ContentLoader;
use crate::generator::SiteContent;
use crate::helpers::date_range;
use crate::Portfolio;

/// List site content by type
pub async fn run(portfolio: &Portfolio, content_type: &str) -> Result<()> {
    let client = portfolio.content_client()?;
    let loader = ContentLoader::new(portfolio);
    let content = SiteContent::gather(&client, &loader).await;
    print!("{}", describe(&content, content_type)?);
    Ok(())
}

fn describe(content: &SiteContent, content_type: &str) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" | "blog" | "blogs" => {
            writeln!(out, "Posts ({}):", content.posts.len())?;
            for post in &content.posts {
                let date = post
                    .published_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "----------".to_string());
                let marker = if post.external_url.as_deref().is_some_and(|u| !u.is_empty()) {
                    " (external)"
                } else {
                    ""
                };
                writeln!(out, "  {} - {} [{}]{}", date, post.title, post.slug.current, marker)?;
            }
        }
        "project" | "projects" => {
            writeln!(out, "Projects ({}):", content.projects.len())?;
            for project in &content.projects {
                let star = if project.featured { "*" } else { " " };
                writeln!(
                    out,
                    " {}{} [{}] {}",
                    star, project.title, project.slug.current, project.status
                )?;
            }
        }
        "toy" | "toys" => {
            writeln!(out, "Toys ({}):", content.toys.len())?;
            for toy in &content.toys {
                writeln!(out, "  {} [{}]", toy.title, toy.slug.current)?;
            }
        }
        "experience" => {
            writeln!(out, "Experience ({}):", content.experience.len())?;
            for item in &content.experience {
                writeln!(
                    out,
                    "  {} @ {} ({})",
                    item.title,
                    item.company,
                    date_range(item.start_date.as_ref(), item.end_date.as_ref(), item.current)
                )?;
            }
        }
        "education" => {
            writeln!(out, "Education ({}):", content.education.len())?;
            for item in &content.education {
                writeln!(out, "  {} - {}", item.degree, item.institution)?;
            }
        }
        "skill" | "skills" => {
            let total: usize = content.skill_groups.values().map(Vec::len).sum();
            writeln!(out, "Skills ({}):", total)?;
            for (category, skills) in &content.skill_groups {
                writeln!(out, "  {}:", group_label(category))?;
                for skill in skills {
                    writeln!(out, "    {} ({})", skill.name, skill.proficiency)?;
                }
            }
        }
        "settings" => {
            let settings = &content.settings;
            writeln!(out, "Title: {}", settings.site_title)?;
            writeln!(out, "Description: {}", settings.site_description)?;
            writeln!(out, "Author: {}", settings.author.name)?;
            for (platform, url) in settings.social_links.entries() {
                writeln!(out, "  {}: {}", platform, url)?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, projects, toys, experience, education, skills, settings",
                content_type
            );
        }
    }

    Ok(out)
}
