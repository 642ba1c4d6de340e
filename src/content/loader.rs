//! Content loader - loads local markdown collections from the content directory

use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::frontmatter::{self, BlogFrontMatter, ProjectFrontMatter, ToyFrontMatter};
use super::model::{self, BlogPost, ImageRef, Project, ProjectLink, Slug, ToyProject};
use super::{reading_time, MarkdownRenderer};
use crate::Portfolio;

/// Loads `content/blogs`, `content/projects` and `content/toys`
pub struct ContentLoader {
    blogs_dir: PathBuf,
    projects_dir: PathBuf,
    toys_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    pub fn new(portfolio: &Portfolio) -> Self {
        Self::from_dir(&portfolio.content_dir)
    }

    pub fn from_dir(content_dir: &Path) -> Self {
        Self {
            blogs_dir: content_dir.join("blogs"),
            projects_dir: content_dir.join("projects"),
            toys_dir: content_dir.join("toys"),
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load all blog posts, newest first
    pub fn load_blogs(&self) -> Result<Vec<BlogPost>> {
        let mut posts = Vec::new();
        for path in markdown_files(&self.blogs_dir) {
            match self.load_blog(&path) {
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Skipping blog {:?}: {}", path, e),
            }
        }
        model::sort_posts(&mut posts);
        Ok(posts)
    }

    fn load_blog(&self, path: &Path) -> Result<BlogPost> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = frontmatter::parse::<BlogFrontMatter>(&content)?;
        fm.validate()?;

        let slug = file_slug(path)?;
        let published_at = model::parse_datetime(&fm.publish_date);

        Ok(BlogPost {
            id: format!("local-blog-{}", slug),
            title: fm.title,
            slug: Slug::new(slug),
            excerpt: Some(fm.excerpt),
            content: Vec::new(),
            body_html: Some(self.renderer.render(body)?),
            published_at,
            updated_at: None,
            tags: fm.tags,
            featured: fm.featured,
            cover_image: Some(ImageRef::from_url(fm.hero_image, None)),
            reading_time: Some(reading_time::calculate(body)),
            external_url: fm.external_url,
        })
    }

    /// Load all projects in canonical order
    pub fn load_projects(&self) -> Result<Vec<Project>> {
        let mut projects = Vec::new();
        for path in markdown_files(&self.projects_dir) {
            match self.load_project(&path) {
                Ok(project) => projects.push(project),
                Err(e) => tracing::warn!("Skipping project {:?}: {}", path, e),
            }
        }
        model::sort_projects(&mut projects);
        Ok(projects)
    }

    fn load_project(&self, path: &Path) -> Result<Project> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = frontmatter::parse::<ProjectFrontMatter>(&content)?;
        fm.validate()?;

        let slug = file_slug(path)?;
        let body_md = if body.trim().is_empty() {
            fm.description.as_str()
        } else {
            body
        };

        let gallery: Vec<ImageRef> = fm
            .gallery
            .into_iter()
            .map(|g| ImageRef {
                caption: g.caption,
                ..ImageRef::from_url(g.src, Some(g.alt))
            })
            .collect();

        Ok(Project {
            id: format!("local-project-{}", slug),
            title: fm.title,
            slug: Slug::new(slug),
            description: fm.summary,
            long_description: Vec::new(),
            body_html: Some(self.renderer.render(body_md)?),
            image: gallery.first().cloned(),
            technologies: fm.tech,
            category: String::new(),
            status: String::new(),
            featured: fm.featured,
            live_url: None,
            github_url: None,
            start_date: None,
            end_date: None,
            team_size: None,
            role: Some(fm.role),
            sort_order: fm.sort_order,
            gallery,
            links: fm
                .links
                .into_iter()
                .map(|l| ProjectLink {
                    label: l.label,
                    url: l.url,
                })
                .collect(),
        })
    }

    /// Load toy projects; the markdown body is not rendered
    pub fn load_toys(&self) -> Result<Vec<ToyProject>> {
        let mut toys = Vec::new();
        for path in markdown_files(&self.toys_dir) {
            match Self::load_toy(&path) {
                Ok(toy) => toys.push(toy),
                Err(e) => tracing::warn!("Skipping toy {:?}: {}", path, e),
            }
        }
        model::sort_toy_projects(&mut toys);
        Ok(toys)
    }

    fn load_toy(path: &Path) -> Result<ToyProject> {
        let content = fs::read_to_string(path)?;
        let (fm, _) = frontmatter::parse::<ToyFrontMatter>(&content)?;
        fm.validate()?;

        let slug = file_slug(path)?;
        Ok(ToyProject {
            id: format!("local-toy-{}", slug),
            title: fm.title,
            slug: Slug::new(slug),
            description: fm.description,
            image: None,
            url: fm.url,
            technologies: fm.tech,
            category: fm.category,
            created_at: fm.created.as_deref().and_then(model::parse_date),
            featured: fm.featured,
            sort_order: fm.sort_order,
        })
    }
}

/// Merge local entries into CMS entries; the CMS wins on slug collisions
pub fn merge_by_slug<T, F>(primary: Vec<T>, local: Vec<T>, slug: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut merged = primary;
    for item in local {
        if merged.iter().any(|existing| slug(existing) == slug(&item)) {
            tracing::debug!("Local entry '{}' shadowed by CMS entry", slug(&item));
            continue;
        }
        merged.push(item);
    }
    merged
}

fn markdown_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_markdown_file(p))
        .collect();
    files.sort();
    files
}

fn file_slug(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow!("file name is not valid UTF-8"))
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_blogs_sorted_and_validated() {
        let tmp = TempDir::new().unwrap();
        let blogs = tmp.path().join("blogs");
        write(
            &blogs,
            "older.md",
            "---\ntitle: Older\npublishDate: 2023-01-01\ntags: [a]\nexcerpt: e\nheroImage: /h.png\n---\nOld body",
        );
        write(
            &blogs,
            "newer.md",
            "---\ntitle: Newer\npublishDate: 2024-01-01\ntags: [b]\nexcerpt: e\nheroImage: /h.png\n---\n# New",
        );
        write(&blogs, "broken.md", "---\ntitle: Broken\n---\nNo schema");
        write(&blogs, "notes.txt", "ignored");

        let loader = ContentLoader::from_dir(tmp.path());
        let posts = loader.load_blogs().unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].slug.current, "newer");
        assert!(posts[0].body().contains("<h1>New</h1>"));
        assert_eq!(posts[1].reading_time, Some(1));
        assert_eq!(
            posts[0].cover_image.as_ref().and_then(|i| i.url.as_deref()),
            Some("/h.png")
        );
    }

    #[test]
    fn test_load_projects() {
        let tmp = TempDir::new().unwrap();
        write(
            &tmp.path().join("projects"),
            "tool.md",
            "---\ntitle: Tool\nrole: Lead\ntech: [Rust]\nsummary: S\ndescription: D\ngallery:\n  - src: /g.png\n    caption: Cap\n---\n",
        );

        let loader = ContentLoader::from_dir(tmp.path());
        let projects = loader.load_projects().unwrap();

        assert_eq!(projects.len(), 1);
        let project = &projects[0];
        assert_eq!(project.slug.current, "tool");
        assert_eq!(project.description, "S");
        assert!(project.body().contains("<p>D</p>"));
        assert_eq!(project.image.as_ref().unwrap().caption.as_deref(), Some("Cap"));
    }

    #[test]
    fn test_load_toys() {
        let tmp = TempDir::new().unwrap();
        let toys = tmp.path().join("toys");
        write(
            &toys,
            "b-toy.md",
            "---\ntitle: B\nurl: https://b.dev\ntech: JavaScript\nsortOrder: 2\n---\n",
        );
        write(&toys, "a-toy.md", "---\ntitle: A\nsortOrder: 1\ncreated: 2024-02-10\n---\n");
        write(&toys, "bad.md", "---\ntitle: Bad\nurl: nope\n---\n");

        let loaded = ContentLoader::from_dir(tmp.path()).load_toys().unwrap();
        let slugs: Vec<_> = loaded.iter().map(|t| t.slug.current.as_str()).collect();
        assert_eq!(slugs, vec!["a-toy", "b-toy"]);
        assert_eq!(loaded[1].technologies, vec!["JavaScript"]);
        assert!(loaded[0].created_at.is_some());
    }

    #[test]
    fn test_missing_dirs_are_empty() {
        let tmp = TempDir::new().unwrap();
        let loader = ContentLoader::from_dir(tmp.path());
        assert!(loader.load_blogs().unwrap().is_empty());
        assert!(loader.load_projects().unwrap().is_empty());
    }

    #[test]
    fn test_merge_by_slug_prefers_primary() {
        let merged = merge_by_slug(
            vec![("a", 1), ("b", 1)],
            vec![("b", 2), ("c", 2)],
            |item| item.0,
        );
        assert_eq!(merged, vec![("a", 1), ("b", 1), ("c", 2)]);
    }
}
