//! Everything a build needs, fetched in one concurrent fan-out

use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinSet;

use crate::cms::{ContentClient, SkillGroups};
use crate::content::loader::{merge_by_slug, ContentLoader};
use crate::content::model::{self, BlogPost, Education, Experience, Project, SiteSettings, ToyProject};
use crate::palette::{self, Command};

/// Home page shows at most this many featured posts
const FEATURED_POSTS: usize = 3;

#[derive(Debug, Clone)]
pub struct SiteContent {
    pub settings: SiteSettings,
    pub posts: Vec<BlogPost>,
    pub featured_posts: Vec<BlogPost>,
    pub projects: Vec<Project>,
    pub featured_projects: Vec<Project>,
    pub toys: Vec<ToyProject>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skill_groups: SkillGroups,
    /// Posts with a full body, one per detail page
    pub post_pages: Vec<BlogPost>,
    /// Projects with a full write-up, one per detail page
    pub project_pages: Vec<Project>,
}

impl SiteContent {
    /// Fetch listings, merge local collections, then fetch detail records
    pub async fn load(client: &ContentClient, loader: &ContentLoader) -> Self {
        let mut content = Self::gather(client, loader).await;

        let posts: Vec<BlogPost> = content
            .posts
            .iter()
            .filter(|p| !links_out(p))
            .cloned()
            .collect();
        let projects = content.projects.clone();

        let post_client = client.clone();
        let project_client = client.clone();
        let (post_pages, project_pages) = tokio::join!(
            fetch_details(
                posts,
                |p| p.body_html.is_some(),
                |p| p.slug.current.clone(),
                move |slug| {
                    let client = post_client.clone();
                    async move { client.blog_post(&slug).await }
                },
            ),
            fetch_details(
                projects,
                |p| p.body_html.is_some(),
                |p| p.slug.current.clone(),
                move |slug| {
                    let client = project_client.clone();
                    async move { client.project(&slug).await }
                },
            ),
        );
        content.post_pages = post_pages;
        content.project_pages = project_pages;
        content.sync_reading_times();
        content
    }

    /// Cards show the reading time of the full record
    fn sync_reading_times(&mut self) {
        let minutes: HashMap<String, u32> = self
            .post_pages
            .iter()
            .map(|p| (p.slug.current.clone(), p.reading_minutes()))
            .collect();
        for post in self
            .posts
            .iter_mut()
            .chain(self.featured_posts.iter_mut())
            .chain(self.post_pages.iter_mut())
        {
            if let Some(&m) = minutes.get(&post.slug.current) {
                post.reading_time = Some(m);
            }
        }
    }

    /// Posts for the feed in listing order: full records for local pages,
    /// listing records for posts that link out. Posts whose detail lookup
    /// failed have no page and are left out.
    pub fn feed_posts(&self) -> Vec<BlogPost> {
        let pages: HashMap<&str, &BlogPost> = self
            .post_pages
            .iter()
            .map(|p| (p.slug.current.as_str(), p))
            .collect();
        self.posts
            .iter()
            .filter_map(|post| {
                if links_out(post) {
                    Some(post.clone())
                } else {
                    pages.get(post.slug.current.as_str()).map(|p| (*p).clone())
                }
            })
            .collect()
    }

    /// All listing queries at once, merged with local entries
    pub async fn gather(client: &ContentClient, loader: &ContentLoader) -> Self {
        let (
            settings,
            posts,
            featured_posts,
            projects,
            featured_projects,
            toys,
            experience,
            education,
            skill_groups,
        ) = tokio::join!(
            client.site_settings(),
            client.blog_posts(),
            client.featured_blog_posts(),
            client.projects(),
            client.featured_projects(),
            client.toy_projects(),
            client.experience(),
            client.education(),
            client.skills_by_category(),
        );

        let local_posts = loader.load_blogs().unwrap_or_else(|e| {
            tracing::warn!("Failed to load local blogs: {}", e);
            Vec::new()
        });
        let local_projects = loader.load_projects().unwrap_or_else(|e| {
            tracing::warn!("Failed to load local projects: {}", e);
            Vec::new()
        });
        let local_toys = loader.load_toys().unwrap_or_else(|e| {
            tracing::warn!("Failed to load local toys: {}", e);
            Vec::new()
        });
        tracing::debug!(
            "Local collections: {} blogs, {} projects, {} toys",
            local_posts.len(),
            local_projects.len(),
            local_toys.len()
        );

        let local_featured_posts: Vec<BlogPost> =
            local_posts.iter().filter(|p| p.featured).cloned().collect();
        let local_featured_projects: Vec<Project> =
            local_projects.iter().filter(|p| p.featured).cloned().collect();

        let mut posts = merge_by_slug(posts, local_posts, |p| p.slug.current.as_str());
        model::sort_posts(&mut posts);

        let mut featured_posts =
            merge_by_slug(featured_posts, local_featured_posts, |p| p.slug.current.as_str());
        model::sort_posts(&mut featured_posts);
        featured_posts.truncate(FEATURED_POSTS);

        let mut projects = merge_by_slug(projects, local_projects, |p| p.slug.current.as_str());
        model::sort_projects(&mut projects);

        let mut featured_projects = merge_by_slug(featured_projects, local_featured_projects, |p| {
            p.slug.current.as_str()
        });
        featured_projects.sort_by_key(|p| p.sort_order);

        let mut toys = merge_by_slug(toys, local_toys, |t| t.slug.current.as_str());
        model::sort_toy_projects(&mut toys);

        Self {
            settings,
            posts,
            featured_posts,
            projects,
            featured_projects,
            toys,
            experience,
            education,
            skill_groups,
            post_pages: Vec::new(),
            project_pages: Vec::new(),
        }
    }

    /// Palette commands for this content
    pub fn commands(&self) -> Vec<Command> {
        palette::build_commands(&self.settings, &self.projects, &self.posts, &self.toys)
    }
}

fn links_out(post: &BlogPost) -> bool {
    post.external_url.as_deref().is_some_and(|u| !u.is_empty())
}

/// Fetch the full record for every listed item concurrently.
///
/// Items that are already complete are kept as they are. Lookups that come
/// back empty drop the item with a warning. Listing order is preserved.
pub async fn fetch_details<T, C, S, F, Fut>(items: Vec<T>, complete: C, slug: S, fetch: F) -> Vec<T>
where
    T: Send + 'static,
    C: Fn(&T) -> bool,
    S: Fn(&T) -> String,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Option<T>> + Send + 'static,
{
    let mut slots: Vec<Option<T>> = Vec::with_capacity(items.len());
    let mut set = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        if complete(&item) {
            slots.push(Some(item));
            continue;
        }
        let key = slug(&item);
        let request = fetch(key.clone());
        set.spawn(async move { (index, key, request.await) });
        slots.push(None);
    }

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, _, Some(detail))) => slots[index] = Some(detail),
            Ok((_, key, None)) => tracing::warn!("No detail record for '{}', skipping its page", key),
            Err(e) => tracing::error!("Detail fetch task failed: {}", e),
        }
    }

    slots.into_iter().flatten().collect()
}
