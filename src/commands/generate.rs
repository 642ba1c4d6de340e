//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::content::loader::ContentLoader;
use crate::generator::{Generator, SiteContent};
use crate::Portfolio;

/// Fetch all content and render the site
pub async fn run(portfolio: &Portfolio) -> Result<()> {
    build(portfolio).await?;
    Ok(())
}

/// Render the site and hand back the content it was built from
pub async fn build(portfolio: &Portfolio) -> Result<SiteContent> {
    let start = Instant::now();

    let client = portfolio.content_client()?;
    let loader = ContentLoader::new(portfolio);
    let content = SiteContent::load(&client, &loader).await;
    tracing::info!(
        "Loaded {} posts, {} projects, {} toys ({})",
        content.posts.len(),
        content.projects.len(),
        content.toys.len(),
        if client.is_live() { "cms" } else { "mock" }
    );

    let generator = Generator::new(portfolio)?;
    generator.generate(&content)?;

    tracing::info!("Generated in {:.2}s", start.elapsed().as_secs_f64());
    Ok(content)
}

/// Paths whose changes trigger a rebuild
fn watch_targets(portfolio: &Portfolio) -> Vec<(PathBuf, RecursiveMode)> {
    vec![
        (portfolio.content_dir.clone(), RecursiveMode::Recursive),
        (portfolio.static_dir.clone(), RecursiveMode::Recursive),
        (portfolio.base_dir.join("templates"), RecursiveMode::Recursive),
        (portfolio.base_dir.join("_config.yml"), RecursiveMode::NonRecursive),
    ]
}

fn is_relevant(path: &std::path::Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.contains("node_modules")
        && !path_str.ends_with('~')
}

/// Start a debounced watcher; batches of changed paths arrive on the receiver.
///
/// The returned debouncer must be kept alive for events to keep flowing.
pub fn spawn_watcher(
    portfolio: &Portfolio,
) -> Result<(Debouncer<RecommendedWatcher>, mpsc::Receiver<Vec<PathBuf>>)> {
    let (tx, rx) = mpsc::channel(16);

    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                let paths: Vec<PathBuf> = events
                    .into_iter()
                    .map(|e| e.path)
                    .filter(|p| is_relevant(p))
                    .collect();
                if !paths.is_empty() {
                    let _ = tx.blocking_send(paths);
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        },
    )?;

    for (path, mode) in watch_targets(portfolio) {
        if path.exists() {
            debouncer.watcher().watch(&path, mode)?;
            tracing::debug!("Watching: {:?}", path);
        }
    }

    Ok((debouncer, rx))
}

/// Reload the site from disk, picking up `_config.yml` edits
pub async fn rebuild(portfolio: &Portfolio) -> Result<(Portfolio, SiteContent)> {
    let fresh = Portfolio::new(&portfolio.base_dir)?;
    let content = build(&fresh).await?;
    Ok((fresh, content))
}

/// Watch for file changes and regenerate
pub async fn watch(portfolio: &Portfolio) -> Result<()> {
    let (_debouncer, mut rx) = spawn_watcher(portfolio)?;
    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut current = portfolio.clone();
    while let Some(paths) = rx.recv().await {
        for path in &paths {
            tracing::info!("File changed: {}", path.display());
        }
        match rebuild(&current).await {
            Ok((fresh, _)) => current = fresh,
            Err(e) => tracing::error!("Generation failed: {}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::path::Path;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_run_offline_writes_site() {
        let tmp = TempDir::new().unwrap();
        let portfolio = Portfolio::with_config(tmp.path(), SiteConfig::default());
        run(&portfolio).await.unwrap();
        assert!(portfolio.public_dir.join("index.html").exists());
        assert!(portfolio.public_dir.join("blogs/hello-world/index.html").exists());
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("content/blogs/a.md")));
        assert!(!is_relevant(Path::new("content/.git/index")));
        assert!(!is_relevant(Path::new("content/blogs/a.md~")));
    }

    #[test]
    fn test_watch_targets_include_config() {
        let portfolio = Portfolio::with_config("/site", SiteConfig::default());
        let targets = watch_targets(&portfolio);
        assert!(targets
            .iter()
            .any(|(p, _)| p == Path::new("/site/_config.yml")));
    }
}
