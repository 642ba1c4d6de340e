//! Command palette: command model, search filter, category grouping and
//! keyboard selection state.
//!
//! The filter is a linear, case-insensitive substring scan over title,
//! description and keywords. Order is preserved; there is no ranking.

mod commands;

use serde::{Deserialize, Serialize};

pub use commands::build_commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    Navigation,
    Projects,
    Blogs,
    Toys,
    Social,
    Actions,
}

impl CommandCategory {
    /// Display order of the groups
    pub const ALL: [CommandCategory; 6] = [
        CommandCategory::Navigation,
        CommandCategory::Projects,
        CommandCategory::Blogs,
        CommandCategory::Toys,
        CommandCategory::Social,
        CommandCategory::Actions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CommandCategory::Navigation => "Navigation",
            CommandCategory::Projects => "Projects",
            CommandCategory::Blogs => "Blog Posts",
            CommandCategory::Toys => "Toy Projects",
            CommandCategory::Social => "Social Media",
            CommandCategory::Actions => "Actions",
        }
    }
}

/// What running a command does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CommandTarget {
    /// Site-relative page
    Navigate(String),
    /// Opens in a new tab
    External(String),
    /// Project detail by slug
    OpenProject(String),
}

impl CommandTarget {
    pub fn href(&self) -> String {
        match self {
            CommandTarget::Navigate(path) | CommandTarget::External(path) => path.clone(),
            CommandTarget::OpenProject(slug) => crate::helpers::entry_path("projects", slug),
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, CommandTarget::External(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub category: CommandCategory,
    pub target: CommandTarget,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Command {
    /// `needle` must already be lowercase
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
            || self
                .keywords
                .iter()
                .any(|k| k.to_lowercase().contains(needle))
    }
}

/// Commands matching `search`, in their original order
pub fn filter<'a>(commands: &'a [Command], search: &str) -> Vec<&'a Command> {
    // Surrounding whitespace is ignored: " rust " matches like "rust",
    // and a whitespace-only search counts as empty.
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return commands.iter().collect();
    }
    commands.iter().filter(|c| c.matches(&needle)).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandGroup<'a> {
    pub category: CommandCategory,
    pub label: &'static str,
    pub commands: Vec<&'a Command>,
}

/// One group per category in display order; groups may be empty
pub fn group<'a>(filtered: &[&'a Command]) -> Vec<CommandGroup<'a>> {
    CommandCategory::ALL
        .iter()
        .map(|&category| CommandGroup {
            category,
            label: category.label(),
            commands: filtered
                .iter()
                .copied()
                .filter(|c| c.category == category)
                .collect(),
        })
        .collect()
}

/// Everything the palette shows for one search string
#[derive(Debug, Clone, Serialize)]
pub struct PaletteView<'a> {
    pub search: String,
    pub total: usize,
    pub groups: Vec<CommandGroup<'a>>,
    #[serde(skip)]
    pub results: Vec<&'a Command>,
}

impl<'a> PaletteView<'a> {
    pub fn search(commands: &'a [Command], search: &str) -> Self {
        let results = filter(commands, search);
        let groups = group(&results);
        Self {
            search: search.to_string(),
            total: results.len(),
            groups,
            results,
        }
    }

    /// The "no results" state
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.commands.is_empty())
    }
}

/// Highlighted row in a filtered list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    index: usize,
    len: usize,
}

impl Selection {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// ArrowDown; stops at the last entry
    pub fn down(&mut self) {
        if self.index + 1 < self.len {
            self.index += 1;
        }
    }

    /// ArrowUp; stops at the first entry
    pub fn up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// The search changed; back to the top of the new list
    pub fn reset(&mut self, len: usize) {
        self.index = 0;
        self.len = len;
    }

    pub fn current<'a>(&self, results: &[&'a Command]) -> Option<&'a Command> {
        results.get(self.index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(id: &str, title: &str, category: CommandCategory, keywords: &[&str]) -> Command {
        Command {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            icon: None,
            category,
            target: CommandTarget::Navigate("/".to_string()),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn sample() -> Vec<Command> {
        let mut about = cmd("nav-home", "Home", CommandCategory::Navigation, &["index"]);
        about.description = Some("Go to homepage".to_string());
        vec![
            about,
            cmd("project-1", "Rust Engine", CommandCategory::Projects, &["Rust", "systems"]),
            cmd("blog-1", "Notes on Tokio", CommandCategory::Blogs, &["rust", "blog"]),
            cmd("social-github", "GitHub", CommandCategory::Social, &["code"]),
        ]
    }

    #[test]
    fn test_empty_search_returns_everything() {
        let commands = sample();
        assert_eq!(filter(&commands, "").len(), 4);
        assert_eq!(filter(&commands, "   ").len(), 4);
    }

    #[test]
    fn test_filter_is_case_insensitive_over_all_fields() {
        let commands = sample();
        let ids = |search: &str| -> Vec<String> {
            filter(&commands, search)
                .iter()
                .map(|c| c.id.clone())
                .collect()
        };
        assert_eq!(ids("RUST"), vec!["project-1", "blog-1"]);
        assert_eq!(ids("homepage"), vec!["nav-home"]);
        assert_eq!(ids("git"), vec!["social-github"]);
        assert_eq!(ids("tok"), vec!["blog-1"]);
    }

    #[test]
    fn test_padded_search_matches_like_trimmed() {
        let commands = sample();
        let padded: Vec<&str> = filter(&commands, "  tokio \t")
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(padded, vec!["blog-1"]);
        assert_eq!(
            filter(&commands, " rust ").len(),
            filter(&commands, "rust").len()
        );
    }

    #[test]
    fn test_category_name_is_not_searched() {
        let commands = sample();
        assert!(filter(&commands, "navigation").is_empty());
    }

    #[test]
    fn test_groups_follow_fixed_order() {
        let commands = sample();
        let view = PaletteView::search(&commands, "");
        let labels: Vec<_> = view.groups.iter().map(|g| g.label).collect();
        assert_eq!(
            labels,
            vec!["Navigation", "Projects", "Blog Posts", "Toy Projects", "Social Media", "Actions"]
        );
        assert!(view.groups[3].commands.is_empty());
        assert_eq!(view.total, 4);
        assert!(!view.is_empty());
    }

    #[test]
    fn test_no_results_state() {
        let commands = sample();
        let view = PaletteView::search(&commands, "zzz-nothing");
        assert!(view.is_empty());
        assert_eq!(view.groups.len(), CommandCategory::ALL.len());
        assert_eq!(view.total, 0);
    }

    #[test]
    fn test_selection_clamps_and_resets() {
        let commands = sample();
        let results = filter(&commands, "");
        let mut selection = Selection::new(results.len());

        selection.up();
        assert_eq!(selection.index(), 0);
        for _ in 0..10 {
            selection.down();
        }
        assert_eq!(selection.index(), 3);
        assert_eq!(selection.current(&results).unwrap().id, "social-github");

        let narrowed = filter(&commands, "rust");
        selection.reset(narrowed.len());
        assert_eq!(selection.index(), 0);
        selection.down();
        selection.down();
        assert_eq!(selection.current(&narrowed).unwrap().id, "blog-1");

        let mut empty = Selection::new(0);
        empty.down();
        assert_eq!(empty.current(&[]), None);
    }

    #[test]
    fn test_target_serialization() {
        let target = CommandTarget::OpenProject("tool".to_string());
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "open_project", "value": "tool"}));
        assert_eq!(target.href(), "/projects/tool/");
    }
}
