//! Query the command palette from the terminal

use anyhow::Result;
use std::fmt::Write;

use crate::content::loader::ContentLoader;
use crate::generator::SiteContent;
use crate::palette::PaletteView;
use crate::Portfolio;

/// Print the grouped palette results for `query`
pub async fn run(portfolio: &Portfolio, query: &str) -> Result<()> {
    let client = portfolio.content_client()?;
    let loader = ContentLoader::new(portfolio);
    let content = SiteContent::gather(&client, &loader).await;
    let commands = content.commands();
    print!("{}", render(&PaletteView::search(&commands, query))?);
    Ok(())
}

fn render(view: &PaletteView) -> Result<String> {
    let mut out = String::new();
    if view.is_empty() {
        writeln!(out, "No results found.")?;
        return Ok(out);
    }

    for group in view.groups.iter().filter(|g| !g.commands.is_empty()) {
        writeln!(out, "{}", group.label)?;
        for command in &group.commands {
            let arrow = if command.target.is_external() { "↗" } else { "→" };
            write!(out, "  {} {} {}", command.title, arrow, command.target.href())?;
            if let Some(description) = &command.description {
                write!(out, "  ({})", description)?;
            }
            writeln!(out)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{Command, CommandCategory, CommandTarget};

    fn command(title: &str, category: CommandCategory, target: CommandTarget) -> Command {
        Command {
            id: title.to_lowercase(),
            title: title.to_string(),
            description: None,
            icon: None,
            category,
            target,
            keywords: Vec::new(),
        }
    }

    #[test]
    fn test_render_groups() {
        let commands = vec![
            command("Home", CommandCategory::Navigation, CommandTarget::Navigate("/".into())),
            command(
                "GitHub",
                CommandCategory::Social,
                CommandTarget::External("https://github.com/x".into()),
            ),
        ];
        let out = render(&PaletteView::search(&commands, "")).unwrap();
        assert!(out.contains("Home → /"));
        assert!(out.contains("GitHub ↗ https://github.com/x"));
        assert!(out.find("Home").unwrap() < out.find("GitHub").unwrap());
    }

    #[test]
    fn test_render_no_results() {
        let commands = vec![command(
            "Home",
            CommandCategory::Navigation,
            CommandTarget::Navigate("/".into()),
        )];
        let out = render(&PaletteView::search(&commands, "zzz")).unwrap();
        assert_eq!(out, "No results found.\n");
    }
}
