//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/site.css") // -> "/portfolio/css/site.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    if is_absolute(path) {
        return path.to_string();
    }

    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Site-relative path of an entry page, e.g. `/blogs/hello-world/`
pub fn entry_path(section: &str, slug: &str) -> String {
    format!(
        "/{}/{}/",
        section.trim_matches('/'),
        utf8_percent_encode(slug, SEGMENT)
    )
}

/// Whether a link leaves the site
pub fn is_external(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://") || href.starts_with("mailto:")
}

fn is_absolute(path: &str) -> bool {
    is_external(path) || path.starts_with("//") || path.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com/".to_string(),
            root: "/portfolio/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/site.css"), "/portfolio/css/site.css");
        assert_eq!(url_for(&config, "blogs/"), "/portfolio/blogs/");
        assert_eq!(url_for(&config, ""), "/portfolio/");
        assert_eq!(url_for(&config, "https://x.dev/a"), "https://x.dev/a");
    }

    #[test]
    fn test_entry_path() {
        assert_eq!(entry_path("blogs", "hello-world"), "/blogs/hello-world/");
        assert_eq!(entry_path("/projects/", "a b"), "/projects/a%20b/");
    }

    #[test]
    fn test_is_external() {
        assert!(is_external("https://github.com"));
        assert!(is_external("mailto:me@x.dev"));
        assert!(!is_external("/journey/"));
    }
}
