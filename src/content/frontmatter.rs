//! Front-matter parsing for local content collections

use anyhow::{anyhow, bail, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter of `content/blogs/*.md`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogFrontMatter {
    pub title: String,
    pub publish_date: String,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    pub excerpt: String,
    pub hero_image: String,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

impl BlogFrontMatter {
    /// Enforce the collection schema beyond what serde checks
    pub fn validate(&self) -> Result<()> {
        if self.tags.is_empty() {
            bail!("tags must contain at least one entry");
        }
        if crate::content::model::parse_date(&self.publish_date).is_none() {
            bail!("publishDate is not a date: {}", self.publish_date);
        }
        if let Some(url) = &self.external_url {
            reqwest::Url::parse(url).map_err(|e| anyhow!("externalUrl is not a URL: {}", e))?;
        }
        Ok(())
    }
}

/// Gallery image on a project page
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryImage {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkEntry {
    pub label: String,
    pub url: String,
}

/// Front-matter of `content/projects/*.md`
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectFrontMatter {
    pub title: String,
    pub role: String,
    #[serde(deserialize_with = "string_or_vec")]
    pub tech: Vec<String>,
    pub summary: String,
    pub description: String,
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, rename = "sortOrder")]
    pub sort_order: i64,
}

impl ProjectFrontMatter {
    pub fn validate(&self) -> Result<()> {
        if self.tech.is_empty() {
            bail!("tech must contain at least one entry");
        }
        for link in &self.links {
            reqwest::Url::parse(&link.url)
                .map_err(|e| anyhow!("link '{}' is not a URL: {}", link.label, e))?;
        }
        Ok(())
    }
}

/// Front-matter of `content/toys/*.md`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToyFrontMatter {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "string_or_vec")]
    pub tech: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub sort_order: i64,
}

impl ToyFrontMatter {
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.url {
            reqwest::Url::parse(url).map_err(|e| anyhow!("url is not a URL: {}", e))?;
        }
        Ok(())
    }
}

/// Split a document into its YAML front-matter and body
///
/// Returns `None` for the front-matter when the document does not open with a
/// `---` fenced block that looks like `key: value` YAML.
pub fn split(content: &str) -> (Option<&str>, &str) {
    let trimmed = content.trim_start();
    let Some(rest) = trimmed.strip_prefix("---") else {
        return (None, content);
    };
    let rest = rest.trim_start_matches(['\n', '\r']);

    let Some(end_pos) = rest.find("\n---") else {
        return (None, content);
    };
    let yaml = &rest[..end_pos];
    let body = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

    if looks_like_yaml(yaml) {
        (Some(yaml), body)
    } else {
        (None, content)
    }
}

/// Parse typed front-matter; documents without front-matter are an error
pub fn parse<T: DeserializeOwned>(content: &str) -> Result<(T, &str)> {
    match split(content) {
        (Some(yaml), body) => {
            let fm = serde_yaml::from_str::<T>(yaml)
                .map_err(|e| anyhow!("invalid front-matter: {}", e))?;
            Ok((fm, body))
        }
        (None, _) => Err(anyhow!("missing front-matter")),
    }
}

/// At least one line must be a `key:` pair; `---` is also a markdown rule
fn looks_like_yaml(block: &str) -> bool {
    block.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after = &trimmed[colon_pos + 1..];
        is_key && (after.is_empty() || after.starts_with(' '))
    })
}
