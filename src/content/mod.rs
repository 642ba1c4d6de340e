//! Content module - records, mock data, rich text and local collections

pub mod frontmatter;
pub mod loader;
mod markdown;
pub mod mock;
pub mod model;
pub mod portable_text;
pub mod reading_time;

pub use markdown::MarkdownRenderer;
pub use model::{
    BlogPost, Education, Experience, ImageRef, Project, SiteSettings, Skill, Slug, ToyProject,
};
