//! Headless CMS access: HTTP transport, GROQ queries, image URLs and the
//! mock-fallback content client used by the generator and server.

mod client;
mod content;
mod error;
mod image;
pub mod queries;

pub use client::{QueryParams, SanityClient};
pub use content::{group_label, group_skills, ContentClient, SkillGroups};
pub use error::{CmsError, Result};
pub use image::ImageUrlBuilder;
