//! Helper functions shared by the generator, templates and server

mod date;
pub mod image;
pub mod seo;
mod url;

pub use date::*;
pub use url::*;
