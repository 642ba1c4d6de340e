//! Configuration module

mod site;

pub use site::CmsConfig;
pub use site::ContactConfig;
pub use site::MusicConfig;
pub use site::SiteConfig;
