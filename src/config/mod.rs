//! Configuration module

mod site;

pub use site::ImageConfig;
pub use site::SiteConfig;
