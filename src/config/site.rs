//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub url: String,

    // Directory
    pub source_dir: String,
    pub posts_dir: String,
    pub index_dir: String,

    // Index
    pub excerpt_length: usize,
    pub words_per_minute: usize,
    #[serde(default)]
    pub featured_image: ImageConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            url: "http://example.com".to_string(),

            source_dir: "content".to_string(),
            posts_dir: "posts".to_string(),
            index_dir: ".site-index".to_string(),

            excerpt_length: 250,
            words_per_minute: 200,
            featured_image: ImageConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded site config from {:?}", path.as_ref());
        Ok(config)
    }
}

/// Bounds and breakpoints for featured image descriptors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// Candidate widths for the srcset; anything above `max_width` is dropped
    #[serde(default)]
    pub widths: Vec<u32>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: 3000,
            max_height: 1400,
            widths: vec![750, 1500, 2250, 3000],
        }
    }
}
