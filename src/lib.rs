//! site-index: build-time content index for a static blog
//!
//! Posts are read once from Markdown/MDX sources into an immutable
//! [`index::ContentIndex`] snapshot. Page rendering reads the published posts,
//! newest first, through [`index::ContentIndexReader`].

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod index;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A blog site rooted at a base directory
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Posts directory inside the source directory
    pub posts_dir: PathBuf,
    /// Directory holding the saved index
    pub index_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let source_dir = base_dir.join(&config.source_dir);
        let posts_dir = source_dir.join(&config.posts_dir);
        let index_dir = base_dir.join(&config.index_dir);

        Ok(Self {
            config,
            base_dir,
            source_dir,
            posts_dir,
            index_dir,
        })
    }

    /// Path of the saved index file
    pub fn index_path(&self) -> PathBuf {
        self.index_dir.join(index::INDEX_FILE)
    }

    /// Materialize the index and save it
    pub fn build_index(&self) -> Result<index::ContentIndex> {
        commands::build::run(self)
    }

    /// Load the saved index
    pub fn load_index(&self) -> Result<index::ContentIndex> {
        let path = self.index_path();
        index::ContentIndex::load(&path)
            .with_context(|| format!("Failed to load content index {:?}", path))
    }

    /// Open a render context over the saved index
    pub fn render_context(&self) -> Result<index::RenderContext> {
        Ok(index::RenderContext::new(Arc::new(self.load_index()?)))
    }

    /// Remove the saved index
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
