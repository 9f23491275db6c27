//! Content loader - materializes the content index from the posts directory

use anyhow::Result;
use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::markdown::strip_mdx_statements;
use super::{prune_excerpt, to_plain_text, FrontMatter, ImageDescriptor, ReadingTime};
use crate::index::{ContentIndex, IndexNode};
use crate::Site;

/// Loads posts from the source directory into index nodes
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Build a validated index snapshot of every post, published or not
    pub fn build_index(&self) -> Result<ContentIndex> {
        let index = ContentIndex::new(self.load_nodes()?);
        index.validate()?;
        Ok(index)
    }

    /// Load all posts under the posts directory, in file-name order
    pub fn load_nodes(&self) -> Result<Vec<IndexNode>> {
        let posts_dir = &self.site.posts_dir;
        if !posts_dir.exists() {
            tracing::warn!("Posts directory {:?} does not exist", posts_dir);
            return Ok(Vec::new());
        }

        let mut nodes = Vec::new();

        for entry in WalkDir::new(posts_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_content_file(path) {
                match self.load_node(path) {
                    Ok(node) => {
                        tracing::debug!("Indexed {} -> {}", node.source, node.slug);
                        nodes.push(node);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {:#}", path, e);
                    }
                }
            }
        }

        Ok(nodes)
    }

    /// Load a single post file into an index node
    fn load_node(&self, path: &Path) -> Result<IndexNode> {
        let config = &self.site.config;
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let date = match fm.parse_date() {
            Some(date) => date,
            None => {
                tracing::debug!("No usable date in {:?}, using file mtime", path);
                fs::metadata(path)?
                    .modified()
                    .map(DateTime::<Local>::from)
                    .unwrap_or_else(|_| Local::now())
                    .fixed_offset()
            }
        };

        let title = fm.title.clone().unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let source = relative_path(path, &self.site.source_dir);
        let post_path = relative_path(path, &self.site.posts_dir);

        let slug = match fm.slug.as_deref() {
            Some(slug) => normalize_slug(slug),
            None => slug_from_path(&post_path),
        };

        let body = if has_extension(path, "mdx") {
            strip_mdx_statements(body)
        } else {
            body.to_string()
        };
        let plain = to_plain_text(&body);

        let featured_image = fm.featured_img.as_deref().map(|img| {
            let src = resolve_image_src(&source, img);
            ImageDescriptor::new(&src, &config.featured_image)
        });

        Ok(IndexNode {
            id: node_id(&source),
            title,
            date,
            published: fm.published,
            tags: fm.tags,
            slug,
            reading_time: ReadingTime::estimate(&plain, config.words_per_minute),
            excerpt: prune_excerpt(&plain, config.excerpt_length),
            featured_image,
            source,
        })
    }
}

/// Markdown or MDX source file
fn is_content_file(path: &Path) -> bool {
    ["md", "mdx", "markdown"]
        .iter()
        .any(|ext| has_extension(path, ext))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// `/`-separated path of `path` below `base`
fn relative_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// `hello/index.mdx` -> `/hello/`, `First Post.md` -> `/first-post/`
fn slug_from_path(post_path: &str) -> String {
    let without_ext = match post_path.rfind('.') {
        Some(pos) if !post_path[pos..].contains('/') => &post_path[..pos],
        _ => post_path,
    };

    let mut segments: Vec<&str> = without_ext.split('/').filter(|s| !s.is_empty()).collect();
    if segments.last() == Some(&"index") {
        segments.pop();
    }

    let slugged: Vec<String> = segments.iter().map(|s| slug::slugify(s)).collect();
    if slugged.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", slugged.join("/"))
    }
}

/// Author-supplied slugs take the same `/a/b/` form as derived ones
fn normalize_slug(slug: &str) -> String {
    let inner = slug.trim().trim_matches('/');
    if inner.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", inner)
    }
}

/// Resolve a front-matter image path against the post's directory
fn resolve_image_src(source: &str, img: &str) -> String {
    let img = img.trim();
    if img.starts_with('/') || img.starts_with("http://") || img.starts_with("https://") {
        return img.to_string();
    }

    let mut segments: Vec<&str> = source.split('/').collect();
    segments.pop();

    for part in img.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Opaque id: first 8 bytes of the SHA-256 of the source path, in hex
fn node_id(source: &str) -> String {
    Sha256::digest(source.as_bytes())[..8]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
