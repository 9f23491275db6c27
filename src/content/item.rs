//! Index records handed to page rendering

use serde::{Deserialize, Serialize};

use crate::config::ImageConfig;

/// A published post as returned by an index query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentItem {
    /// Opaque unique identifier
    pub id: String,

    /// Post title
    pub title: String,

    /// Publication date, already formatted for display
    pub publication_date: String,

    /// Always true in query results
    pub published: bool,

    /// Tags in authored order
    pub tags: Vec<String>,

    /// URL path, unique across the index
    pub slug: String,

    /// Display text such as "4 min read"
    pub reading_time_text: String,

    /// Plain-text prefix of the post body
    pub excerpt: String,

    /// Responsive image descriptor, passed through untouched
    pub featured_image: Option<ImageDescriptor>,
}

/// Multi-resolution reference to a post's cover image.
///
/// Only URLs and bounds are recorded here; no image data is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageDescriptor {
    pub src: String,
    pub src_set: String,
    pub sizes: String,
    pub aspect_ratio: f64,
    pub max_width: u32,
    pub max_height: u32,
}

impl ImageDescriptor {
    /// Describe `src` with one srcset entry per configured width
    pub fn new(src: &str, config: &ImageConfig) -> Self {
        let mut widths: Vec<u32> = config
            .widths
            .iter()
            .copied()
            .filter(|w| *w > 0 && *w <= config.max_width)
            .collect();
        if !widths.contains(&config.max_width) {
            widths.push(config.max_width);
        }
        widths.sort_unstable();
        widths.dedup();

        let src_set = widths
            .iter()
            .map(|w| format!("{}?w={} {}w", src, w, w))
            .collect::<Vec<_>>()
            .join(",\n");

        let aspect_ratio = if config.max_height == 0 {
            1.0
        } else {
            config.max_width as f64 / config.max_height as f64
        };

        Self {
            src: src.to_string(),
            src_set,
            sizes: format!(
                "(max-width: {}px) 100vw, {}px",
                config.max_width, config.max_width
            ),
            aspect_ratio,
            max_width: config.max_width,
            max_height: config.max_height,
        }
    }
}

/// Precomputed time-to-read estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadingTime {
    pub text: String,
    pub minutes: f64,
    pub words: usize,
}

impl ReadingTime {
    /// Estimate from plain text at `words_per_minute`
    pub fn estimate(text: &str, words_per_minute: usize) -> Self {
        let words = text.split_whitespace().count();
        let minutes = words as f64 / words_per_minute.max(1) as f64;
        // Hundredths first, then ceiling
        let displayed = ((minutes * 100.0).round() / 100.0).ceil() as u64;

        Self {
            text: format!("{} min read", displayed),
            minutes,
            words,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_time_rounds_up() {
        let text = vec!["word"; 450].join(" ");
        let rt = ReadingTime::estimate(&text, 200);
        assert_eq!(rt.words, 450);
        assert_eq!(rt.text, "3 min read");
    }

    #[test]
    fn test_reading_time_empty() {
        let rt = ReadingTime::estimate("", 200);
        assert_eq!(rt.words, 0);
        assert_eq!(rt.text, "0 min read");
    }

    #[test]
    fn test_image_descriptor() {
        let config = ImageConfig::default();
        let img = ImageDescriptor::new("/posts/hello/cover.jpg", &config);
        assert_eq!(img.max_width, 3000);
        assert_eq!(img.max_height, 1400);
        assert!(img.src_set.starts_with("/posts/hello/cover.jpg?w=750 750w"));
        assert!(img.src_set.ends_with("?w=3000 3000w"));
        assert_eq!(img.sizes, "(max-width: 3000px) 100vw, 3000px");
        assert!((img.aspect_ratio - 3000.0 / 1400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_image_descriptor_drops_oversized_widths() {
        let config = ImageConfig {
            max_width: 1000,
            max_height: 500,
            widths: vec![400, 1600],
        };
        let img = ImageDescriptor::new("/a.png", &config);
        assert_eq!(img.src_set, "/a.png?w=400 400w,\n/a.png?w=1000 1000w");
    }
}
