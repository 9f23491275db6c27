//! List the published site index

use anyhow::Result;

use crate::content::ContentItem;
use crate::index::ContentIndexReader;
use crate::Site;

/// Print published posts, newest first, as a table or as JSON
pub fn run(site: &Site, json: bool) -> Result<()> {
    let ctx = site.render_context()?;
    let items = ContentIndexReader::new(&ctx).fetch_published_index()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!("{} ({} published posts):", site.config.title, items.len());
    for item in &items {
        println!("{}", format_row(site, item));
    }

    Ok(())
}

fn format_row(site: &Site, item: &ContentItem) -> String {
    let mut row = format!(
        "  {} - {} ({}) {}{}",
        item.publication_date,
        item.title,
        item.reading_time_text,
        site.config.url.trim_end_matches('/'),
        item.slug
    );
    if !item.tags.is_empty() {
        row.push_str(&format!(" [{}]", item.tags.join(", ")));
    }
    row
}
