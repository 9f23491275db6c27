//! Materialize the content index

use anyhow::Result;
use std::time::Instant;

use crate::content::loader::ContentLoader;
use crate::index::ContentIndex;
use crate::Site;

/// Load every post, save the snapshot, and return it
pub fn run(site: &Site) -> Result<ContentIndex> {
    let start = Instant::now();

    let index = ContentLoader::new(site).build_index()?;
    let published = index.nodes().iter().filter(|n| n.published).count();

    let path = site.index_path();
    index.save(&path)?;

    tracing::info!(
        "Indexed {} posts ({} published) into {:?} in {:.2?}",
        index.len(),
        published,
        path,
        start.elapsed()
    );

    Ok(index)
}
