//! Remove the saved index

use anyhow::Result;
use std::fs;

use crate::Site;

/// Delete the index directory
pub fn run(site: &Site) -> Result<()> {
    if site.index_dir.exists() {
        fs::remove_dir_all(&site.index_dir)?;
        tracing::info!("Deleted: {:?}", site.index_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_index_dir() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();
        site.build_index().unwrap();
        assert!(site.index_dir.exists());

        run(&site).unwrap();
        assert!(!site.index_dir.exists());
        // Cleaning twice is fine
        run(&site).unwrap();
    }
}
