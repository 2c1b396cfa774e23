//! Page catalog discovery.
//!
//! Walks the input directory and turns every page source into a
//! [`PageRecord`]. The walk is deterministic: entries are visited in name
//! order with a directory's index page ahead of its siblings, so the catalog
//! lists parents before children.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::page::{PageError, PageLayout, PageRecord, path_stem_for_url};

/// Error type for catalog discovery.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Directory could not be listed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Source file could not be mapped to a page.
    #[error(transparent)]
    Page(#[from] PageError),
}

/// Scan `layout.input_dir` for page sources.
///
/// Hidden and `_`-prefixed entries are skipped, as are files whose extension
/// is not in `page_extensions` (compared case-insensitively). A missing input
/// directory yields an empty catalog. When two sources map to the same URL
/// the first one wins.
///
/// # Errors
///
/// Returns `CatalogError::Io` if a directory cannot be listed.
pub fn scan_pages<S: AsRef<str>>(
    layout: &PageLayout,
    page_extensions: &[S],
) -> Result<Vec<PageRecord>, CatalogError> {
    if !layout.input_dir.is_dir() {
        tracing::debug!(
            path = %layout.input_dir.display(),
            "Input directory missing, catalog is empty"
        );
        return Ok(Vec::new());
    }

    let extensions: Vec<String> = page_extensions
        .iter()
        .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
        .collect();

    let mut pages = Vec::new();
    let mut seen = HashSet::new();
    scan_directory(
        &layout.input_dir,
        layout,
        &extensions,
        &mut pages,
        &mut seen,
    )?;
    tracing::info!(count = pages.len(), "Scanned page catalog");
    Ok(pages)
}

fn scan_directory(
    dir: &Path,
    layout: &PageLayout,
    extensions: &[String],
    pages: &mut Vec<PageRecord>,
    seen: &mut HashSet<String>,
) -> Result<(), CatalogError> {
    let io_err = |source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        let is_dir = entry.file_type().map_err(io_err)?.is_dir();
        entries.push((name, is_dir, entry.path()));
    }
    // Index page first, then everything else by name
    entries.sort_by(|(a, a_dir, _), (b, b_dir, _)| {
        let a_index = !a_dir && is_index_source(a);
        let b_index = !b_dir && is_index_source(b);
        b_index.cmp(&a_index).then_with(|| a.cmp(b))
    });

    for (_, is_dir, path) in entries {
        if is_dir {
            scan_directory(&path, layout, extensions, pages, seen)?;
            continue;
        }
        let matches = path
            .extension()
            .is_some_and(|ext| extensions.contains(&ext.to_string_lossy().to_lowercase()));
        if !matches {
            continue;
        }

        let page = PageRecord::from_source(&path, layout)?;
        if seen.insert(page.url.clone()) {
            pages.push(page);
        } else {
            tracing::warn!(
                url = %page.url,
                path = %path.display(),
                "Duplicate page URL, keeping first source"
            );
        }
    }
    Ok(())
}

fn is_index_source(name: &str) -> bool {
    let stem = Path::new(name).file_stem();
    stem.is_some_and(|stem| stem == "index")
}

/// Find a page by URL.
///
/// Falls back to comparing path stems, so `/about/index.html` finds the
/// page at `/about/`.
#[must_use]
pub fn find_page<'a>(pages: &'a [PageRecord], url: &str) -> Option<&'a PageRecord> {
    pages.iter().find(|page| page.url == url).or_else(|| {
        let stem = path_stem_for_url(url);
        pages.iter().find(|page| page.file_path_stem == stem)
    })
}
