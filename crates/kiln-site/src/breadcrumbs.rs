//! Breadcrumb trail resolution.
//!
//! The trail is taken straight from the flat page catalog: every index page
//! whose directory contains the target page, plus the target page itself,
//! ordered root first.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::page::{PageRecord, url_depth};
use crate::title::{OptimizeTitle, TitleResolver, resolve_page_title};

/// A single breadcrumb entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BreadcrumbItem {
    /// Display title.
    pub title: Option<String>,
    /// Link target (the page URL).
    pub href: String,
    /// Number of non-empty segments in `href`.
    pub depth: usize,
    /// Additional fields attached by item transforms.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BreadcrumbItem {
    /// Create an item with no extra fields.
    #[must_use]
    pub fn new(title: Option<String>, href: impl Into<String>) -> Self {
        let href = href.into();
        Self {
            depth: url_depth(&href),
            title,
            href,
            extra: Map::new(),
        }
    }

    /// Attach an extra field, replacing any previous value under `key`.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Item transform applied after filtering and sorting.
pub type TransformItem<'a, E> = &'a dyn Fn(BreadcrumbItem) -> Result<BreadcrumbItem, E>;

/// Options for [`get_breadcrumbs`].
pub struct BreadcrumbOptions<'a, E> {
    /// Items shallower than this URL are dropped (default `/`).
    pub base_url: Option<&'a str>,
    /// Post-processing for titles found in page content.
    pub optimize_title: Option<OptimizeTitle<'a>>,
    /// Mapping applied to every surviving item.
    pub transform_item: Option<TransformItem<'a, E>>,
}

impl<E> Default for BreadcrumbOptions<'_, E> {
    fn default() -> Self {
        Self {
            base_url: None,
            optimize_title: None,
            transform_item: None,
        }
    }
}

/// Whether `candidate` is an index page whose directory contains `base`, or
/// `base` itself. Both arguments are file path stems.
fn is_ancestor_or_self(base: &str, candidate: &str) -> bool {
    if base == candidate {
        return true;
    }
    let (dir, name) = match candidate.rfind('/') {
        Some(0) => ("/", &candidate[1..]),
        Some(pos) => (&candidate[..pos], &candidate[pos + 1..]),
        None => ("", candidate),
    };
    if name != "index" {
        return false;
    }
    dir == "/"
        || base
            .strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Resolve the breadcrumb trail for `page`.
///
/// Items come out sorted by ascending depth, root first. A page that is not
/// part of `all_pages` still gets its ancestors; an empty catalog yields an
/// empty trail.
///
/// # Errors
///
/// Returns the first error produced by `options.transform_item`, unchanged.
pub fn get_breadcrumbs<E>(
    page: &PageRecord,
    all_pages: &[PageRecord],
    titles: &dyn TitleResolver,
    options: &BreadcrumbOptions<'_, E>,
) -> Result<Vec<BreadcrumbItem>, E> {
    let base_depth = url_depth(options.base_url.unwrap_or("/"));

    let mut items: Vec<BreadcrumbItem> = all_pages
        .iter()
        .filter(|candidate| is_ancestor_or_self(&page.file_path_stem, &candidate.file_path_stem))
        .map(|candidate| {
            let title = resolve_page_title(candidate, titles, options.optimize_title);
            BreadcrumbItem::new(Some(title), candidate.url.clone())
        })
        .filter(|item| item.depth >= base_depth)
        .collect();
    items.sort_by_key(|item| item.depth);

    tracing::trace!(url = %page.url, count = items.len(), "Resolved breadcrumbs");

    match options.transform_item {
        Some(transform) => items.into_iter().map(transform).collect(),
        None => Ok(items),
    }
}
