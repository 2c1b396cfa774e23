//! Page title lookup.
//!
//! The hierarchy resolvers never read files themselves. Whenever a page has
//! no usable title of its own they ask a [`TitleResolver`], which may hit the
//! filesystem and memoize its answers.
//!
//! [`FsTitleResolver`] resolves titles in this order:
//!
//! 1. `title` from the page metadata (YAML front matter, overridden by a
//!    `<name>.json` sidecar next to the source)
//! 2. The first `<title>` element in the page content
//! 3. The page's file slug
//!
//! Built pages in the output directory are looked up by URL for tree nodes
//! that have no catalog entry ([`TitleResolver::static_title`]).

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use kiln_cache::{Cache, CacheBucket, CacheBucketExt};
use regex::Regex;
use serde::Deserialize;

use crate::page::PageRecord;

/// Title used for breadcrumbs and nav nodes whose title cannot be resolved.
pub const NO_TITLE: &str = "__NO_TITLE__";

static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("invalid title regex"));

/// Caller-supplied title post-processing.
pub type OptimizeTitle<'a> = &'a dyn Fn(&str) -> String;

/// Resolves titles for pages that do not carry one.
///
/// Implementations must treat every failure as "not found".
pub trait TitleResolver: Send + Sync {
    /// Resolve the title of a catalog page.
    fn page_title(&self, page: &PageRecord, optimize: Option<OptimizeTitle<'_>>) -> Option<String>;

    /// Resolve the title of a built page by its URL.
    fn static_title(&self, url: &str, optimize: Option<OptimizeTitle<'_>>) -> Option<String>;
}

/// Resolver that never finds anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTitleResolver;

impl TitleResolver for NullTitleResolver {
    fn page_title(
        &self,
        _page: &PageRecord,
        _optimize: Option<OptimizeTitle<'_>>,
    ) -> Option<String> {
        None
    }

    fn static_title(&self, _url: &str, _optimize: Option<OptimizeTitle<'_>>) -> Option<String> {
        None
    }
}

/// Page metadata relevant to title resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PageMetadata {
    /// Explicit page title.
    #[serde(default)]
    pub title: Option<String>,
}

impl PageMetadata {
    /// Parse metadata from YAML content (empty content yields the default).
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Yaml` if the YAML is malformed.
    pub fn from_yaml(content: &str) -> Result<Self, MetadataError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(trimmed).map_err(|e| MetadataError::Yaml(e.to_string()))
    }

    /// Parse metadata from a JSON sidecar.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Json` if the JSON is malformed.
    pub fn from_json(content: &str) -> Result<Self, MetadataError> {
        serde_json::from_str(content).map_err(|e| MetadataError::Json(e.to_string()))
    }

    /// Overlay `other` on top of `self`; set fields in `other` win.
    fn merge(&mut self, other: Self) {
        if other.title.is_some() {
            self.title = other.title;
        }
    }
}

/// Error type for metadata parsing.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// Front matter is not valid YAML.
    #[error("Invalid front matter: {0}")]
    Yaml(String),
    /// Sidecar is not valid JSON.
    #[error("Invalid metadata sidecar: {0}")]
    Json(String),
}

/// Split a leading `---` delimited YAML block off `raw`.
///
/// Returns the parsed metadata and the remaining body. Content without a
/// complete front matter block is returned whole with default metadata.
///
/// # Errors
///
/// Returns `MetadataError::Yaml` if the block is not valid YAML.
pub fn parse_front_matter(raw: &str) -> Result<(PageMetadata, &str), MetadataError> {
    let Some(rest) = raw
        .strip_prefix("---")
        .and_then(|r| r.strip_prefix('\n').or_else(|| r.strip_prefix("\r\n")))
    else {
        return Ok((PageMetadata::default(), raw));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let metadata = PageMetadata::from_yaml(&rest[..offset])?;
            return Ok((metadata, &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Ok((PageMetadata::default(), raw))
}

/// Text of the first `<title>` element, trimmed; empty when there is none.
#[must_use]
pub fn extract_title_tag(html: &str) -> &str {
    TITLE_TAG
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str().trim())
}

/// Title of a page as shown in hierarchy views.
///
/// The page's own title wins when it is not blank, then the resolver, then
/// [`NO_TITLE`].
pub(crate) fn resolve_page_title(
    page: &PageRecord,
    titles: &dyn TitleResolver,
    optimize: Option<OptimizeTitle<'_>>,
) -> String {
    let own = page.title.as_deref().map(str::trim);
    if let Some(own) = own.filter(|t| !t.is_empty()) {
        return own.to_owned();
    }
    titles
        .page_title(page, optimize)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| NO_TITLE.to_owned())
}

/// Filesystem-backed [`TitleResolver`] with a process-lifetime cache.
///
/// Page titles are cached by file path stem, static titles by output file
/// path. Entries are never invalidated.
pub struct FsTitleResolver {
    output_dir: PathBuf,
    titles: Box<dyn CacheBucket>,
    static_titles: Box<dyn CacheBucket>,
}

impl FsTitleResolver {
    /// Create a resolver reading built pages from `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, cache: &dyn Cache) -> Self {
        Self {
            output_dir: output_dir.into(),
            titles: cache.bucket("titles"),
            static_titles: cache.bucket("static-titles"),
        }
    }

    /// Output file for a URL, `index.html` appended for directory URLs.
    fn static_path(&self, url: &str) -> PathBuf {
        let mut path = self.output_dir.join(url.trim_start_matches('/'));
        if url.ends_with('/') {
            path.push("index.html");
        }
        path
    }

    /// Read and merge front matter and sidecar metadata for a source file.
    fn load_metadata<'a>(input_path: &Path, raw: &'a str) -> (PageMetadata, &'a str) {
        let (mut metadata, body) = match parse_front_matter(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(
                    path = %input_path.display(),
                    error = %e,
                    "Ignoring malformed front matter"
                );
                (PageMetadata::default(), raw)
            }
        };

        let sidecar = input_path.with_extension("json");
        if sidecar != input_path
            && let Ok(content) = std::fs::read_to_string(&sidecar)
        {
            match PageMetadata::from_json(&content) {
                Ok(overlay) => metadata.merge(overlay),
                Err(e) => tracing::warn!(
                    path = %sidecar.display(),
                    error = %e,
                    "Ignoring malformed metadata sidecar"
                ),
            }
        }

        (metadata, body)
    }
}

impl TitleResolver for FsTitleResolver {
    fn page_title(&self, page: &PageRecord, optimize: Option<OptimizeTitle<'_>>) -> Option<String> {
        let key = page.file_path_stem.as_str();
        if let Some(title) = self.titles.get_string(key) {
            tracing::debug!(stem = key, "Title cache hit");
            return Some(title);
        }

        let input_path = page.input_path.as_deref()?;
        let raw = match std::fs::read_to_string(input_path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(
                    path = %input_path.display(),
                    error = %e,
                    "Page source unreadable"
                );
                return None;
            }
        };

        let (metadata, body) = Self::load_metadata(input_path, &raw);
        let title = metadata
            .title
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .or_else(|| {
                let tag = extract_title_tag(body);
                (!tag.is_empty()).then(|| optimize.map_or_else(|| tag.to_owned(), |f| f(tag)))
            })
            .unwrap_or_else(|| page.file_slug.clone());

        tracing::debug!(stem = key, title = %title, "Title resolved");
        self.titles.set_string(key, &title);
        Some(title)
    }

    fn static_title(&self, url: &str, optimize: Option<OptimizeTitle<'_>>) -> Option<String> {
        let path = self.static_path(url);
        let key = path.to_string_lossy();
        if let Some(title) = self.static_titles.get_string(&key) {
            return (!title.is_empty()).then_some(title);
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Static page unavailable");
                return None;
            }
        };

        let tag = extract_title_tag(&content);
        let title = if tag.is_empty() {
            String::new()
        } else {
            optimize.map_or_else(|| tag.to_owned(), |f| f(tag))
        };
        self.static_titles.set_string(&key, &title);
        (!title.is_empty()).then_some(title)
    }
}
