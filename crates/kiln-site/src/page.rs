//! Page records and the path arithmetic behind them.
//!
//! A [`PageRecord`] is the flat catalog entry the hierarchy resolvers work
//! on. Records are either built from a URL ([`PageRecord::from_url`]) or
//! derived from a source file on disk ([`PageRecord::from_source`]), in which
//! case the output location, URL and path stem all come from
//! [`compute_output_path`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A single page in the site catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Public URL, always starting with `/` (e.g. "/", "/about/", "/a/b.html").
    pub url: String,
    /// URL with a trailing index made explicit and the extension removed
    /// (e.g. "/index", "/about/index", "/a/b").
    pub file_path_stem: String,
    /// File name without extension, or the parent directory name for index files.
    pub file_slug: String,
    /// Lower-cased source extension including the dot, empty when unknown.
    #[serde(default)]
    pub extension: String,
    /// Source file, when the page came from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_path: Option<PathBuf>,
    /// Built output file, when the page came from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    /// Pre-resolved title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PageRecord {
    /// Create a record for a URL with no backing file.
    ///
    /// The path stem and slug are derived from the URL alone.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let file_path_stem = path_stem_for_url(&url);
        let file_slug = slug_for_stem(&file_path_stem);
        Self {
            url,
            file_path_stem,
            file_slug,
            extension: String::new(),
            input_path: None,
            output_path: None,
            title: None,
        }
    }

    /// Create a record for a source file inside `layout.input_dir`.
    ///
    /// # Errors
    ///
    /// Returns `PageError::OutsideInputDir` if the file does not live under the
    /// input directory, or `PageError::InvalidFileName` if it has no file name.
    pub fn from_source(input_path: &Path, layout: &PageLayout) -> Result<Self, PageError> {
        let info = compute_output_path(input_path, layout)?;

        let file_slug = if info.name == "index" {
            input_path
                .parent()
                .and_then(Path::file_name)
                .map_or_else(|| "index".to_owned(), |n| n.to_string_lossy().into_owned())
        } else {
            info.name.clone()
        };

        Ok(Self {
            url: url_for_output(&info.root_rel_path_with_ext),
            file_path_stem: format!("/{}", info.root_rel_path),
            file_slug,
            extension: info.extension,
            input_path: Some(input_path.to_path_buf()),
            output_path: Some(info.output_path),
            title: None,
        })
    }

    /// Attach a pre-resolved title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Number of non-empty segments in the URL (root has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        url_depth(&self.url)
    }
}

/// Directory layout used to map source files to output files and URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLayout {
    /// Directory holding page sources.
    pub input_dir: PathBuf,
    /// Directory receiving built pages.
    pub output_dir: PathBuf,
    /// Extension given to built pages, including the dot (e.g. ".html").
    pub output_extension: String,
}

/// Output location and naming derived from a source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPathInfo {
    /// Output file path.
    pub output_path: PathBuf,
    /// File name without extension.
    pub name: String,
    /// Lower-cased source extension including the dot.
    pub extension: String,
    /// Directory relative to the input dir, `/`-separated ("" at the root).
    pub rel_dir: String,
    /// `rel_dir/name`.
    pub root_rel_path: String,
    /// `root_rel_path` with the output extension appended.
    pub root_rel_path_with_ext: String,
}

/// Error type for page record construction.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Source file is not inside the input directory.
    #[error("{} is not inside input directory {}", path.display(), input_dir.display())]
    OutsideInputDir {
        /// Offending source path.
        path: PathBuf,
        /// Configured input directory.
        input_dir: PathBuf,
    },
    /// Source path has no file name component.
    #[error("{} has no file name", .0.display())]
    InvalidFileName(PathBuf),
}

/// Compute output path and naming for a source file.
///
/// # Errors
///
/// Returns `PageError::OutsideInputDir` if `input_path` is not under
/// `layout.input_dir`, or `PageError::InvalidFileName` if it has no file name.
pub fn compute_output_path(
    input_path: &Path,
    layout: &PageLayout,
) -> Result<OutputPathInfo, PageError> {
    let rel = input_path
        .strip_prefix(&layout.input_dir)
        .map_err(|_| PageError::OutsideInputDir {
            path: input_path.to_path_buf(),
            input_dir: layout.input_dir.clone(),
        })?;

    let name = rel
        .file_stem()
        .ok_or_else(|| PageError::InvalidFileName(input_path.to_path_buf()))?
        .to_string_lossy()
        .into_owned();
    let extension = rel
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    let rel_dir = rel
        .parent()
        .map(|dir| {
            dir.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default();
    let root_rel_path = if rel_dir.is_empty() {
        name.clone()
    } else {
        format!("{rel_dir}/{name}")
    };
    let root_rel_path_with_ext = format!("{root_rel_path}{}", layout.output_extension);
    let output_path = layout.output_dir.join(&root_rel_path_with_ext);

    Ok(OutputPathInfo {
        output_path,
        name,
        extension,
        rel_dir,
        root_rel_path,
        root_rel_path_with_ext,
    })
}

/// Count non-empty `/`-separated segments (root `/` has depth 0).
#[must_use]
pub fn url_depth(url: &str) -> usize {
    url.split('/').filter(|segment| !segment.is_empty()).count()
}

/// Derive the file path stem of a URL.
///
/// A trailing `/` becomes an explicit `index` segment and the extension of
/// the last segment is removed:
/// `/` → `/index`, `/about/` → `/about/index`, `/a/b.html` → `/a/b`.
#[must_use]
pub fn path_stem_for_url(url: &str) -> String {
    if url.is_empty() || url.ends_with('/') {
        return format!("{url}index");
    }
    let (dir, file) = split_last_segment(url);
    format!("{dir}{}", strip_extension(file))
}

/// Build the public URL of an output path relative to the output root.
///
/// A final `index` or `index.<ext>` segment collapses into its directory.
fn url_for_output(root_rel_path_with_ext: &str) -> String {
    let url = format!("/{root_rel_path_with_ext}");
    let (dir, file) = split_last_segment(&url);
    if is_index_file(file) {
        dir.to_owned()
    } else {
        url
    }
}

/// Slug for a stem: the last segment, or its directory for index stems.
fn slug_for_stem(stem: &str) -> String {
    let mut segments = stem.split('/').filter(|s| !s.is_empty()).rev();
    match segments.next() {
        Some("index") => segments.next().unwrap_or("index").to_owned(),
        Some(last) => last.to_owned(),
        None => "index".to_owned(),
    }
}

/// Split `url` into the directory part (with trailing `/`) and the final segment.
pub(crate) fn split_last_segment(url: &str) -> (&str, &str) {
    match url.rfind('/') {
        Some(pos) => url.split_at(pos + 1),
        None => ("", url),
    }
}

/// Whether a final URL segment names an index file (`index`, `index.html`, ...).
pub(crate) fn is_index_file(segment: &str) -> bool {
    let Some(ext) = segment.strip_prefix("index.") else {
        return segment == "index";
    };
    !ext.is_empty() && ext.chars().all(|c| c.is_ascii_lowercase())
}

/// Remove the extension from a file name, keeping dot-files intact.
pub(crate) fn strip_extension(file: &str) -> &str {
    match file.rfind('.') {
        Some(pos) if pos > 0 => &file[..pos],
        _ => file,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn layout() -> PageLayout {
        PageLayout {
            input_dir: PathBuf::from("/path/to/src"),
            output_dir: PathBuf::from("/path/to/dist"),
            output_extension: ".html".to_owned(),
        }
    }

    #[test]
    fn test_url_depth() {
        assert_eq!(url_depth("/"), 0);
        assert_eq!(url_depth("/about/"), 1);
        assert_eq!(url_depth("/about/history/2025/"), 3);
        assert_eq!(url_depth("/a/b.html"), 2);
        assert_eq!(url_depth("//a//"), 1);
    }

    #[test]
    fn test_path_stem_for_url() {
        assert_eq!(path_stem_for_url("/"), "/index");
        assert_eq!(path_stem_for_url("/about/"), "/about/index");
        assert_eq!(path_stem_for_url("/a/b.html"), "/a/b");
        assert_eq!(path_stem_for_url("/a/b"), "/a/b");
        assert_eq!(path_stem_for_url("/a/.hidden"), "/a/.hidden");
    }

    #[test]
    fn test_from_url_derives_stem_and_slug() {
        let root = PageRecord::from_url("/");
        let about = PageRecord::from_url("/about/").with_title("About");
        let file = PageRecord::from_url("/news/item.html");

        assert_eq!(root.file_path_stem, "/index");
        assert_eq!(root.file_slug, "index");
        assert_eq!(about.file_path_stem, "/about/index");
        assert_eq!(about.file_slug, "about");
        assert_eq!(about.title.as_deref(), Some("About"));
        assert_eq!(file.file_path_stem, "/news/item");
        assert_eq!(file.file_slug, "item");
        assert_eq!(file.depth(), 2);
    }

    #[test]
    fn test_compute_output_path_nested() {
        let info =
            compute_output_path(Path::new("/path/to/src/pages/index.pug"), &layout()).unwrap();

        assert_eq!(
            info,
            OutputPathInfo {
                output_path: PathBuf::from("/path/to/dist/pages/index.html"),
                name: "index".to_owned(),
                extension: ".pug".to_owned(),
                rel_dir: "pages".to_owned(),
                root_rel_path: "pages/index".to_owned(),
                root_rel_path_with_ext: "pages/index.html".to_owned(),
            }
        );
    }

    #[test]
    fn test_compute_output_path_root_file() {
        let info = compute_output_path(Path::new("/path/to/src/index.pug"), &layout()).unwrap();

        assert_eq!(info.output_path, PathBuf::from("/path/to/dist/index.html"));
        assert_eq!(info.rel_dir, "");
        assert_eq!(info.root_rel_path, "index");
    }

    #[test]
    fn test_compute_output_path_lowercases_extension() {
        let info =
            compute_output_path(Path::new("/path/to/src/styles/main.ScSs"), &layout()).unwrap();

        assert_eq!(info.extension, ".scss");
        assert_eq!(info.name, "main");
    }

    #[test]
    fn test_compute_output_path_empty_output_extension() {
        let layout = PageLayout {
            output_extension: String::new(),
            ..layout()
        };

        let info =
            compute_output_path(Path::new("/path/to/src/assets/image.png"), &layout).unwrap();

        assert_eq!(
            info.output_path,
            PathBuf::from("/path/to/dist/assets/image")
        );
        assert_eq!(info.root_rel_path_with_ext, "assets/image");
    }

    #[test]
    fn test_compute_output_path_outside_input_dir() {
        let result = compute_output_path(Path::new("/elsewhere/index.pug"), &layout());

        assert!(matches!(result, Err(PageError::OutsideInputDir { .. })));
    }

    #[test]
    fn test_from_source_index_page() {
        let page =
            PageRecord::from_source(Path::new("/path/to/src/about/index.pug"), &layout()).unwrap();

        assert_eq!(page.url, "/about/");
        assert_eq!(page.file_path_stem, "/about/index");
        assert_eq!(page.file_slug, "about");
        assert_eq!(page.extension, ".pug");
        assert_eq!(
            page.output_path,
            Some(PathBuf::from("/path/to/dist/about/index.html"))
        );
    }

    #[test]
    fn test_from_source_root_index() {
        let page =
            PageRecord::from_source(Path::new("/path/to/src/index.html"), &layout()).unwrap();

        assert_eq!(page.url, "/");
        assert_eq!(page.file_path_stem, "/index");
        assert_eq!(page.file_slug, "src");
    }

    #[test]
    fn test_from_source_regular_page() {
        let page =
            PageRecord::from_source(Path::new("/path/to/src/news/item.md"), &layout()).unwrap();

        assert_eq!(page.url, "/news/item.html");
        assert_eq!(page.file_path_stem, "/news/item");
        assert_eq!(page.file_slug, "item");
    }

    #[test]
    fn test_is_index_file() {
        assert!(is_index_file("index"));
        assert!(is_index_file("index.html"));
        assert!(!is_index_file("index."));
        assert!(!is_index_file("indexes.html"));
        assert!(!is_index_file("index.HTML"));
    }
}
