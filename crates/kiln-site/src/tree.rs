//! Page tree construction from flat URL lists.
//!
//! [`build_tree`] turns a list of URLs into a single rooted [`TreeNode`]
//! hierarchy. Ancestry is inferred purely from the URL strings: every node
//! is keyed by its structural stem, and missing intermediate directories are
//! synthesized on demand.
//!
//! # Architecture
//!
//! Nodes are first collected in a flat arena (`Vec<Slot>`) with children
//! tracked by indices and a stem → index map, then assembled into an owned
//! tree in a single post-order pass. This keeps insertion O(depth) per URL
//! and lets the caller-supplied enrichment run exactly once per node.

use std::collections::HashMap;

use glob::Pattern;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::page::{is_index_file, split_last_segment, strip_extension, url_depth};

/// A node of the page tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TreeNode {
    /// Canonical URL of the node.
    pub url: String,
    /// Structural stem: the URL with a trailing index file collapsed into its
    /// directory and any extension removed (e.g. "/about/", "/a/b").
    pub stem: String,
    /// Number of non-empty segments in the stem (root has depth 0).
    ///
    /// Counted on the stem, so index files share their directory's depth:
    /// `/about/index.html` has depth 1, like `/about/`.
    pub depth: usize,
    /// True iff this node is the page being resolved for.
    pub current: bool,
    /// True iff this node is a strict ancestor of the current page (root
    /// included, current page excluded).
    #[serde(rename = "isAncestor")]
    pub is_ancestor: bool,
    /// Resolved label.
    pub title: String,
    /// Child nodes in first-appearance order of their URLs.
    pub children: Vec<TreeNode>,
    /// Additional fields attached by node transforms.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TreeNode {
    /// Whether the node stands for a directory (its stem ends with `/`).
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.stem.ends_with('/')
    }

    /// Depth-first search for the node with the given URL.
    #[must_use]
    pub fn find_by_url(&self, url: &str) -> Option<&TreeNode> {
        if self.url == url {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_url(url))
    }

    /// Depth-first search for the node marked as current.
    #[must_use]
    pub fn find_current(&self) -> Option<&TreeNode> {
        if self.current {
            return Some(self);
        }
        self.children.iter().find_map(TreeNode::find_current)
    }

    /// Number of nodes in this subtree, itself included.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }

    /// Attach an extra field, replacing any previous value under `key`.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Options for [`build_tree`].
#[derive(Clone, Debug, Default)]
pub struct TreeOptions {
    /// URL of the page being resolved for. Only a URL present in the input
    /// marks a node as current.
    pub current_url: Option<String>,
    /// URLs matching any of these patterns are left out of the tree.
    pub ignore_globs: Vec<Pattern>,
}

/// Structural stem of a URL.
///
/// `/about/` → `/about/`, `/about/index.html` → `/about/`, `/a/b.html` → `/a/b`.
#[must_use]
pub fn tree_stem(url: &str) -> String {
    if url.is_empty() {
        return "/".to_owned();
    }
    if url.ends_with('/') {
        return url.to_owned();
    }
    let (dir, file) = split_last_segment(url);
    if is_index_file(file) {
        let dir = if dir.is_empty() { "/" } else { dir };
        return dir.to_owned();
    }
    format!("{dir}{}", strip_extension(file))
}

/// Stem of the directory directly containing `stem`, `None` for the root.
fn parent_stem(stem: &str) -> Option<&str> {
    if stem == "/" {
        return None;
    }
    let trimmed = stem.strip_suffix('/').unwrap_or(stem);
    trimmed.rfind('/').map(|pos| &trimmed[..=pos])
}

/// Whether `url` matches any ignore pattern.
///
/// Patterns are tried against the site-relative path and the full URL.
fn is_ignored(url: &str, patterns: &[Pattern]) -> bool {
    let relative = url.trim_start_matches('/');
    patterns
        .iter()
        .any(|pattern| pattern.matches(relative) || pattern.matches(url))
}

/// Arena entry used while the tree is being assembled.
struct Slot {
    url: String,
    stem: String,
    explicit: bool,
    children: Vec<usize>,
}

/// Flat arena of nodes keyed by stem.
struct Arena {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
}

impl Arena {
    fn new() -> Self {
        let mut arena = Self {
            slots: Vec::new(),
            index: HashMap::new(),
        };
        arena.push("/".to_owned(), "/".to_owned(), None);
        arena
    }

    fn push(&mut self, url: String, stem: String, parent: Option<usize>) -> usize {
        let idx = self.slots.len();
        self.index.insert(stem.clone(), idx);
        self.slots.push(Slot {
            url,
            stem,
            explicit: false,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.slots[parent].children.push(idx);
        }
        idx
    }

    /// Return the slot for `stem`, synthesizing it and its missing ancestors.
    fn ensure(&mut self, stem: &str) -> usize {
        if let Some(&idx) = self.index.get(stem) {
            return idx;
        }
        // The root slot always exists, so every other stem has a parent.
        let parent = parent_stem(stem).map_or(0, |p| self.ensure(p));
        self.push(stem.to_owned(), stem.to_owned(), Some(parent))
    }

    /// Whether `stem` was listed in the input rather than synthesized.
    fn is_explicit(&self, stem: &str) -> bool {
        let idx = self.index.get(stem);
        idx.is_some_and(|&i| self.slots[i].explicit)
    }

    /// Register an explicitly listed URL.
    fn insert(&mut self, url: &str) {
        let stem = tree_stem(url);
        let idx = self.ensure(&stem);
        let slot = &mut self.slots[idx];
        if !slot.explicit {
            slot.explicit = true;
            url.clone_into(&mut slot.url);
        }
    }
}

/// Build a rooted page tree from a flat list of URLs.
///
/// The root `/` is always present. Every URL's ancestor directories exist as
/// nodes, synthesized when the input has gaps. Nodes are flagged against
/// `options.current_url` and then passed to `enrich` exactly once each
/// (synthesized nodes included) so the caller can attach titles.
///
/// Children keep the order in which their URLs first appeared. URLs sharing
/// a stem (e.g. `/a/` and `/a/index.html`) collapse into the first one.
pub fn build_tree<S, F>(urls: &[S], options: &TreeOptions, mut enrich: F) -> TreeNode
where
    S: AsRef<str>,
    F: FnMut(&mut TreeNode),
{
    let mut arena = Arena::new();
    for url in urls {
        let url = url.as_ref();
        if is_ignored(url, &options.ignore_globs) {
            tracing::trace!(url, "ignored by glob");
            continue;
        }
        arena.insert(url);
    }

    let current_stem = options
        .current_url
        .as_deref()
        .map(tree_stem)
        .filter(|stem| arena.is_explicit(stem));

    assemble(&arena, 0, current_stem.as_deref(), &mut enrich)
}

/// Convert the arena rooted at `idx` into owned nodes, post-order.
fn assemble<F>(arena: &Arena, idx: usize, current_stem: Option<&str>, enrich: &mut F) -> TreeNode
where
    F: FnMut(&mut TreeNode),
{
    let slot = &arena.slots[idx];
    let children = slot
        .children
        .iter()
        .map(|&child| assemble(arena, child, current_stem, enrich))
        .collect();

    let (current, is_ancestor) = match current_stem {
        Some(current) => (
            slot.stem == current,
            slot.stem.ends_with('/') && slot.stem != current && current.starts_with(&slot.stem),
        ),
        None => (false, false),
    };

    let mut node = TreeNode {
        url: slot.url.clone(),
        stem: slot.stem.clone(),
        depth: url_depth(&slot.stem),
        current,
        is_ancestor,
        title: String::new(),
        children,
        extra: Map::new(),
    };
    enrich(&mut node);
    node
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn urls_of(node: &TreeNode) -> Vec<&str> {
        node.children.iter().map(|c| c.url.as_str()).collect()
    }

    fn options(current: &str) -> TreeOptions {
        TreeOptions {
            current_url: Some(current.to_owned()),
            ..TreeOptions::default()
        }
    }

    #[test]
    fn test_tree_stem() {
        assert_eq!(tree_stem("/"), "/");
        assert_eq!(tree_stem("/about/"), "/about/");
        assert_eq!(tree_stem("/about/index.html"), "/about/");
        assert_eq!(tree_stem("/index.html"), "/");
        assert_eq!(tree_stem("/a/b.html"), "/a/b");
    }

    #[test]
    fn test_parent_stem() {
        assert_eq!(parent_stem("/"), None);
        assert_eq!(parent_stem("/about/"), Some("/"));
        assert_eq!(parent_stem("/about/history/"), Some("/about/"));
        assert_eq!(parent_stem("/a/b"), Some("/a/"));
    }

    #[test]
    fn test_empty_input_returns_root_only() {
        let urls: [&str; 0] = [];

        let tree = build_tree(&urls, &TreeOptions::default(), |_| {});

        assert_eq!(tree.url, "/");
        assert_eq!(tree.depth, 0);
        assert!(tree.children.is_empty());
        assert!(!tree.current);
    }

    #[test]
    fn test_builds_nested_hierarchy() {
        let urls = ["/", "/about/", "/about/history/", "/contact/"];

        let tree = build_tree(&urls, &TreeOptions::default(), |_| {});

        assert_eq!(urls_of(&tree), vec!["/about/", "/contact/"]);
        assert_eq!(urls_of(&tree.children[0]), vec!["/about/history/"]);
        assert_eq!(tree.children[0].children[0].depth, 2);
    }

    #[test]
    fn test_synthesizes_missing_ancestors() {
        let urls = ["/", "/about/history/2025/"];

        let tree = build_tree(&urls, &TreeOptions::default(), |_| {});

        let about = tree.find_by_url("/about/").unwrap();
        let history = tree.find_by_url("/about/history/").unwrap();
        assert_eq!(about.depth, 1);
        assert_eq!(history.depth, 2);
        assert_eq!(urls_of(history), vec!["/about/history/2025/"]);
    }

    #[test]
    fn test_enrich_runs_once_per_node_including_synthesized() {
        let urls = ["/about/history/", "/about/team.html"];
        let mut seen = Vec::new();

        let tree = build_tree(&urls, &TreeOptions::default(), |node| {
            seen.push(node.url.clone());
            node.title = format!("T:{}", node.stem);
        });

        seen.sort();
        assert_eq!(
            seen,
            vec!["/", "/about/", "/about/history/", "/about/team.html"]
        );
        assert_eq!(tree.title, "T:/");
        assert_eq!(
            tree.find_by_url("/about/team.html").unwrap().title,
            "T:/about/team"
        );
    }

    #[test]
    fn test_children_preserve_input_order() {
        let urls = ["/", "/d/", "/b/", "/c/", "/a/"];

        let tree = build_tree(&urls, &TreeOptions::default(), |_| {});

        assert_eq!(urls_of(&tree), vec!["/d/", "/b/", "/c/", "/a/"]);
    }

    #[test]
    fn test_child_listed_before_parent_keeps_order() {
        let urls = ["/about/team/", "/contact/", "/about/"];

        let tree = build_tree(&urls, &TreeOptions::default(), |_| {});

        assert_eq!(urls_of(&tree), vec!["/about/", "/contact/"]);
        assert_eq!(urls_of(&tree.children[0]), vec!["/about/team/"]);
    }

    #[test]
    fn test_index_file_collapses_into_directory() {
        let urls = ["/", "/about/index.html", "/about/", "/about/team/"];

        let tree = build_tree(&urls, &TreeOptions::default(), |_| {});

        assert_eq!(urls_of(&tree), vec!["/about/index.html"]);
        assert_eq!(tree.children[0].stem, "/about/");
        assert_eq!(tree.count(), 3);
    }

    #[test]
    fn test_index_file_depth_follows_directory() {
        let urls = ["/", "/about/index.html", "/about/team.html"];

        let tree = build_tree(&urls, &options("/about/team.html"), |_| {});

        let about = tree.find_by_url("/about/index.html").unwrap();
        assert_eq!(about.depth, 1);
        assert!(about.is_ancestor);
        assert_eq!(urls_of(about), vec!["/about/team.html"]);
        assert_eq!(about.children[0].depth, 2);
        assert!(about.children[0].current);
    }

    #[test]
    fn test_marks_current_and_ancestors() {
        let urls = [
            "/",
            "/about/",
            "/about/history/",
            "/about/history/2025/",
            "/contact/",
        ];

        let tree = build_tree(&urls, &options("/about/history/2025/"), |_| {});

        assert!(tree.is_ancestor);
        assert!(!tree.current);
        let about = tree.find_by_url("/about/").unwrap();
        assert!(about.is_ancestor);
        let history = tree.find_by_url("/about/history/").unwrap();
        assert!(history.is_ancestor);
        let current = tree.find_current().unwrap();
        assert_eq!(current.url, "/about/history/2025/");
        assert!(!current.is_ancestor);
        let contact = tree.find_by_url("/contact/").unwrap();
        assert!(!contact.is_ancestor);
        assert!(!contact.current);
    }

    #[test]
    fn test_file_page_is_not_an_ancestor() {
        let urls = ["/", "/about.html", "/about/team/"];

        let tree = build_tree(&urls, &options("/about/team/"), |_| {});

        assert!(!tree.find_by_url("/about.html").unwrap().is_ancestor);
        assert!(tree.find_by_url("/about/").unwrap().is_ancestor);
    }

    #[test]
    fn test_root_current_has_no_ancestors() {
        let urls = ["/", "/about/"];

        let tree = build_tree(&urls, &options("/"), |_| {});

        assert!(tree.current);
        assert!(!tree.is_ancestor);
        assert!(!tree.children[0].is_ancestor);
    }

    #[test]
    fn test_absent_current_marks_nothing() {
        let urls = ["/", "/about/team/"];

        let tree = build_tree(&urls, &options("/about/"), |_| {});

        // /about/ exists only as a synthesized node
        assert!(tree.find_current().is_none());
        assert!(!tree.is_ancestor);
    }

    #[test]
    fn test_ignore_globs_drop_matching_urls() {
        let urls = ["/", "/about/", "/drafts/post/", "/drafts/other.html"];
        let options = TreeOptions {
            current_url: None,
            ignore_globs: vec![Pattern::new("drafts/*").unwrap()],
        };

        let tree = build_tree(&urls, &options, |_| {});

        assert_eq!(urls_of(&tree), vec!["/about/"]);
    }

    #[test]
    fn test_serializes_with_camel_case_flag_and_flattened_extra() {
        let urls = ["/"];
        let tree = build_tree(&urls, &options("/"), |node| node.title = "Home".to_owned());
        let tree = tree.with_extra("badge", "new");

        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "url": "/",
                "stem": "/",
                "depth": 0,
                "current": true,
                "isAncestor": false,
                "title": "Home",
                "children": [],
                "badge": "new",
            })
        );
    }
}
