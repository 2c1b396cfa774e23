//! Navigation subtree resolution.
//!
//! [`get_nav_tree`] builds the full page tree, locates the current page and
//! returns the subtree rooted at its ancestor on the requested depth. An
//! optional node transform then runs bottom-up over that subtree and may
//! drop nodes; dropping a node drops everything beneath it.

use std::collections::HashMap;

use glob::Pattern;

use crate::page::PageRecord;
use crate::title::{OptimizeTitle, TitleResolver, resolve_page_title};
use crate::tree::{TreeNode, TreeOptions, build_tree};

/// Node transform: `Ok(None)` removes the node and its subtree.
pub type TransformNode<'a, E> = &'a dyn Fn(TreeNode) -> Result<Option<TreeNode>, E>;

/// Options for [`get_nav_tree`].
pub struct NavOptions<'a, E> {
    /// Depth of the returned subtree root (default: current depth - 1).
    pub base_depth: Option<usize>,
    /// URLs matching these patterns are left out of the tree.
    pub ignore_globs: Vec<Pattern>,
    /// Post-processing for titles found in page content.
    pub optimize_title: Option<OptimizeTitle<'a>>,
    /// Bottom-up node transform.
    pub transform_node: Option<TransformNode<'a, E>>,
}

impl<E> Default for NavOptions<'_, E> {
    fn default() -> Self {
        Self {
            base_depth: None,
            ignore_globs: Vec::new(),
            optimize_title: None,
            transform_node: None,
        }
    }
}

/// Title shown for tree nodes that have neither a catalog page nor a built file.
fn not_found_title(stem: &str) -> String {
    format!("⛔️ NOT FOUND ({stem})")
}

/// Build the titled page tree for a catalog.
///
/// Nodes backed by a catalog page take that page's title. Other nodes are
/// looked up as built files through [`TitleResolver::static_title`] and get a
/// "NOT FOUND" title when that fails too.
pub fn build_page_tree(
    all_pages: &[PageRecord],
    options: &TreeOptions,
    titles: &dyn TitleResolver,
    optimize_title: Option<OptimizeTitle<'_>>,
) -> TreeNode {
    let mut by_url: HashMap<&str, &PageRecord> = HashMap::with_capacity(all_pages.len());
    for page in all_pages {
        by_url.entry(page.url.as_str()).or_insert(page);
    }
    let urls: Vec<&str> = all_pages.iter().map(|p| p.url.as_str()).collect();

    build_tree(&urls, options, |node| {
        node.title = match by_url.get(node.url.as_str()) {
            Some(page) => resolve_page_title(page, titles, optimize_title),
            None => titles
                .static_title(&node.url, optimize_title)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| not_found_title(&node.stem)),
        };
    })
}

/// Resolve the navigation subtree for `current`.
///
/// Returns `Ok(None)` when `current` is not in the tree, when no ancestor
/// exists at the requested depth, or when the transform removes the subtree
/// root.
///
/// # Errors
///
/// Returns the first error produced by `options.transform_node`, unchanged.
pub fn get_nav_tree<E>(
    current: &PageRecord,
    all_pages: &[PageRecord],
    titles: &dyn TitleResolver,
    options: &NavOptions<'_, E>,
) -> Result<Option<TreeNode>, E> {
    let tree_options = TreeOptions {
        current_url: Some(current.url.clone()),
        ignore_globs: options.ignore_globs.clone(),
    };
    let tree = build_page_tree(all_pages, &tree_options, titles, options.optimize_title);

    let Some(current_depth) = tree.find_current().map(|node| node.depth) else {
        tracing::debug!(url = %current.url, "Current page not in nav tree");
        return Ok(None);
    };
    let target_depth = options
        .base_depth
        .unwrap_or_else(|| current_depth.saturating_sub(1));

    let dir = containing_dir(&current.url);
    let Some(subtree) = take_ancestor_at_depth(tree, dir, target_depth) else {
        tracing::debug!(url = %current.url, target_depth, "Nav tree target depth unreachable");
        return Ok(None);
    };

    match options.transform_node {
        Some(transform) => transform_tree(subtree, transform),
        None => Ok(Some(subtree)),
    }
}

/// Directory holding `url`: `/a/b/` → `/a/`, `/a/b.html` → `/a/`, `/` → `/`.
fn containing_dir(url: &str) -> &str {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    trimmed.rfind('/').map_or("/", |pos| &trimmed[..=pos])
}

/// Walk down from `node` through the directory children containing `dir`
/// until a node at `target_depth` is reached.
fn take_ancestor_at_depth(mut node: TreeNode, dir: &str, target_depth: usize) -> Option<TreeNode> {
    loop {
        if node.depth == target_depth {
            return Some(node);
        }
        let pos = node
            .children
            .iter()
            .position(|child| child.is_directory() && dir.starts_with(&child.stem))?;
        node = node.children.swap_remove(pos);
    }
}

/// Apply `transform` to every node of `node`, children before parents.
///
/// Each node is handed to `transform` with only its surviving children
/// attached. A node for which `transform` returns `Ok(None)` is removed
/// together with its subtree; sibling order is otherwise kept.
///
/// # Errors
///
/// Stops at and returns the first error from `transform`.
pub fn transform_tree<E>(
    mut node: TreeNode,
    transform: TransformNode<'_, E>,
) -> Result<Option<TreeNode>, E> {
    let children = std::mem::take(&mut node.children);
    let mut kept = Vec::with_capacity(children.len());
    for child in children {
        if let Some(child) = transform_tree(child, transform)? {
            kept.push(child);
        }
    }
    node.children = kept;
    transform(node)
}

/// Find the node with `url` in `tree`.
#[must_use]
pub fn find_node_by_url<'a>(tree: &'a TreeNode, url: &str) -> Option<&'a TreeNode> {
    tree.find_by_url(url)
}

/// Find the node marked as current in `tree`.
#[must_use]
pub fn find_current_node(tree: &TreeNode) -> Option<&TreeNode> {
    tree.find_current()
}
