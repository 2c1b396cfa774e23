//! Page hierarchy derivation for kiln.
//!
//! This crate turns a flat page catalog into the structures a site template
//! needs:
//! - [`build_tree`]: rooted page tree inferred from URL strings
//! - [`get_breadcrumbs`]: ancestor trail of a page, root first
//! - [`get_nav_tree`]: navigation subtree around a page, with a bottom-up
//!   node transform that can prune branches
//! - [`title_list`]: document title composed from a breadcrumb trail
//!
//! Titles that pages do not carry themselves are looked up through a
//! [`TitleResolver`]; [`FsTitleResolver`] reads sources and built output and
//! memoizes through a [`kiln_cache::Cache`].
//!
//! # Quick Start
//!
//! ```
//! use kiln_site::{NavOptions, NullTitleResolver, PageRecord, get_nav_tree};
//!
//! let pages = vec![
//!     PageRecord::from_url("/").with_title("Home"),
//!     PageRecord::from_url("/about/").with_title("About"),
//!     PageRecord::from_url("/about/team/").with_title("Team"),
//! ];
//!
//! let nav = get_nav_tree::<std::convert::Infallible>(
//!     &pages[2],
//!     &pages,
//!     &NullTitleResolver,
//!     &NavOptions::default(),
//! )
//! .unwrap()
//! .unwrap();
//!
//! assert_eq!(nav.url, "/about/");
//! assert_eq!(nav.children[0].title, "Team");
//! ```

mod breadcrumbs;
mod catalog;
mod nav;
mod page;
mod title;
mod title_list;
mod tree;

pub use breadcrumbs::{BreadcrumbItem, BreadcrumbOptions, TransformItem, get_breadcrumbs};
pub use catalog::{CatalogError, find_page, scan_pages};
pub use nav::{
    NavOptions, TransformNode, build_page_tree, find_current_node, find_node_by_url, get_nav_tree,
    transform_tree,
};
pub use page::{
    OutputPathInfo, PageError, PageLayout, PageRecord, compute_output_path, path_stem_for_url,
    url_depth,
};
pub use title::{
    FsTitleResolver, MetadataError, NO_TITLE, NullTitleResolver, OptimizeTitle, PageMetadata,
    TitleResolver, extract_title_tag, parse_front_matter,
};
pub use title_list::{TitleListOptions, title_list};
pub use tree::{TreeNode, TreeOptions, build_tree, tree_stem};
