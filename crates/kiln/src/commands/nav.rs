//! `kiln nav` command implementation.

use clap::Args;
use kiln_config::CliSettings;
use kiln_site::{NavOptions, TreeNode, get_nav_tree};

use super::{SiteArgs, SiteContext};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// URL of the current page (e.g. /about/team/).
    url: String,

    /// Depth of the returned subtree root (overrides config).
    #[arg(short, long)]
    depth: Option<usize>,

    /// Glob of URLs to leave out; repeatable (replaces config globs).
    #[arg(long = "ignore", value_name = "GLOB")]
    ignore: Vec<String>,

    #[command(flatten)]
    pub site: SiteArgs,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// Prints `null` when no subtree exists at the requested depth.
    ///
    /// # Errors
    ///
    /// Returns an error if the site cannot be loaded or the page is unknown.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let ctx = self.site.load(CliSettings {
            base_depth: self.depth,
            ignore_globs: (!self.ignore.is_empty()).then_some(self.ignore),
            ..CliSettings::default()
        })?;
        let tree = resolve(&ctx, &self.url)?;
        if tree.is_none() {
            output.warning(&format!("No navigation tree for {}", self.url));
        }
        output.json(&tree)
    }
}

/// Navigation subtree of `url` using the configured depth and globs.
pub(crate) fn resolve(ctx: &SiteContext, url: &str) -> Result<Option<TreeNode>, CliError> {
    let page = ctx.page(url)?;
    let options = NavOptions::<CliError> {
        base_depth: ctx.config.nav.base_depth,
        ignore_globs: ctx.config.nav.ignore_patterns()?,
        ..NavOptions::default()
    };
    get_nav_tree(page, &ctx.pages, &ctx.titles, &options)
}
