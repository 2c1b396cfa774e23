//! `kiln tree` command implementation.

use clap::Args;
use kiln_config::CliSettings;
use kiln_site::{TreeNode, TreeOptions, build_page_tree};

use super::{SiteArgs, SiteContext};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    /// Mark this URL and its ancestors in the output.
    #[arg(long)]
    current: Option<String>,

    #[command(flatten)]
    pub site: SiteArgs,
}

impl TreeArgs {
    /// Execute the tree command.
    ///
    /// # Errors
    ///
    /// Returns an error if the site cannot be loaded.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let ctx = self.site.load(CliSettings::default())?;
        let tree = resolve(&ctx, self.current)?;
        output.json(&tree)
    }
}

/// Full page tree, ignore globs from config applied.
pub(crate) fn resolve(ctx: &SiteContext, current: Option<String>) -> Result<TreeNode, CliError> {
    let options = TreeOptions {
        current_url: current,
        ignore_globs: ctx.config.nav.ignore_patterns()?,
    };
    Ok(build_page_tree(&ctx.pages, &options, &ctx.titles, None))
}
