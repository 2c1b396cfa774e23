//! `kiln breadcrumbs` command implementation.

use clap::Args;
use kiln_config::CliSettings;
use kiln_site::{BreadcrumbItem, BreadcrumbOptions, get_breadcrumbs};

use super::{SiteArgs, SiteContext};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the breadcrumbs command.
#[derive(Args)]
pub(crate) struct BreadcrumbsArgs {
    /// URL of the page (e.g. /about/team/).
    url: String,

    /// Drop breadcrumbs shallower than this URL (overrides config).
    #[arg(long)]
    base_url: Option<String>,

    #[command(flatten)]
    pub site: SiteArgs,
}

impl BreadcrumbsArgs {
    /// Execute the breadcrumbs command.
    ///
    /// # Errors
    ///
    /// Returns an error if the site cannot be loaded or the page is unknown.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let ctx = self.site.load(CliSettings {
            base_url: self.base_url,
            ..CliSettings::default()
        })?;
        let items = resolve(&ctx, &self.url)?;
        output.json(&items)
    }
}

/// Breadcrumbs of `url` using the configured base URL.
pub(crate) fn resolve(ctx: &SiteContext, url: &str) -> Result<Vec<BreadcrumbItem>, CliError> {
    let page = ctx.page(url)?;
    let options = BreadcrumbOptions::<CliError> {
        base_url: Some(&ctx.config.breadcrumbs.base_url),
        ..BreadcrumbOptions::default()
    };
    get_breadcrumbs(page, &ctx.pages, &ctx.titles, &options)
}
