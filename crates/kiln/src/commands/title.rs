//! `kiln title` command implementation.

use clap::Args;
use kiln_config::CliSettings;
use kiln_site::{TitleListOptions, title_list};

use super::{SiteArgs, SiteContext, breadcrumbs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the title command.
#[derive(Args)]
pub(crate) struct TitleArgs {
    /// URL of the page (e.g. /about/team/).
    url: String,

    /// Separator between titles (overrides config).
    #[arg(short, long)]
    separator: Option<String>,

    /// Site name used as suffix and fallback (overrides config).
    #[arg(long, env = "KILN_SITE_NAME")]
    site_name: Option<String>,

    #[command(flatten)]
    pub site: SiteArgs,
}

impl TitleArgs {
    /// Execute the title command.
    ///
    /// # Errors
    ///
    /// Returns an error if the site cannot be loaded or the page is unknown.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let ctx = self.site.load(CliSettings {
            site_name: self.site_name,
            ..CliSettings::default()
        })?;
        let title = resolve(&ctx, &self.url, self.separator)?;
        output.result(&title)
    }
}

/// Document title of `url` composed from its breadcrumbs.
pub(crate) fn resolve(
    ctx: &SiteContext,
    url: &str,
    separator: Option<String>,
) -> Result<String, CliError> {
    let items = breadcrumbs::resolve(ctx, url)?;
    let config = &ctx.config.title_list;
    let options = TitleListOptions {
        separator: Some(separator.unwrap_or_else(|| config.separator.clone())),
        base_url: Some(ctx.config.breadcrumbs.base_url.clone()),
        prefix: Some(config.prefix.clone()),
        suffix: config.suffix.clone(),
        site_name: ctx.config.site_resolved.site_name.clone(),
        fallback: config.fallback.clone(),
    };
    Ok(title_list(&items, &options))
}
