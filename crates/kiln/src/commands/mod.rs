//! CLI command implementations.

pub(crate) mod breadcrumbs;
pub(crate) mod nav;
pub(crate) mod title;
pub(crate) mod tree;

use std::path::PathBuf;

use clap::Args;
use kiln_cache::MemoryCache;
use kiln_config::{CliSettings, Config};
use kiln_site::{FsTitleResolver, PageLayout, PageRecord, find_page, scan_pages};

use crate::error::CliError;

pub(crate) use breadcrumbs::BreadcrumbsArgs;
pub(crate) use nav::NavArgs;
pub(crate) use title::TitleArgs;
pub(crate) use tree::TreeArgs;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover kiln.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page source directory (overrides config).
    #[arg(short, long, env = "KILN_INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Built output directory (overrides config).
    #[arg(short, long, env = "KILN_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Loaded configuration, page catalog and title resolver.
pub(crate) struct SiteContext {
    pub config: Config,
    pub pages: Vec<PageRecord>,
    pub titles: FsTitleResolver,
}

impl SiteArgs {
    /// Load configuration and scan the page catalog.
    ///
    /// `overrides` carries command-specific settings; directory flags from
    /// these arguments are merged in.
    pub(crate) fn load(&self, overrides: CliSettings) -> Result<SiteContext, CliError> {
        let settings = CliSettings {
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            ..overrides
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;

        let site = &config.site_resolved;
        let layout = PageLayout {
            input_dir: site.input_dir.clone(),
            output_dir: site.output_dir.clone(),
            output_extension: site.output_extension.clone(),
        };
        let pages = scan_pages(&layout, &site.page_extensions)?;
        tracing::info!(
            input_dir = %site.input_dir.display(),
            pages = pages.len(),
            "Loaded site"
        );

        let titles = FsTitleResolver::new(&site.output_dir, &MemoryCache::new());
        Ok(SiteContext {
            config,
            pages,
            titles,
        })
    }
}

impl SiteContext {
    /// Look up the page a command operates on.
    pub(crate) fn page(&self, url: &str) -> Result<&PageRecord, CliError> {
        find_page(&self.pages, url).ok_or_else(|| CliError::PageNotFound(url.to_owned()))
    }
}
