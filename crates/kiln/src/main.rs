//! kiln CLI - page hierarchy engine.
//!
//! Provides commands for:
//! - `breadcrumbs`: Breadcrumb trail of a page as JSON
//! - `nav`: Navigation subtree around a page as JSON
//! - `title`: Document title composed from the breadcrumb trail
//! - `tree`: Full page tree as JSON

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BreadcrumbsArgs, NavArgs, SiteArgs, TitleArgs, TreeArgs};
use output::Output;

/// kiln - page hierarchy engine.
#[derive(Parser)]
#[command(name = "kiln", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the breadcrumb trail of a page.
    Breadcrumbs(BreadcrumbsArgs),
    /// Print the navigation subtree around a page.
    Nav(NavArgs),
    /// Print the document title of a page.
    Title(TitleArgs),
    /// Print the full page tree.
    Tree(TreeArgs),
}

impl Commands {
    fn site_args(&self) -> &SiteArgs {
        match self {
            Self::Breadcrumbs(args) => &args.site,
            Self::Nav(args) => &args.site,
            Self::Title(args) => &args.site,
            Self::Tree(args) => &args.site,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.command.site_args().verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Breadcrumbs(args) => args.execute(&output),
        Commands::Nav(args) => args.execute(&output),
        Commands::Title(args) => args.execute(&output),
        Commands::Tree(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
