//! Site query commands: `sites`, `site` and `stats`.

use std::io::Write;

use clap::Args;
use sitescore_store::{Page, SiteFilter};

use crate::database::DatabaseArgs;
use crate::{CliError, write_json};

/// Optional inclusive bounds on the total score.
#[derive(Debug, Clone, Copy, Default, Args)]
pub(crate) struct ScoreBoundsArgs {
    /// Lowest total score to include.
    #[arg(long = "min-score", value_name = "score")]
    pub(crate) min_score: Option<f64>,
    /// Highest total score to include.
    #[arg(long = "max-score", value_name = "score")]
    pub(crate) max_score: Option<f64>,
}

impl From<ScoreBoundsArgs> for SiteFilter {
    fn from(bounds: ScoreBoundsArgs) -> Self {
        Self {
            min_score: bounds.min_score,
            max_score: bounds.max_score,
        }
    }
}

/// CLI arguments for the `sites` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct SitesArgs {
    #[command(flatten)]
    pub(crate) database: DatabaseArgs,
    #[command(flatten)]
    pub(crate) bounds: ScoreBoundsArgs,
    /// Maximum number of sites to print.
    #[arg(long, value_name = "count")]
    pub(crate) limit: Option<u32>,
    /// Number of ranked sites to skip.
    #[arg(long, value_name = "count", default_value_t = 0)]
    pub(crate) offset: u32,
}

/// CLI arguments for the `site` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct SiteArgs {
    /// Identifier of the site to print.
    #[arg(value_name = "id")]
    pub(crate) id: u64,
    #[command(flatten)]
    pub(crate) database: DatabaseArgs,
}

/// CLI arguments for the `stats` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct StatsArgs {
    #[command(flatten)]
    pub(crate) database: DatabaseArgs,
    #[command(flatten)]
    pub(crate) bounds: ScoreBoundsArgs,
}

pub(super) fn run_sites_with(args: &SitesArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let registry = args.database.open_existing()?;
    let page = Page {
        limit: args.limit,
        offset: args.offset,
    };
    let sites = registry.list_sites(&args.bounds.into(), page)?;
    write_json(writer, &sites)
}

pub(super) fn run_site_with(args: &SiteArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let registry = args.database.open_existing()?;
    let site = registry
        .site(args.id)?
        .ok_or(CliError::SiteNotFound { id: args.id })?;
    write_json(writer, &site)
}

pub(super) fn run_stats_with(args: &StatsArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let registry = args.database.open_existing()?;
    let statistics = registry.statistics(&args.bounds.into())?;
    write_json(writer, &statistics)
}
