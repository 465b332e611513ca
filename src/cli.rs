use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "churnmap")]
#[command(about = "Contributor churn reports for GitHub repositories, aggregated per release")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Repository slug, e.g. angular/angular")]
    pub repo: String,

    #[arg(long, help = "API token (falls back to the GITHUB_TOKEN environment variable)")]
    pub token: Option<String>,

    #[arg(
        long,
        default_value = "https://api.github.com",
        help = "Base URL of the GitHub REST API"
    )]
    pub api_base: String,

    #[arg(long, default_value_t = 100, help = "Maximum number of releases to analyze")]
    pub limit: usize,

    #[arg(long, default_value_t = 10, help = "Concurrent commit fetches")]
    pub concurrency: usize,
}

impl CommonArgs {
    /// Explicit flag wins over the environment; empty values mean
    /// unauthenticated requests.
    pub fn resolved_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate per-developer commit counts per release and write a CSV report
    Report {
        #[arg(long, help = "Output file path", default_value = "developer_contributions.csv")]
        output: PathBuf,

        #[arg(long, help = "Print the report as JSON instead of a summary")]
        json: bool,

        #[arg(long, help = "Print the report as NDJSON instead of a summary")]
        ndjson: bool,
    },
    /// List the release tags that would be analyzed
    Releases {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Report { output, json, ndjson } => {
                crate::report::exec_report(self.common, output, json, ndjson).await
            }
            Commands::Releases { json, ndjson } => {
                crate::report::exec_releases(self.common, json, ndjson).await
            }
        }
    }
}
