use crate::cli::CommonArgs;
use crate::github::{parse_repo_slug, GithubClient};
use crate::model::{ReleaseListOutput, SCHEMA_VERSION};
use crate::report::{aggregate, output_json, output_ndjson, output_table, write_csv};
use anyhow::{Context, Result};
use chrono::Utc;
use console::style;
use log::warn;
use std::path::PathBuf;

/// End-to-end report run: resolve the repository, fetch releases, aggregate
/// commit counts, write the CSV, then print in the requested format.
pub async fn exec_report(
    common: CommonArgs,
    output: PathBuf,
    json: bool,
    ndjson: bool,
) -> Result<()> {
    let (owner, repo) =
        parse_repo_slug(&common.repo).context("Failed to parse repository slug")?;
    let client = GithubClient::new(&owner, &repo, &common.api_base, common.resolved_token())
        .context("Failed to build GitHub client")?;

    let human = !json && !ndjson;
    if human {
        println!(
            "Analyzing contributions for {} (up to {} releases)...",
            style(format!("{owner}/{repo}")).cyan(),
            common.limit
        );
    }

    let releases = client.list_releases(common.limit).await;
    if releases.is_empty() {
        warn!("no releases found for {owner}/{repo}");
    }

    let table = aggregate(&client, &releases, common.concurrency, human).await;

    write_csv(&output, &table).context("Failed to write CSV report")?;

    if json {
        output_json(&table, &owner, &repo)?;
    } else if ndjson {
        output_ndjson(&table)?;
    } else {
        output_table(&table, &owner, &repo)?;
        println!("\nReport written to {}", style(output.display()).green());
    }

    Ok(())
}

/// List the release tags a report run would analyze, newest first.
pub async fn exec_releases(common: CommonArgs, json: bool, ndjson: bool) -> Result<()> {
    let (owner, repo) =
        parse_repo_slug(&common.repo).context("Failed to parse repository slug")?;
    let client = GithubClient::new(&owner, &repo, &common.api_base, common.resolved_token())
        .context("Failed to build GitHub client")?;

    let releases = client.list_releases(common.limit).await;
    let tags: Vec<String> = releases.into_iter().map(|r| r.tag_name).collect();

    if json {
        let output = ReleaseListOutput {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            owner,
            repo,
            tags,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if ndjson {
        for tag in &tags {
            println!("{}", serde_json::to_string(tag)?);
        }
    } else {
        if tags.is_empty() {
            println!("No releases found for {owner}/{repo}");
            return Ok(());
        }
        println!(
            "{} releases for {}:",
            style(tags.len()).cyan(),
            style(format!("{owner}/{repo}")).cyan()
        );
        for tag in &tags {
            println!("  {tag}");
        }
    }

    Ok(())
}
