use crate::model::{ContributionTable, ReportOutput, ReportRow, SCHEMA_VERSION};
use anyhow::Result;
use chrono::Utc;
use console::style;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Overwrite `path` with the full report: a `Developer,Release,Commits`
/// header, then one row per (developer, release) pair in first-seen order.
pub fn write_csv(path: &Path, table: &ContributionTable) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "Developer,Release,Commits")?;
    for (developer, release, commits) in table.rows() {
        writeln!(
            out,
            "{},{},{}",
            csv_field(developer),
            csv_field(release),
            commits
        )?;
    }

    out.flush()?;
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn report_rows(table: &ContributionTable) -> Vec<ReportRow> {
    table
        .rows()
        .map(|(developer, release, commits)| ReportRow {
            developer: developer.to_string(),
            release: release.to_string(),
            commits,
        })
        .collect()
}

pub fn output_json(table: &ContributionTable, owner: &str, repo: &str) -> Result<()> {
    let output = ReportOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        owner: owner.to_string(),
        repo: repo.to_string(),
        rows: report_rows(table),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson(table: &ContributionTable) -> Result<()> {
    for row in report_rows(table) {
        println!("{}", serde_json::to_string(&row)?);
    }
    Ok(())
}

pub fn output_table(table: &ContributionTable, owner: &str, repo: &str) -> Result<()> {
    println!("{}", style("Contribution Summary").bold());
    println!("{}", "─".repeat(50));

    if table.is_empty() {
        println!("No contributions found for {owner}/{repo}");
        return Ok(());
    }

    println!("Repository: {}", style(format!("{owner}/{repo}")).cyan());
    println!("Releases analyzed: {}", style(table.release_count()).cyan());
    println!("Developers: {}", style(table.author_count()).cyan());
    println!("Commits counted: {}", style(table.total_commits()).cyan());

    println!("\n{:<40} {:>8}", style("Developer").bold(), style("Commits").bold());
    for (developer, total) in table.author_totals().iter().take(20) {
        println!("{:<40} {:>8}", developer, total);
    }
    if table.author_count() > 20 {
        println!("\n... and {} more developers", table.author_count() - 20);
    }

    Ok(())
}
