use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
}

/// One entry from the commits endpoint. Only the author name is consumed;
/// every link in the `commit.author.name` chain may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub commit: Option<CommitDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

impl Commit {
    pub fn author_name(&self) -> Option<&str> {
        self.commit.as_ref()?.author.as_ref()?.name.as_deref()
    }
}

/// Per-author, per-release commit counts. Both levels keep first-seen
/// insertion order, which the CSV writer iterates in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContributionTable {
    counts: IndexMap<String, IndexMap<String, u64>>,
}

impl ContributionTable {
    pub fn new() -> Self {
        Self { counts: IndexMap::new() }
    }

    pub fn record(&mut self, author: &str, tag: &str) {
        *self
            .counts
            .entry(author.to_string())
            .or_default()
            .entry(tag.to_string())
            .or_insert(0) += 1;
    }

    pub fn get(&self, author: &str, tag: &str) -> Option<u64> {
        self.counts.get(author)?.get(tag).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn author_count(&self) -> usize {
        self.counts.len()
    }

    pub fn release_count(&self) -> usize {
        let mut tags: Vec<&str> = Vec::new();
        for releases in self.counts.values() {
            for tag in releases.keys() {
                if !tags.contains(&tag.as_str()) {
                    tags.push(tag);
                }
            }
        }
        tags.len()
    }

    pub fn total_commits(&self) -> u64 {
        self.counts.values().flat_map(|r| r.values()).sum()
    }

    /// Flattened (developer, release, count) triples in insertion order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.counts.iter().flat_map(|(author, releases)| {
            releases
                .iter()
                .map(move |(tag, count)| (author.as_str(), tag.as_str(), *count))
        })
    }

    /// Total commits per author, sorted most-active-first.
    pub fn author_totals(&self) -> Vec<(&str, u64)> {
        let mut totals: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(author, releases)| (author.as_str(), releases.values().sum()))
            .collect();
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportRow {
    pub developer: String,
    pub release: String,
    pub commits: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub owner: String,
    pub repo: String,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseListOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub owner: String,
    pub repo: String,
    pub tags: Vec<String>,
}
