use crate::github::GithubClient;
use crate::model::{ContributionTable, Release};
use futures::{stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;

/// Fan out one commit fetch per release tag, at most `concurrency` in flight,
/// and fold completions into a `ContributionTable`. Each task resolves to
/// `(tag, Result<Vec<Commit>>)`; a failed tag is logged and contributes
/// nothing, without affecting its siblings. Folding happens only here, on the
/// collecting side, so the table has a single writer.
pub async fn aggregate(
    client: &GithubClient,
    releases: &[Release],
    concurrency: usize,
    progress: bool,
) -> ContributionTable {
    let pb = if progress {
        ProgressBar::new(releases.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message("Fetching commit histories...");

    let mut table = ContributionTable::new();
    let mut results = stream::iter(releases.iter().map(|release| {
        let tag = release.tag_name.clone();
        async move {
            let commits = client.list_commits(&tag).await;
            (tag, commits)
        }
    }))
    .buffer_unordered(concurrency.max(1));

    while let Some((tag, result)) = results.next().await {
        match result {
            Ok(commits) => {
                for commit in &commits {
                    if let Some(author) = commit.author_name() {
                        table.record(author, &tag);
                    }
                }
            }
            Err(err) => warn!("skipping release {tag}: {err}"),
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn commits_by(names: &[Option<&str>]) -> serde_json::Value {
        serde_json::Value::Array(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| match name {
                    Some(n) => json!({
                        "sha": format!("{i:x}"),
                        "commit": { "author": { "name": n } }
                    }),
                    None => json!({
                        "sha": format!("{i:x}"),
                        "commit": { "author": null }
                    }),
                })
                .collect(),
        )
    }

    fn release(tag: &str) -> Release {
        Release {
            tag_name: tag.to_string(),
        }
    }

    async fn mount_commits(server: &MockServer, tag: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/commits"))
            .and(query_param("sha", tag))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/commits"))
            .and(query_param("sha", tag))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> GithubClient {
        GithubClient::new("owner", "repo", &server.uri(), None).unwrap()
    }

    #[tokio::test]
    async fn counts_commits_per_author_per_release() {
        let server = MockServer::start().await;
        mount_commits(&server, "v1", commits_by(&[Some("A"), Some("A"), Some("B")])).await;
        mount_commits(&server, "v2", commits_by(&[Some("A")])).await;

        let client = client_for(&server);
        let table = aggregate(&client, &[release("v1"), release("v2")], 10, false).await;

        assert_eq!(table.get("A", "v1"), Some(2));
        assert_eq!(table.get("A", "v2"), Some(1));
        assert_eq!(table.get("B", "v1"), Some(1));
        assert_eq!(table.get("B", "v2"), None);
        assert_eq!(table.total_commits(), 4);
    }

    #[tokio::test]
    async fn authorless_commits_are_skipped() {
        let server = MockServer::start().await;
        mount_commits(&server, "v1", commits_by(&[Some("A"), None, None])).await;

        let client = client_for(&server);
        let table = aggregate(&client, &[release("v1")], 10, false).await;

        assert_eq!(table.get("A", "v1"), Some(1));
        assert_eq!(table.total_commits(), 1);
    }

    #[tokio::test]
    async fn failed_tag_is_isolated_from_siblings() {
        let server = MockServer::start().await;
        mount_commits(&server, "v1", commits_by(&[Some("A"), Some("B")])).await;
        mount_commits(&server, "v3", commits_by(&[Some("B")])).await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/commits"))
            .and(query_param("sha", "v2"))
            .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let table = aggregate(
            &client,
            &[release("v1"), release("v2"), release("v3")],
            10,
            false,
        )
        .await;

        assert_eq!(table.get("A", "v1"), Some(1));
        assert_eq!(table.get("B", "v1"), Some(1));
        assert_eq!(table.get("B", "v3"), Some(1));
        assert!(table.rows().all(|(_, tag, _)| tag != "v2"));
    }

    #[tokio::test]
    async fn pool_width_does_not_change_the_result() {
        let server = MockServer::start().await;
        for i in 0..20 {
            mount_commits(
                &server,
                &format!("v{i}"),
                commits_by(&[Some("A"), Some("B"), Some(&format!("dev{}", i % 3))]),
            )
            .await;
        }
        let releases: Vec<Release> = (0..20).map(|i| release(&format!("v{i}"))).collect();

        let client = client_for(&server);
        let narrow = aggregate(&client, &releases, 1, false).await;
        let wide = aggregate(&client, &releases, 10, false).await;

        assert_eq!(narrow, wide);
        assert_eq!(narrow.total_commits(), 60);
    }
}
