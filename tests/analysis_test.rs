//! Aggregator tests through the public API
//!
//! Drives `Analyzer` with an in-memory repository source.

use repolens::analysis::{AnalysisError, Analyzer};
use repolens::github::{GitHubError, GitHubResult, RepositorySource};
use repolens::models::{CommitRecord, LanguageBytes, RepoRef, TreeEntry};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
struct MemorySource {
    tree: Vec<TreeEntry>,
    languages: Vec<(&'static str, u64)>,
    commits: Vec<CommitRecord>,
    fail_tree: bool,
    latency: Duration,
}

impl RepositorySource for MemorySource {
    fn tree(&self, _repo: &RepoRef) -> GitHubResult<Vec<TreeEntry>> {
        std::thread::sleep(self.latency);
        if self.fail_tree {
            return Err(GitHubError::Unauthorized);
        }
        Ok(self.tree.clone())
    }

    fn languages(&self, _repo: &RepoRef) -> GitHubResult<LanguageBytes> {
        std::thread::sleep(self.latency);
        Ok(self
            .languages
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect())
    }

    fn commits(&self, _repo: &RepoRef, per_page: u32) -> GitHubResult<Vec<CommitRecord>> {
        std::thread::sleep(self.latency);
        Ok(self.commits.iter().take(per_page as usize).cloned().collect())
    }
}

fn scenario() -> MemorySource {
    MemorySource {
        tree: vec![
            TreeEntry::tree("src"),
            TreeEntry::blob("src/main.go", Some(100)),
            TreeEntry::blob("src/util.go", Some(200)),
            TreeEntry::blob("web/app.ts", Some(300)),
            TreeEntry::blob("data/dump.bin", Some(600_000)),
            TreeEntry::blob("LICENSE", Some(50)),
        ],
        languages: vec![("Go", 80), ("TS", 20)],
        commits: vec![
            CommitRecord::new("A", "2024-01-01T12:00:00Z"),
            CommitRecord::new("A", "2024-01-01T08:00:00Z"),
            CommitRecord::new("B", "2024-01-02T09:30:00Z"),
        ],
        ..Default::default()
    }
}

fn repo() -> RepoRef {
    RepoRef::new("acme", "widgets")
}

#[tokio::test]
async fn test_reference_scenario() {
    let report = Analyzer::new(scenario())
        .analyze(&repo(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.file_analysis.total_files, 5);
    assert_eq!(report.file_analysis.largest_files[0].size, 600_000);
    assert_eq!(report.file_analysis.largest_files.len(), 5);
    assert_eq!(report.languages.languages["Go"], 80);
    assert_eq!(report.languages.languages["TS"], 20);
    assert_eq!(report.languages.primary_language, "Go");
    assert_eq!(report.commits.total_commits, 3);
    assert_eq!(report.commits.commit_frequency.len(), 2);
    assert_eq!(report.commits.commit_frequency[0].date, "2024-01-01");
    assert_eq!(report.commits.commit_frequency[0].count, 2);
    assert_eq!(report.commits.top_contributors[0].author, "A");
    assert_eq!(report.health_score, 16);
}

#[tokio::test]
async fn test_empty_repository() {
    let report = Analyzer::new(MemorySource::default())
        .analyze(&repo(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.file_analysis.total_files, 0);
    assert!(report.file_analysis.largest_files.is_empty());
    assert_eq!(report.languages.primary_language, "Unknown");
    assert!(report.commits.top_contributors.is_empty());
    assert_eq!(report.health_score, 0);
}

#[tokio::test]
async fn test_upstream_failure_yields_no_report() {
    let source = MemorySource {
        fail_tree: true,
        ..scenario()
    };
    let result = Analyzer::new(source)
        .analyze(&repo(), &CancellationToken::new())
        .await;

    match result {
        Err(AnalysisError::Upstream(GitHubError::Unauthorized)) => {}
        other => panic!("expected Upstream(Unauthorized), got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reads_run_concurrently() {
    let source = MemorySource {
        latency: Duration::from_millis(300),
        ..scenario()
    };
    let started = Instant::now();
    Analyzer::new(source)
        .analyze(&repo(), &CancellationToken::new())
        .await
        .unwrap();

    // Three sequential reads would take at least 900ms
    assert!(started.elapsed() < Duration::from_millis(850));
}

#[tokio::test]
async fn test_cancel_mid_flight() {
    let source = MemorySource {
        latency: Duration::from_millis(400),
        ..scenario()
    };
    let analyzer = Analyzer::new(source);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = analyzer.analyze(&repo(), &cancel).await;
    assert!(matches!(result, Err(AnalysisError::Cancelled)));
    assert!(started.elapsed() < Duration::from_millis(350));
}

#[tokio::test]
async fn test_commit_page_size_is_forwarded() {
    let mut source = scenario();
    source.commits = (0..40)
        .map(|i| CommitRecord::new("dev", &format!("2024-02-{:02}T00:00:00Z", i % 28 + 1)))
        .collect();

    let report = Analyzer::new(source)
        .with_commits_per_page(30)
        .analyze(&repo(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.commits.total_commits, 30);
}
