//! Tests for paged retrieval and its stop conditions.

use skilltrace::{
    Fetched, GitHubError, GitHubResult, GitHubSource, PagedFetcher, RateState, RepoId, RunContext,
    StopReason,
};

use super::support::{FakeSource, repos};

#[tokio::test]
async fn test_listing_stops_on_empty_page() {
    let mut source = FakeSource::new("octo");
    source.owned = repos("octo", 250);
    let mut ctx = RunContext::default();

    let fetcher = PagedFetcher::listing(100);
    let outcome = fetcher
        .fetch_all(&source, &mut ctx, "listing", |page| {
            source.list_repositories(page, 100)
        })
        .await
        .unwrap();

    assert_eq!(outcome.items.len(), 250);
    assert_eq!(outcome.items[0], RepoId::new("octo/r0"));
    assert_eq!(outcome.items[249], RepoId::new("octo/r249"));
    assert_eq!(outcome.stop, StopReason::Exhausted);
    assert!(!outcome.partial);
    assert_eq!(outcome.pages, 3);
    // Pages 1..=3 plus the empty page 4
    assert_eq!(source.count_calls("list_repositories"), 4);
    assert_eq!(source.count_calls("search_rate"), 0);
    assert_eq!(ctx.stats.core_calls, 4);
}

#[tokio::test]
async fn test_search_stops_before_crossing_hard_cap() {
    let mut source = FakeSource::new("octo");
    source.commit_hits = repos("hit", 1500);
    let mut ctx = RunContext::default();

    let fetcher = PagedFetcher::search(100, 1000);
    let outcome = fetcher
        .fetch_all(&source, &mut ctx, "commit search", |page| {
            source.search_commit_repositories("octo", page, 100)
        })
        .await
        .unwrap();

    assert_eq!(outcome.items.len(), 1000);
    assert_eq!(outcome.stop, StopReason::HardCap);
    assert!(outcome.partial);
    assert!(source.calls().contains(&"search_commits:octo:10".to_string()));
    assert!(!source.calls().contains(&"search_commits:octo:11".to_string()));
}

#[tokio::test]
async fn test_search_probes_quota_before_every_page() {
    let mut source = FakeSource::new("octo");
    source.pr_hits = repos("pr", 150);
    let mut ctx = RunContext::default();

    let fetcher = PagedFetcher::search(100, 1000);
    fetcher
        .fetch_all(&source, &mut ctx, "pr search", |page| {
            source.search_pull_request_repositories("octo", page, 100)
        })
        .await
        .unwrap();

    let calls = source.calls();
    assert_eq!(
        calls,
        vec![
            "search_rate",
            "search_pulls:octo:1",
            "search_rate",
            "search_pulls:octo:2",
            "search_rate",
            "search_pulls:octo:3",
        ]
    );
    assert_eq!(ctx.stats.search_calls, 3);
    assert_eq!(ctx.stats.rate_probes, 3);
    assert_eq!(ctx.stats.core_calls, 0);
}

#[tokio::test]
async fn test_result_window_error_ends_with_partial_results() {
    let mut source = FakeSource::new("octo");
    source.commit_hits = repos("hit", 500);
    source.result_window_from = Some(3);
    let mut ctx = RunContext::default();

    let outcome = PagedFetcher::search(100, 1000)
        .fetch_all(&source, &mut ctx, "commit search", |page| {
            source.search_commit_repositories("octo", page, 100)
        })
        .await
        .unwrap();

    assert_eq!(outcome.items.len(), 200);
    assert_eq!(outcome.stop, StopReason::ResultWindow);
    assert!(outcome.partial);
}

#[tokio::test]
async fn test_other_errors_propagate() {
    let mut source = FakeSource::new("octo");
    source.fail_listing = true;
    let mut ctx = RunContext::default();

    let result = PagedFetcher::listing(100)
        .fetch_all(&source, &mut ctx, "listing", |page| {
            source.list_repositories(page, 100)
        })
        .await;

    assert!(matches!(result, Err(GitHubError::Api { status: 500, .. })));
}

#[tokio::test]
async fn test_page_numbers_start_at_one_and_increase() {
    let source = FakeSource::new("octo");
    let mut ctx = RunContext::default();
    let mut seen = Vec::new();

    let outcome = PagedFetcher::listing(2)
        .fetch_all(&source, &mut ctx, "numbers", |page| {
            seen.push(page);
            let data: Vec<u32> = if page <= 3 { vec![page, page] } else { Vec::new() };
            async move { GitHubResult::Ok(Fetched::new(data, Some(RateState::new(4000, 0)))) }
        })
        .await
        .unwrap();

    assert_eq!(seen, vec![1, 2, 3, 4]);
    assert_eq!(outcome.items, vec![1, 1, 2, 2, 3, 3]);
    assert_eq!(ctx.core.last(), Some(RateState::new(4000, 0)));
}

#[test]
fn test_exceeds_cap() {
    let fetcher = PagedFetcher::search(100, 1000);
    assert!(!fetcher.exceeds_cap(10));
    assert!(fetcher.exceeds_cap(11));
    assert!(!PagedFetcher::listing(100).exceeds_cap(1_000));
}
