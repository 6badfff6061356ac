//! Tests for `GitHubClient` against a mock API server.

use mockito::{Matcher, Server, ServerGuard};

use skilltrace::{
    GitHubClient, GitHubError, GitHubSource, PagedFetcher, RateState, RepoId, RunContext,
};

fn client(server: &ServerGuard) -> GitHubClient {
    GitHubClient::builder()
        .personal_token("ghp_test")
        .base_uri(server.url())
        .build()
        .unwrap()
}

fn page(n: &str) -> Matcher {
    Matcher::UrlEncoded("page".into(), n.into())
}

#[tokio::test]
async fn test_rate_headers_read_into_fetched() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/octo/web/languages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("x-ratelimit-remaining", "4321")
        .with_header("x-ratelimit-reset", "1700000000")
        .with_body(r#"{"Rust": 1200, "Shell": 30}"#)
        .create_async()
        .await;

    let fetched = client(&server)
        .languages(&RepoId::new("octo/web"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(fetched.data.get("Rust"), Some(&1200));
    assert_eq!(fetched.rate, Some(RateState::new(4321, 1_700_000_000)));
}

#[tokio::test]
async fn test_missing_rate_headers_leave_rate_empty() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/octo/web/languages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let fetched = client(&server)
        .languages(&RepoId::new("octo/web"))
        .await
        .unwrap();

    assert!(fetched.data.is_empty());
    assert_eq!(fetched.rate, None);
}

#[tokio::test]
async fn test_empty_repository_classified() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/octo/blank/commits")
        .match_query(Matcher::UrlEncoded("author".into(), "octo".into()))
        .with_status(409)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Git Repository is empty.","documentation_url":"https://docs.github.com"}"#)
        .create_async()
        .await;

    let err = client(&server)
        .commits_by_author(&RepoId::new("octo/blank"), "octo", 1, 100)
        .await
        .unwrap_err();

    assert!(err.is_empty_repository(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_result_window_classified() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/search/commits")
        .match_query(page("11"))
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Only the first 1000 search results are available"}"#)
        .create_async()
        .await;

    let err = client(&server)
        .search_commit_repositories("octo", 11, 100)
        .await
        .unwrap_err();

    assert!(err.is_result_window(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_not_found_classified() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/octo/gone/languages")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;

    let err = client(&server)
        .languages(&RepoId::new("octo/gone"))
        .await
        .unwrap_err();

    assert!(matches!(err, GitHubError::NotFound(ref m) if m == "Not Found"));
}

#[tokio::test]
async fn test_commit_search_maps_items_to_repositories() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search/commits")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "author:octo".into()),
            Matcher::UrlEncoded("per_page".into(), "50".into()),
            page("2"),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"total_count": 3, "items": [
                {"sha": "a", "repository": {"full_name": "octo/web"}},
                {"sha": "b", "repository": {"full_name": "acme/api"}},
                {"sha": "c", "repository": {"full_name": "octo/web"}}
            ]}"#,
        )
        .create_async()
        .await;

    let fetched = client(&server)
        .search_commit_repositories("octo", 2, 50)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        fetched.data,
        vec![
            RepoId::new("octo/web"),
            RepoId::new("acme/api"),
            RepoId::new("octo/web"),
        ]
    );
}

#[tokio::test]
async fn test_pull_request_search_maps_repository_urls() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/search/issues")
        .match_query(Matcher::UrlEncoded("q".into(), "author:octo type:pr".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"total_count": 2, "items": [
                {"number": 4, "repository_url": "https://api.github.com/repos/acme/api"},
                {"number": 5, "repository_url": "https://api.github.com/repos/octo/cli"}
            ]}"#,
        )
        .create_async()
        .await;

    let fetched = client(&server)
        .search_pull_request_repositories("octo", 1, 100)
        .await
        .unwrap();

    assert_eq!(fetched.data, vec![RepoId::new("acme/api"), RepoId::new("octo/cli")]);
}

#[tokio::test]
async fn test_plain_issues_kept_as_empty_slots() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/o/r/issues")
        .match_query(Matcher::UrlEncoded("creator".into(), "octo".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"html_url": "https://github.com/o/r/issues/1"},
                {"html_url": "https://github.com/o/r/pull/2", "pull_request": {"url": "x"}}
            ]"#,
        )
        .create_async()
        .await;

    let fetched = client(&server)
        .pull_requests_by_creator(&RepoId::new("o/r"), "octo", 1, 100)
        .await
        .unwrap();

    assert_eq!(
        fetched.data,
        vec![None, Some("https://github.com/o/r/pull/2".to_string())]
    );
}

#[tokio::test]
async fn test_issue_only_page_does_not_stop_paging() {
    let mut server = Server::new_async().await;
    let issues = server
        .mock("GET", "/repos/o/r/issues")
        .match_query(page("1"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"html_url": "https://github.com/o/r/issues/1"},
                {"html_url": "https://github.com/o/r/issues/2"}
            ]"#,
        )
        .create_async()
        .await;
    let pulls = server
        .mock("GET", "/repos/o/r/issues")
        .match_query(page("2"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"html_url": "https://github.com/o/r/pull/9", "pull_request": {}}]"#)
        .create_async()
        .await;
    let end = server
        .mock("GET", "/repos/o/r/issues")
        .match_query(page("3"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let client = client(&server);
    let repo = RepoId::new("o/r");
    let mut ctx = RunContext::default();
    let outcome = PagedFetcher::listing(2)
        .fetch_all(&client, &mut ctx, "o/r pull requests", |p| {
            client.pull_requests_by_creator(&repo, "octo", p, 2)
        })
        .await
        .unwrap();

    issues.assert_async().await;
    pulls.assert_async().await;
    end.assert_async().await;
    let found: Vec<String> = outcome.items.into_iter().flatten().collect();
    assert_eq!(found, vec!["https://github.com/o/r/pull/9"]);
    assert_eq!(outcome.pages, 2);
}

#[tokio::test]
async fn test_affiliated_repositories_and_commits() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/user/repos")
        .match_query(Matcher::UrlEncoded(
            "affiliation".into(),
            "owner,collaborator,organization_member".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"full_name": "octo/web", "private": false}]"#)
        .create_async()
        .await;
    server
        .mock("GET", "/repos/octo/web/commits/abc123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sha": "abc123", "files": [{"filename": "src/main.rs"}, {"filename": "Cargo.toml"}]}"#)
        .create_async()
        .await;

    let client = client(&server);
    let repos = client.list_repositories(1, 100).await.unwrap();
    let files = client
        .commit_files(&RepoId::new("octo/web"), "abc123")
        .await
        .unwrap();

    assert_eq!(repos.data, vec![RepoId::new("octo/web")]);
    assert_eq!(files.data, vec!["src/main.rs", "Cargo.toml"]);
}

#[tokio::test]
async fn test_file_contents_decoded() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/octo/web/contents/package.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "type": "file",
                "encoding": "base64",
                "size": 38,
                "name": "package.json",
                "path": "package.json",
                "content": "eyJkZXBlbmRlbmNpZXMiOnsiem9kIjoiMyIsInJlYWN0IjoiMTgifX0=",
                "sha": "3d21ec53a331a6f037a91c368710b99387d012c1",
                "url": "https://api.github.com/repos/octo/web/contents/package.json",
                "git_url": "https://api.github.com/repos/octo/web/git/blobs/3d21ec53a331a6f037a91c368710b99387d012c1",
                "html_url": "https://github.com/octo/web/blob/main/package.json",
                "download_url": "https://raw.githubusercontent.com/octo/web/main/package.json",
                "_links": {
                    "git": "https://api.github.com/repos/octo/web/git/blobs/3d21ec53a331a6f037a91c368710b99387d012c1",
                    "self": "https://api.github.com/repos/octo/web/contents/package.json",
                    "html": "https://github.com/octo/web/blob/main/package.json"
                }
            }"#,
        )
        .create_async()
        .await;

    let fetched = client(&server)
        .file_contents(&RepoId::new("octo/web"), "package.json")
        .await
        .unwrap();

    assert_eq!(fetched.data, r#"{"dependencies":{"zod":"3","react":"18"}}"#);
}
