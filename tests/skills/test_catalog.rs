//! Tests for the paged skill catalog client.

use mockito::Matcher;

use skilltrace::{CatalogError, Skill, SkillCatalogClient};

fn page(n: &str) -> Matcher {
    Matcher::UrlEncoded("page".into(), n.into())
}

#[tokio::test]
async fn test_follows_next_page_header() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", "/skills")
        .match_query(page("1"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("X-Next-Page", "2")
        .with_body(r#"[{"id": 1, "name": "Rust"}, {"id": "2", "name": "Go"}]"#)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/skills")
        .match_query(page("2"))
        .with_status(200)
        .with_body(r#"[{"id": "42", "name": "Node.js"}]"#)
        .create_async()
        .await;

    let client = SkillCatalogClient::new(format!("{}/skills", server.url()), None).unwrap();
    let skills = client.fetch_all().await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(
        skills,
        vec![
            Skill::new("1", "Rust"),
            Skill::new("2", "Go"),
            Skill::new("42", "Node.js"),
        ]
    );
}

#[tokio::test]
async fn test_empty_header_ends_paging() {
    let mut server = mockito::Server::new_async().await;
    let only = server
        .mock("GET", "/skills")
        .match_query(page("1"))
        .with_status(200)
        .with_header("X-Next-Page", "")
        .with_body(r#"[{"id": "7", "name": "Kotlin"}]"#)
        .expect(1)
        .create_async()
        .await;

    let client = SkillCatalogClient::new(format!("{}/skills", server.url()), None).unwrap();
    let skills = client.fetch_all().await.unwrap();

    only.assert_async().await;
    assert_eq!(skills.len(), 1);
}

#[tokio::test]
async fn test_cyclic_next_page_stops() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", "/skills")
        .match_query(page("1"))
        .with_status(200)
        .with_header("X-Next-Page", "2")
        .with_body(r#"[{"id": "1", "name": "Rust"}]"#)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/skills")
        .match_query(page("2"))
        .with_status(200)
        .with_header("X-Next-Page", "1")
        .with_body(r#"[{"id": "2", "name": "Go"}]"#)
        .expect(1)
        .create_async()
        .await;

    let client = SkillCatalogClient::new(format!("{}/skills", server.url()), None).unwrap();
    let skills = client.fetch_all().await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(skills, vec![Skill::new("1", "Rust"), Skill::new("2", "Go")]);
}

#[tokio::test]
async fn test_sends_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/skills")
        .match_query(page("1"))
        .match_header("authorization", "Bearer catalog-secret")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = SkillCatalogClient::new(
        format!("{}/skills", server.url()),
        Some("catalog-secret".to_string()),
    )
    .unwrap();
    let skills = client.fetch_all().await.unwrap();

    mock.assert_async().await;
    assert!(skills.is_empty());
}

#[tokio::test]
async fn test_error_status_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/skills")
        .match_query(page("1"))
        .with_status(503)
        .create_async()
        .await;

    let client = SkillCatalogClient::new(format!("{}/skills", server.url()), None).unwrap();
    let result = client.fetch_all().await;

    assert!(matches!(result, Err(CatalogError::Status { status: 503, .. })));
}

#[tokio::test]
async fn test_malformed_page_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/skills")
        .match_query(page("1"))
        .with_status(200)
        .with_body(r#"{"skills": []}"#)
        .create_async()
        .await;

    let client = SkillCatalogClient::new(format!("{}/skills", server.url()), None).unwrap();
    let result = client.fetch_all().await;

    assert!(matches!(result, Err(CatalogError::Decode { .. })));
}
