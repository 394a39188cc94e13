//! Integration tests for `InstagramClient`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made.

use std::fs;
use std::time::SystemTime;

use chrono::{TimeZone, Utc};
use futures::TryStreamExt;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use instagram_archiver::api::{InstagramClient, ProfileFetcher};
use instagram_archiver::Error;

fn test_client(server: &MockServer) -> InstagramClient {
    InstagramClient::with_base_url("instagram-archiver-test/0.1", &server.uri())
        .expect("failed to build test client")
        .with_page_delay(0..0)
}

fn media_node(shortcode: &str, typename: &str, timestamp: i64) -> serde_json::Value {
    json!({
        "node": {
            "__typename": typename,
            "shortcode": shortcode,
            "display_url": format!("https://cdn.example.com/{}.jpg", shortcode),
            "taken_at_timestamp": timestamp,
            "edge_media_to_caption": { "edges": [{ "node": { "text": format!("caption {}", shortcode) } }] },
            "edge_liked_by": { "count": 3 }
        }
    })
}

fn profile_json(edges: Vec<serde_json::Value>, end_cursor: Option<&str>) -> serde_json::Value {
    json!({
        "data": {
            "user": {
                "id": "42",
                "username": "alice",
                "full_name": "Alice Example",
                "biography": "hi",
                "edge_followed_by": { "count": 100 },
                "edge_follow": { "count": 5 },
                "edge_owner_to_timeline_media": {
                    "count": 3,
                    "page_info": { "has_next_page": end_cursor.is_some(), "end_cursor": end_cursor },
                    "edges": edges
                }
            }
        },
        "status": "ok"
    })
}

#[tokio::test]
async fn profile_returns_metadata_and_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .and(query_param("username", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(
            vec![media_node("A1", "GraphImage", 1_700_000_000)],
            None,
        )))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let profile = client.profile("alice").await.expect("profile should load");

    assert_eq!(profile.id, "42");
    assert_eq!(profile.info.username, "alice");
    assert_eq!(profile.info.followers, Some(100));
    assert_eq!(profile.info.mediacount, Some(3));

    let page = profile.first_page.expect("first page missing");
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].caption.as_deref(), Some("caption A1"));
    assert_eq!(page.entries[0].likes, 3);
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn profile_404_maps_to_profile_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let result = test_client(&server).profile("ghost").await;
    assert!(
        matches!(result, Err(Error::ProfileNotFound(ref name)) if name == "ghost"),
        "expected ProfileNotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn unauthorized_maps_to_login_required() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = test_client(&server).profile("alice").await;
    assert!(
        matches!(result, Err(Error::LoginRequired(_))),
        "expected LoginRequired, got: {result:?}"
    );
}

#[tokio::test]
async fn login_envelope_maps_to_login_required() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Please wait a few minutes before you try again. login",
            "require_login": true,
            "status": "fail"
        })))
        .mount(&server)
        .await;

    let result = test_client(&server).profile("alice").await;
    assert!(matches!(result, Err(Error::LoginRequired(_))));
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = test_client(&server).profile("alice").await;
    assert!(matches!(result, Err(Error::RateLimited)));
}

#[tokio::test]
async fn posts_stream_follows_next_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(
            vec![
                media_node("A1", "GraphImage", 1_700_000_300),
                media_node("A2", "GraphVideo", 1_700_000_200),
            ],
            Some("cursor-1"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/graphql/query/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "user": {
                    "edge_owner_to_timeline_media": {
                        "count": 3,
                        "page_info": { "has_next_page": false, "end_cursor": null },
                        "edges": [media_node("A3", "GraphImage", 1_700_000_100)]
                    }
                }
            },
            "status": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let profile = client.profile("alice").await.expect("profile should load");
    let posts: Vec<_> = client
        .posts(&profile)
        .try_collect()
        .await
        .expect("posts should stream");

    let shortcodes: Vec<&str> = posts.iter().map(|p| p.shortcode.as_str()).collect();
    assert_eq!(shortcodes, vec!["A1", "A2", "A3"]);
    assert_eq!(posts[1].typename, "GraphVideo");
    assert_eq!(
        posts[2].date_utc,
        Utc.timestamp_opt(1_700_000_100, 0).unwrap()
    );
}

#[tokio::test]
async fn posts_stream_surfaces_page_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(
            vec![media_node("A1", "GraphImage", 1_700_000_300)],
            Some("cursor-1"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/graphql/query/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let profile = client.profile("alice").await.expect("profile should load");
    let results: Vec<_> = futures::StreamExt::collect(client.posts(&profile)).await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(Error::Api(_))));
}

#[tokio::test]
async fn download_pic_writes_file_with_extension_and_mtime() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/media/raw"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"\x89PNG fake".to_vec()),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mtime = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
    let target = dir.path().join("2023-11-14_22-13-20_UTC");

    let written = test_client(&server)
        .download_pic(&format!("{}/media/raw", server.uri()), &target, mtime)
        .await
        .expect("download should succeed");

    assert_eq!(written, dir.path().join("2023-11-14_22-13-20_UTC.png"));
    assert_eq!(fs::read(&written).unwrap(), b"\x89PNG fake");

    let modified = fs::metadata(&written).unwrap().modified().unwrap();
    assert_eq!(modified, SystemTime::from(mtime));

    // Nothing but the final file is left behind
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn download_pic_failure_is_a_download_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/media/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let result = test_client(&server)
        .download_pic(
            &format!("{}/media/missing.jpg", server.uri()),
            &dir.path().join("stem"),
            Utc::now(),
        )
        .await;

    assert!(matches!(result, Err(Error::Download(_))));
}
