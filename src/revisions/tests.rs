//! Tests for revision history aggregation

use super::*;
use crate::http::ApiClientConfig;
use chrono::TimeZone;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client() -> ApiClient {
    ApiClient::with_config(ApiClientConfig::builder().no_rate_limit().build())
}

fn mock_endpoint(server: &MockServer) -> String {
    format!("{}/w/api.php", server.uri())
}

fn rev(revid: u64, timestamp: &str, size: i64) -> serde_json::Value {
    json!({
        "revid": revid,
        "parentid": revid - 1,
        "timestamp": timestamp,
        "user": "Editor",
        "userid": 7,
        "comment": "edit",
        "size": size,
        "sha1": "0000000000000000000000000000000000000000"
    })
}

fn history_body(title: &str, revisions: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "query": {"pages": [{"pageid": 1, "title": title, "revisions": revisions}]}
    })
}

#[tokio::test]
async fn test_page_revisions_merges_pages_and_resolves_title() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "revisions"))
        .and(query_param("rvdir", "newer"))
        .and(query_param("redirects", "1"))
        .and(query_param_is_missing("rvcontinue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "continue": {"rvcontinue": "tok-1", "continue": "||"},
            "query": {"pages": [{"pageid": 1, "title": "Arithmetic logic unit",
                "revisions": [
                    rev(100, "2020-01-01T00:00:00Z", 500),
                    rev(101, "2020-02-01T00:00:00Z", 650)
                ]}]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("rvcontinue", "tok-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(history_body(
                "Arithmetic logic unit",
                vec![rev(102, "2020-03-01T00:00:00Z", 600)],
            )),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client();
    let history = page_revisions(
        &client,
        &mock_endpoint(&mock_server),
        "ALU",
        RevisionOrder::OldestFirst,
    )
    .await
    .unwrap();

    // Canonical title from the response, not the input alias
    assert_eq!(history.title, "Arithmetic logic unit");
    let revids: Vec<u64> = history.revisions.iter().map(|r| r.revid).collect();
    assert_eq!(revids, vec![100, 101, 102]);
}

#[tokio::test]
async fn test_size_deltas_oldest_first() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history_body(
            "Page",
            vec![
                rev(1, "2020-01-01T00:00:00Z", 500),
                rev(2, "2020-02-01T00:00:00Z", 650),
                rev(3, "2020-03-01T00:00:00Z", 600),
            ],
        )))
        .mount(&mock_server)
        .await;

    let client = test_client();
    let history = page_revisions(
        &client,
        &mock_endpoint(&mock_server),
        "Page",
        RevisionOrder::OldestFirst,
    )
    .await
    .unwrap();

    let deltas: Vec<i64> = history.revisions.iter().map(|r| r.size_delta).collect();
    // First revision has no predecessor: delta is the full size
    assert_eq!(deltas, vec![500, 150, -50]);
}

#[tokio::test]
async fn test_size_deltas_newest_first() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("rvdir", "older"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history_body(
            "Page",
            vec![
                rev(3, "2020-03-01T00:00:00Z", 600),
                rev(2, "2020-02-01T00:00:00Z", 650),
                rev(1, "2020-01-01T00:00:00Z", 500),
            ],
        )))
        .mount(&mock_server)
        .await;

    let client = test_client();
    let history = page_revisions(
        &client,
        &mock_endpoint(&mock_server),
        "Page",
        RevisionOrder::NewestFirst,
    )
    .await
    .unwrap();

    let deltas: Vec<i64> = history.revisions.iter().map(|r| r.size_delta).collect();
    // Deltas are still against the chronologically previous revision
    assert_eq!(deltas, vec![-50, 150, 500]);
}

#[tokio::test]
async fn test_revision_deleted_fields_tolerated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": [{"pageid": 1, "title": "Page", "revisions": [
                {"revid": 9, "timestamp": "2021-06-01T12:00:00Z", "size": 100,
                 "userhidden": true, "commenthidden": true}
            ]}]}
        })))
        .mount(&mock_server)
        .await;

    let client = test_client();
    let history = page_revisions(
        &client,
        &mock_endpoint(&mock_server),
        "Page",
        RevisionOrder::OldestFirst,
    )
    .await
    .unwrap();

    let record = &history.revisions[0];
    assert_eq!(record.user, None);
    assert_eq!(record.comment, None);
    assert_eq!(record.parentid, 0);
}

#[tokio::test]
async fn test_missing_page_yields_empty_history() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": [{"title": "No such page", "missing": true}]}
        })))
        .mount(&mock_server)
        .await;

    let client = test_client();
    let history = page_revisions(
        &client,
        &mock_endpoint(&mock_server),
        "No such page",
        RevisionOrder::OldestFirst,
    )
    .await
    .unwrap();

    assert_eq!(history.title, "No such page");
    assert!(history.revisions.is_empty());
}

#[tokio::test]
async fn test_between_sends_window_and_filters() {
    let mock_server = MockServer::start().await;

    // Server is asked for the window but sloppily includes one record past it
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("rvstart", "2020-01-01T00:00:00Z"))
        .and(query_param("rvend", "2020-12-31T23:59:59Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history_body(
            "Page",
            vec![
                rev(1, "2020-03-01T00:00:00Z", 100),
                rev(2, "2020-06-01T00:00:00Z", 200),
            ],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client();
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let stop = Utc.with_ymd_and_hms(2020, 12, 31, 23, 59, 59).unwrap();
    let history = page_revisions_between(
        &client,
        &mock_endpoint(&mock_server),
        "Page",
        start,
        stop,
        RevisionOrder::OldestFirst,
    )
    .await
    .unwrap();

    assert_eq!(history.revisions.len(), 2);
}

#[tokio::test]
async fn test_between_newest_first_swaps_window_ends() {
    let mock_server = MockServer::start().await;

    // Descending enumeration begins at the window's upper bound
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("rvdir", "older"))
        .and(query_param("rvstart", "2020-12-31T23:59:59Z"))
        .and(query_param("rvend", "2020-01-01T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history_body(
            "Page",
            vec![rev(2, "2020-06-01T00:00:00Z", 200)],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client();
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let stop = Utc.with_ymd_and_hms(2020, 12, 31, 23, 59, 59).unwrap();
    let history = page_revisions_between(
        &client,
        &mock_endpoint(&mock_server),
        "Page",
        start,
        stop,
        RevisionOrder::NewestFirst,
    )
    .await
    .unwrap();

    assert_eq!(history.revisions.len(), 1);
}

#[tokio::test]
async fn test_between_stops_requesting_past_window() {
    let mock_server = MockServer::start().await;

    // First page ends with an out-of-window record; the continuation page
    // must never be requested
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param_is_missing("rvcontinue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "continue": {"rvcontinue": "tok-1", "continue": "||"},
            "query": {"pages": [{"pageid": 1, "title": "Page", "revisions": [
                rev(1, "2020-03-01T00:00:00Z", 100),
                rev(2, "2021-01-15T00:00:00Z", 200)
            ]}]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("rvcontinue", "tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history_body(
            "Page",
            vec![rev(3, "2021-02-01T00:00:00Z", 300)],
        )))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client();
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let stop = Utc.with_ymd_and_hms(2020, 12, 31, 23, 59, 59).unwrap();
    let history = page_revisions_between(
        &client,
        &mock_endpoint(&mock_server),
        "Page",
        start,
        stop,
        RevisionOrder::OldestFirst,
    )
    .await
    .unwrap();

    let revids: Vec<u64> = history.revisions.iter().map(|r| r.revid).collect();
    assert_eq!(revids, vec![1]);
}

#[test]
fn test_attach_size_deltas_empty_and_single() {
    let mut empty: Vec<RevisionRecord> = Vec::new();
    attach_size_deltas(&mut empty, RevisionOrder::OldestFirst);
    assert!(empty.is_empty());

    let mut single = vec![RevisionRecord {
        revid: 1,
        parentid: 0,
        timestamp: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        user: None,
        userid: 0,
        comment: None,
        size: 42,
        sha1: None,
        minor: false,
        anon: false,
        size_delta: 0,
    }];
    attach_size_deltas(&mut single, RevisionOrder::NewestFirst);
    assert_eq!(single[0].size_delta, 42);
}
