//! Tests for pageview aggregation

use super::*;
use crate::http::ApiClientConfig;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client() -> ApiClient {
    ApiClient::with_config(ApiClientConfig::builder().no_rate_limit().build())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn view_item(article: &str, day: &str, views: u64) -> serde_json::Value {
    json!({
        "project": "en.wikipedia",
        "article": article,
        "granularity": "daily",
        "timestamp": format!("{day}00"),
        "access": "all-access",
        "agent": "user",
        "views": views
    })
}

#[test]
fn test_pageviews_url_encodes_title() {
    let url = pageviews_url(
        PAGEVIEWS_ENDPOINT,
        "en.wikipedia.org",
        "AC/DC",
        date(2020, 1, 1),
        date(2020, 1, 31),
    );
    assert_eq!(
        url,
        "https://wikimedia.org/api/rest_v1/metrics/pageviews/per-article/\
         en.wikipedia.org/all-access/user/AC%2FDC/daily/20200101/20200131"
    );
}

#[test]
fn test_pageviews_url_encodes_spaces_and_question_marks() {
    let url = pageviews_url(
        PAGEVIEWS_ENDPOINT,
        "en.wikipedia.org",
        "Who Framed Roger Rabbit?",
        date(2020, 1, 1),
        date(2020, 1, 2),
    );
    assert!(url.contains("/Who%20Framed%20Roger%20Rabbit%3F/"));
}

#[tokio::test]
async fn test_page_views_parses_daily_series() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/per-article/en.wikipedia.org/all-access/user/Ada%20Lovelace/daily/20200101/20200103",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                view_item("Ada_Lovelace", "20200101", 100),
                view_item("Ada_Lovelace", "20200102", 150),
                view_item("Ada_Lovelace", "20200103", 90)
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client();
    let series = page_views_at(
        &client,
        &mock_server.uri(),
        "en.wikipedia.org",
        "Ada Lovelace",
        date(2020, 1, 1),
        date(2020, 1, 3),
    )
    .await
    .unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series[&date(2020, 1, 2)], 150);
}

#[tokio::test]
async fn test_page_views_missing_items_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"type": "about:blank"})))
        .mount(&mock_server)
        .await;

    let client = test_client();
    let err = page_views_at(
        &client,
        &mock_server.uri(),
        "en.wikipedia.org",
        "Anything",
        date(2020, 1, 1),
        date(2020, 1, 2),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_with_redirects_sums_per_date_missing_as_zero() {
    let mock_server = MockServer::start().await;

    // Alias discovery over the action API
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "linkshere"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": [{
                "pageid": 1,
                "title": "United Kingdom",
                "linkshere": [{"pageid": 10, "title": "UK", "redirect": true}]
            }]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Primary series covers Jan 1-2, alias series covers Jan 2-3
    Mock::given(method("GET"))
        .and(path(
            "/per-article/en.wikipedia.org/all-access/user/United%20Kingdom/daily/20200101/20200103",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                view_item("United_Kingdom", "20200101", 100),
                view_item("United_Kingdom", "20200102", 200)
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(
            "/per-article/en.wikipedia.org/all-access/user/UK/daily/20200101/20200103",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                view_item("UK", "20200102", 5),
                view_item("UK", "20200103", 7)
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client();
    let api_endpoint = format!("{}/w/api.php", mock_server.uri());
    let series = page_views_with_redirects_at(
        &client,
        &mock_server.uri(),
        &api_endpoint,
        "en.wikipedia.org",
        "United Kingdom",
        date(2020, 1, 1),
        date(2020, 1, 3),
    )
    .await
    .unwrap();

    assert_eq!(series[&date(2020, 1, 1)], 100);
    assert_eq!(series[&date(2020, 1, 2)], 205);
    assert_eq!(series[&date(2020, 1, 3)], 7);
}

#[tokio::test]
async fn test_with_redirects_tolerates_unviewed_alias() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": [{
                "pageid": 1,
                "title": "Obscure topic",
                "linkshere": [{"pageid": 10, "title": "Never viewed alias", "redirect": true}]
            }]}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(
            "/per-article/en.wikipedia.org/all-access/user/Obscure%20topic/daily/20200101/20200102",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [view_item("Obscure_topic", "20200101", 3)]
        })))
        .mount(&mock_server)
        .await;

    // The REST service 404s for titles with no pageview rows at all
    Mock::given(method("GET"))
        .and(path(
            "/per-article/en.wikipedia.org/all-access/user/Never%20viewed%20alias/daily/20200101/20200102",
        ))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "type": "https://mediawiki.org/wiki/HyperSwitch/errors/not_found"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client();
    let api_endpoint = format!("{}/w/api.php", mock_server.uri());
    let series = page_views_with_redirects_at(
        &client,
        &mock_server.uri(),
        &api_endpoint,
        "en.wikipedia.org",
        "Obscure topic",
        date(2020, 1, 1),
        date(2020, 1, 2),
    )
    .await
    .unwrap();

    assert_eq!(series.len(), 1);
    assert_eq!(series[&date(2020, 1, 1)], 3);
}

#[tokio::test]
async fn test_with_redirects_primary_failure_propagates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let client = test_client();
    let api_endpoint = format!("{}/w/api.php", mock_server.uri());
    let err = page_views_with_redirects_at(
        &client,
        &mock_server.uri(),
        &api_endpoint,
        "en.wikipedia.org",
        "No such page",
        date(2020, 1, 1),
        date(2020, 1, 2),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
}
