//! Tests for the HTTP client module

use super::*;
use crate::auth::Authenticator;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::pagination::{PageResponse, Params};
use crate::types::JsonValue;
use serde_json::json;
use std::time::Duration;
use crate::types::TrafficOptions;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> PanClient {
    let config = ClientConfig {
        base_url: server.uri(),
        ..Default::default()
    };
    let auth = Authenticator::with_static_token(
        "test-token",
        config.endpoint("/api/v1/access_token").unwrap(),
    );
    PanClient::with_authenticator(config, auth).unwrap()
}

fn ok(data: JsonValue) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 0, "message": "ok", "data": data}))
}

#[test]
fn test_file_list_query_from_params() {
    let params: Params = serde_json::from_value(json!({
        "parent_file_id": 12,
        "limit": 250,
        "search_data": "report",
        "search_mode": null,
        "last_file_id": 99
    }))
    .unwrap();

    let query = FileListQuery::from_params(&params).unwrap();
    assert_eq!(query.parent_file_id, 12);
    assert_eq!(query.limit, 100);
    assert_eq!(query.search_data.as_deref(), Some("report"));
    assert!(query.search_mode.is_none());
    assert_eq!(query.last_file_id, Some(99));
}

#[test]
fn test_file_list_query_defaults() {
    let query = FileListQuery::from_params(&Params::new()).unwrap();
    assert_eq!(query, FileListQuery::default());
}

#[test]
fn test_file_list_query_rejects_bad_types() {
    let params: Params = serde_json::from_value(json!({"parent_file_id": "root"})).unwrap();
    let err = FileListQuery::from_params(&params).unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

#[tokio::test]
async fn test_file_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/list"))
        .and(header("Authorization", "test-token"))
        .and(header("Platform", "open_platform"))
        .and(query_param("parentFileID", "0"))
        .and(query_param("limit", "2"))
        .and(query_param_is_missing("lastFileID"))
        .respond_with(ok(json!({
            "fileList": [
                {"fileId": 1, "filename": "a.txt", "type": 0, "size": 10, "etag": "x"},
                {"fileId": 2, "filename": "pics", "type": 1, "size": 0, "etag": ""}
            ],
            "lastFileID": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let query = FileListQuery {
        limit: 2,
        ..Default::default()
    };
    let (files, cursor) = client.file_list(&query).await.unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].filename, "a.txt");
    assert!(files[1].is_folder());
    assert_eq!(cursor, Some(2));
}

#[tokio::test]
async fn test_file_list_page_sends_cursor_and_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/list"))
        .and(query_param("lastFileID", "40"))
        .and(query_param("searchData", "notes"))
        .respond_with(ok(json!({"fileList": [], "lastFileID": -1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let params: Params = serde_json::from_value(json!({
        "parent_file_id": 0,
        "limit": 100,
        "search_data": "notes",
        "last_file_id": 40
    }))
    .unwrap();

    let page = client.file_list_page(&params).await.unwrap();
    assert_eq!(page, Some(PageResponse::tuple(Vec::new(), Some(json!(-1)))));
}

#[tokio::test]
async fn test_share_list_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/share/list"))
        .and(query_param("limit", "10"))
        .and(query_param("lastShareId", "7"))
        .respond_with(ok(json!({
            "shareList": [{"shareId": 8, "shareName": "docs", "shareKey": "k"}],
            "lastShareId": -1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let params: Params =
        serde_json::from_value(json!({"limit": 10, "last_share_id": 7})).unwrap();

    let page: Option<PageResponse<JsonValue>> = client.share_list_page(&params).await.unwrap();
    let Some(PageResponse::Map(map)) = page else {
        panic!("Expected a map-shaped page");
    };
    assert_eq!(map["lastShareId"], json!(-1));
    assert_eq!(map["shareList"][0]["shareId"], json!(8));
}

#[tokio::test]
async fn test_share_list_omits_zero_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/share/list"))
        .and(query_param_is_missing("lastShareId"))
        .respond_with(ok(json!({"shareList": [], "lastShareId": -1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.share_list(100, Some(0)).await.unwrap();
}

#[tokio::test]
async fn test_api_error_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 401, "message": "token is expired"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.share_list(10, None).await.unwrap_err();
    assert!(matches!(err, Error::Api { code: 401, ref message } if message == "token is expired"));
}

#[tokio::test]
async fn test_http_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.file_list(&FileListQuery::default()).await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 502, .. }));
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.file_list(&FileListQuery::default()).await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ok(json!({})).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = ClientConfig {
        base_url: server.uri(),
        timeout_secs: 1,
        ..Default::default()
    };
    let auth = Authenticator::with_static_token(
        "test-token",
        config.endpoint("/api/v1/access_token").unwrap(),
    );
    let client = PanClient::with_authenticator(config, auth).unwrap();

    let err = client.share_list(10, None).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 1000 }));
}

// ============================================================================
// File management, direct links and shares
// ============================================================================

fn done() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 0, "message": "ok", "data": null}))
}

#[tokio::test]
async fn test_file_detail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/file/info"))
        .and(header("Authorization", "test-token"))
        .and(query_param("fileID", "14"))
        .respond_with(ok(json!({
            "fileID": 14,
            "filename": "report.pdf",
            "type": 0,
            "size": 2048,
            "etag": "e1",
            "parentFileID": 3,
            "createAt": "2025-02-01 10:00:00",
            "trashed": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = test_client(&server).file_detail(14).await.unwrap();
    assert_eq!(file.file_id, 14);
    assert_eq!(file.parent_file_id, Some(3));
    assert_eq!(file.create_at.as_deref(), Some("2025-02-01 10:00:00"));
}

#[tokio::test]
async fn test_move_files() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/file/move"))
        .and(header("Platform", "open_platform"))
        .and(body_json(json!({"fileIDs": [1, 2], "parentFileID": 9})))
        .respond_with(done())
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server).move_files(&[1, 2], 9).await.unwrap();
}

#[tokio::test]
async fn test_rename_file() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/file/rename"))
        .and(body_json(json!({"fileID": 5, "filename": "final.txt"})))
        .respond_with(done())
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server).rename_file(5, "  final.txt ").await.unwrap();
}

#[tokio::test]
async fn test_rename_rejects_blank_name_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(done())
        .expect(0)
        .mount(&server)
        .await;

    let err = test_client(&server).rename_file(5, "   ").await.unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "filename"));
}

#[tokio::test]
async fn test_trash_delete_recover() {
    let server = MockServer::start().await;

    for endpoint in ["/api/v1/file/trash", "/api/v1/file/delete", "/api/v1/file/recover"] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(body_json(json!({"fileIDs": [3, 4, 5]})))
            .respond_with(done())
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = test_client(&server);
    client.trash_files(&[3, 4, 5]).await.unwrap();
    client.delete_files(&[3, 4, 5]).await.unwrap();
    client.recover_files(&[3, 4, 5]).await.unwrap();
}

#[tokio::test]
async fn test_empty_id_list_rejected() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    let err = client.trash_files(&[]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "file_ids"));

    let err = client
        .update_shares(&[], TrafficOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "share_ids"));
}

#[tokio::test]
async fn test_file_operation_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/file/move"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 5113, "message": "target folder not found"})),
        )
        .mount(&server)
        .await;

    let err = test_client(&server).move_files(&[1], 404).await.unwrap_err();
    assert!(matches!(err, Error::Api { code: 5113, .. }));
}

#[tokio::test]
async fn test_direct_link_toggle_and_get() {
    let server = MockServer::start().await;

    for endpoint in ["/api/v1/direct-link/enable", "/api/v1/direct-link/disable"] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(body_json(json!({"fileID": 21})))
            .respond_with(done())
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/v1/direct-link/get"))
        .and(query_param("fileID", "21"))
        .respond_with(ok(json!({"url": "https://example.com/dl/21"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.enable_direct_link(21).await.unwrap();
    let link = client.direct_link(21).await.unwrap();
    assert_eq!(link.url, "https://example.com/dl/21");
    client.disable_direct_link(21).await.unwrap();
}

#[tokio::test]
async fn test_create_share() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/share/create"))
        .and(body_json(json!({
            "fileIDs": [8, 9],
            "shareName": "holiday",
            "shareExpire": 30,
            "sharePwd": "x1y2",
            "trafficSwitch": 2,
            "trafficLimitSwitch": 2,
            "trafficLimit": 1024
        })))
        .respond_with(ok(json!({"shareID": 501, "shareKey": "abc-def"})))
        .expect(1)
        .mount(&server)
        .await;

    let share = NewShare {
        name: "holiday".to_string(),
        expire_days: 30,
        password: Some("x1y2".to_string()),
        traffic: TrafficOptions {
            enabled: true,
            limit_bytes: Some(1024),
        },
    };
    let created = test_client(&server).create_share(&[8, 9], &share).await.unwrap();
    assert_eq!(created.share_id, 501);
    assert_eq!(created.share_key, "abc-def");
}

#[tokio::test]
async fn test_create_share_minimal_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/share/create"))
        .and(body_json(json!({
            "fileIDs": [8],
            "shareName": "docs",
            "shareExpire": 0,
            "trafficSwitch": 1
        })))
        .respond_with(ok(json!({"shareID": 502, "shareKey": "k"})))
        .expect(1)
        .mount(&server)
        .await;

    let share = NewShare {
        name: "docs".to_string(),
        password: Some(String::new()),
        ..Default::default()
    };
    test_client(&server).create_share(&[8], &share).await.unwrap();
}

#[tokio::test]
async fn test_create_share_rejects_unknown_expiry() {
    let server = MockServer::start().await;

    let share = NewShare {
        name: "docs".to_string(),
        expire_days: 14,
        ..Default::default()
    };
    let err = test_client(&server).create_share(&[8], &share).await.unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "share_expire"));
}

#[tokio::test]
async fn test_update_shares() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/share/update"))
        .and(body_json(json!({
            "shareIDs": [11, 12],
            "trafficSwitch": 2,
            "trafficLimitSwitch": 1
        })))
        .respond_with(done())
        .expect(1)
        .mount(&server)
        .await;

    let traffic = TrafficOptions {
        enabled: true,
        limit_bytes: None,
    };
    test_client(&server).update_shares(&[11, 12], traffic).await.unwrap();
}
