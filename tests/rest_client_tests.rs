//! Integration tests for the REST client.
//!
//! These tests drive a small alarm endpoint, written the way endpoint code
//! uses this crate, against a mock server: sanitized create, filtered list
//! with paging statistics, and delete.

use iot_platform_api::rest::{sanitize, ArrayStyle, FieldPath, RestError};
use iot_platform_api::{
    ApiResponse, BaseUrl, HttpClient, HttpError, MediaType, PlatformConfig, RestClient,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Alarm {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    creation_time: Option<String>,
    #[serde(rename = "type")]
    alarm_type: String,
    severity: String,
    text: String,
}

/// Fields the platform assigns and rejects on create.
const ALARM_CREATE_RULES: &[FieldPath] = &[
    FieldPath::new(&["id"]),
    FieldPath::new(&["self"]),
    FieldPath::new(&["creationTime"]),
];

/// Endpoint code for alarms, built on the shared client.
struct AlarmApi<'a> {
    client: &'a RestClient<HttpClient>,
}

impl AlarmApi<'_> {
    async fn create(&self, alarm: &Alarm) -> Result<ApiResponse<Alarm>, RestError> {
        let body = sanitize(alarm, ALARM_CREATE_RULES)?;
        let request = self
            .client
            .target()
            .path("alarm")
            .path("alarms")
            .request()
            .content_type(MediaType::vendor("alarm"))
            .accept(MediaType::vendor("alarm"))
            .post(body);
        self.client.execute(request).await
    }

    async fn list(
        &self,
        source: Option<&str>,
        severities: &[&str],
        page_size: Option<u32>,
    ) -> Result<ApiResponse<Vec<Alarm>>, RestError> {
        let request = self
            .client
            .target()
            .path("alarm/alarms")
            .query_param("source", source)
            .query_params("severity", severities, ArrayStyle::Exploded)
            .query_param("pageSize", page_size)
            .request()
            .accept(MediaType::vendor("alarmcollection"))
            .get();
        self.client.execute_collection(request, "alarms").await
    }

    async fn delete(&self, id: &str) -> Result<ApiResponse<()>, RestError> {
        let request = self
            .client
            .target()
            .path("alarm/alarms")
            .path(id)
            .request()
            .delete();
        self.client.execute_empty(request).await
    }
}

fn create_client(server: &MockServer) -> RestClient {
    let config = PlatformConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    RestClient::new(&config).unwrap()
}

fn sample_alarm() -> Alarm {
    Alarm {
        id: Some("should-not-be-sent".to_string()),
        self_link: Some("https://tenant.example.com/alarm/alarms/1".to_string()),
        creation_time: Some("2024-05-01T10:00:00.000Z".to_string()),
        alarm_type: "c8y_Overheat".to_string(),
        severity: "MAJOR".to_string(),
        text: "Boiler temperature too high".to_string(),
    }
}

// ============================================================================
// RestClient Construction Tests
// ============================================================================

#[test]
fn test_rest_client_is_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
}

#[test]
fn test_rest_client_starts_at_root() {
    let config = PlatformConfig::builder()
        .base_url(BaseUrl::new("https://tenant.example.com").unwrap())
        .build()
        .unwrap();
    let client = RestClient::new(&config).unwrap();

    assert!(client.target().segments().is_empty());
    assert_eq!(
        client.transport().base_url().as_ref(),
        "https://tenant.example.com"
    );
}

// ============================================================================
// Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_create_sends_sanitized_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/alarm/alarms"))
        .and(header("Content-Type", "application/vnd.com.nsn.cumulocity.alarm+json"))
        .and(body_json(json!({
            "type": "c8y_Overheat",
            "severity": "MAJOR",
            "text": "Boiler temperature too high"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Location", format!("{}/alarm/alarms/901", server.uri()).as_str())
                .insert_header("X-Request-Id", "req-901")
                .set_body_json(json!({
                    "id": "901",
                    "self": format!("{}/alarm/alarms/901", server.uri()),
                    "creationTime": "2024-05-02T08:00:00.000Z",
                    "type": "c8y_Overheat",
                    "severity": "MAJOR",
                    "text": "Boiler temperature too high"
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let api = AlarmApi { client: &client };
    let alarm = sample_alarm();

    let created = api.create(&alarm).await.unwrap();

    assert_eq!(created.code(), 201);
    assert_eq!(created.id.as_deref(), Some("901"));
    assert_eq!(created.request_id(), Some("req-901"));
    assert!(created.location().unwrap().ends_with("/alarm/alarms/901"));
    // The caller's value is untouched by sanitization
    assert_eq!(alarm.id.as_deref(), Some("should-not-be-sent"));
}

#[tokio::test]
async fn test_list_omits_unset_filters_and_reads_statistics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alarm/alarms"))
        .and(query_param("source", "10200"))
        .and(query_param("severity", "MAJOR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "alarms": [
                {"id": "1", "type": "c8y_Overheat", "severity": "MAJOR", "text": "a"},
                {"id": "2", "type": "c8y_Overheat", "severity": "CRITICAL", "text": "b"}
            ],
            "statistics": {"currentPage": 1, "pageSize": 2, "totalPages": 4},
            "next": format!("{}/alarm/alarms?source=10200&currentPage=2", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let api = AlarmApi { client: &client };

    let page = api
        .list(Some("10200"), &["MAJOR", "CRITICAL"], None)
        .await
        .unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page[1].severity, "CRITICAL");
    let statistics = page.statistics().unwrap();
    assert_eq!(statistics.current_page, Some(1));
    assert!(statistics.has_more_pages());
    assert!(page.next_page().unwrap().contains("currentPage=2"));

    let received = server.received_requests().await.unwrap();
    let names: Vec<String> = received[0]
        .url
        .query_pairs()
        .map(|(name, _)| name.into_owned())
        .collect();
    assert_eq!(names, vec!["source", "severity", "severity"]);
}

#[tokio::test]
async fn test_list_without_collection_field_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let api = AlarmApi { client: &client };

    let error = api.list(None, &[], Some(5)).await.unwrap_err();

    assert!(matches!(error, RestError::MissingField { ref field } if field == "alarms"));
}

#[tokio::test]
async fn test_mismatched_body_reports_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 5})))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let api = AlarmApi { client: &client };

    let error = api.create(&sample_alarm()).await.unwrap_err();

    assert!(matches!(error, RestError::Decode { code: 201, .. }));
    assert_eq!(error.status(), Some(201));
}

#[tokio::test]
async fn test_delete_returns_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/alarm/alarms/901"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let api = AlarmApi { client: &client };

    let response = api.delete("901").await.unwrap();

    assert_eq!(response.code(), 204);
}

#[tokio::test]
async fn test_delete_missing_alarm_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "alarm/Not Found",
            "message": "No alarm for gid '3'!"
        })))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let api = AlarmApi { client: &client };

    let error = api.delete("3").await.unwrap_err();

    assert!(error.is_not_found());
    match error {
        RestError::Http(HttpError::Response(e)) => {
            assert_eq!(e.error_reference.as_deref(), Some("alarm/Not Found"));
        }
        other => panic!("Expected HTTP response error, got {other:?}"),
    }
}
