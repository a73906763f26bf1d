//! Integration tests using wiremock to simulate the compute services.

use coreservices::compute::{
    AttachVolumeRequest, ComputeClient, GetConsoleHistoryContentRequest, GetInstanceRequest,
    GetVolumeAttachmentRequest, ListVolumeAttachmentsRequest,
};
use coreservices::compute_management::{ComputeManagementClient, StopInstancePoolRequest};
use coreservices::models::{AttachIScsiVolumeDetails, AttachVolumeBase, VolumeAttachment};
use coreservices::{
    Backoff, CancellationToken, Error, RequestMetadata, RequestSigner, RetryPolicy,
    StaticConfigurationProvider,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Routes the client's logs to the test output; `RUST_LOG=coreservices=debug` shows them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn config() -> StaticConfigurationProvider {
    StaticConfigurationProvider::builder()
        .region("us-phoenix-1")
        .tenancy_id("tenancy")
        .user_id("user")
        .key_fingerprint("aa:bb")
        .build()
        .unwrap()
}

fn compute_client(server: &MockServer) -> ComputeClient {
    let mut client = ComputeClient::new(config()).unwrap();
    client.set_host(&server.uri()).unwrap();
    client
}

fn attachment_json(kind: &str, id: &str) -> serde_json::Value {
    json!({
        "attachmentType": kind,
        "id": id,
        "availabilityDomain": "AD-1",
        "compartmentId": "C",
        "instanceId": "I",
        "volumeId": "V",
        "lifecycleState": "ATTACHED",
        "timeCreated": "2024-01-01T00:00:00Z"
    })
}

fn retry_token_of(request: &wiremock::Request) -> String {
    request
        .headers
        .get("opc-retry-token")
        .expect("retry token header")
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_attach_iscsi_volume() {
    init_tracing();
    let mock_server = MockServer::start().await;

    let mut body = attachment_json("iscsi", "A1");
    body["iqn"] = json!("iqn.2015-12.com.example:abc");
    body["port"] = json!(3260);

    Mock::given(method("POST"))
        .and(path("/20160918/volumeAttachments/"))
        .and(header_exists("opc-retry-token"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&body)
                .insert_header("etag", "etag-1")
                .insert_header("opc-request-id", "req-1"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = compute_client(&mock_server);
    let request = AttachVolumeRequest {
        attach_volume_details: Some(
            AttachIScsiVolumeDetails {
                base: AttachVolumeBase {
                    instance_id: "I".to_string(),
                    volume_id: "V".to_string(),
                    ..Default::default()
                },
                use_chap: Some(true),
            }
            .into(),
        ),
        ..Default::default()
    };

    let response = client.attach_volume(&CancellationToken::new(), request).await.unwrap();

    assert_eq!(response.etag.as_deref(), Some("etag-1"));
    assert_eq!(response.opc_request_id.as_deref(), Some("req-1"));
    match response.volume_attachment {
        Some(VolumeAttachment::IScsi(attachment)) => {
            assert_eq!(attachment.base.id, "A1");
            assert_eq!(attachment.port, Some(3260));
            assert_eq!(attachment.iqn.as_deref(), Some("iqn.2015-12.com.example:abc"));
        }
        other => panic!("Expected iSCSI attachment, got {:?}", other),
    }

    let received = mock_server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(
        sent,
        json!({"type": "iscsi", "instanceId": "I", "volumeId": "V", "useChap": true})
    );
    assert_eq!(retry_token_of(&received[0]).len(), 30);
}

#[tokio::test]
async fn test_list_resolves_each_attachment() {
    init_tracing();
    let mock_server = MockServer::start().await;

    let mut unknown = attachment_json("fibreChannel", "A3");
    unknown["wwn"] = json!("50:06:01:60");

    Mock::given(method("GET"))
        .and(path("/20160918/volumeAttachments/"))
        .and(query_param("compartmentId", "C"))
        .and(query_param("instanceId", "I"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([
                    attachment_json("iscsi", "A1"),
                    attachment_json("paravirtualized", "A2"),
                    unknown,
                ]))
                .insert_header("opc-next-page", "page-2"),
        )
        .mount(&mock_server)
        .await;

    let client = compute_client(&mock_server);
    let request = ListVolumeAttachmentsRequest {
        compartment_id: "C".to_string(),
        instance_id: Some("I".to_string()),
        ..Default::default()
    };

    let response = client
        .list_volume_attachments(&CancellationToken::new(), request)
        .await
        .unwrap();

    assert_eq!(response.opc_next_page.as_deref(), Some("page-2"));
    let items = response.items.unwrap();
    assert_eq!(items.len(), 3);
    assert!(matches!(items[0], VolumeAttachment::IScsi(_)));
    assert!(matches!(items[1], VolumeAttachment::Paravirtualized(_)));
    assert!(items[2].is_unknown());
    assert_eq!(items[1].base().unwrap().id, "A2");
}

#[tokio::test]
async fn test_retry_on_503_keeps_retry_token() {
    init_tracing();
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();
    let body = attachment_json("paravirtualized", "A1");

    // First two requests fail with 503, third succeeds
    Mock::given(method("POST"))
        .and(path("/20160918/volumeAttachments/"))
        .respond_with(move |_req: &wiremock::Request| {
            let count = attempt_count_clone.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                ResponseTemplate::new(503)
                    .set_body_json(json!({"code": "ServiceUnavailable", "message": "busy"}))
            } else {
                ResponseTemplate::new(200).set_body_json(&body)
            }
        })
        .mount(&mock_server)
        .await;

    let sleeps = Arc::new(AtomicUsize::new(0));
    let sleeps_clone = sleeps.clone();
    let policy = RetryPolicy::builder()
        .max_attempts(5)
        .backoff(Backoff::custom(move |_attempt| {
            sleeps_clone.fetch_add(1, Ordering::SeqCst);
            Duration::from_millis(10)
        }))
        .build();

    let client = compute_client(&mock_server);
    let request = AttachVolumeRequest {
        attach_volume_details: Some(
            AttachIScsiVolumeDetails {
                base: AttachVolumeBase {
                    instance_id: "I".to_string(),
                    volume_id: "V".to_string(),
                    ..Default::default()
                },
                use_chap: None,
            }
            .into(),
        ),
        metadata: RequestMetadata::default().with_retry_policy(policy),
        ..Default::default()
    };

    let response = client.attach_volume(&CancellationToken::new(), request).await.unwrap();

    assert!(matches!(response.volume_attachment, Some(VolumeAttachment::Paravirtualized(_))));
    assert_eq!(attempt_count.load(Ordering::SeqCst), 3);
    assert_eq!(sleeps.load(Ordering::SeqCst), 2);

    let received = mock_server.received_requests().await.unwrap();
    let tokens: Vec<String> = received.iter().map(retry_token_of).collect();
    assert_eq!(tokens.len(), 3);
    assert!(tokens.iter().all(|token| token == &tokens[0]));
}

#[tokio::test]
async fn test_cancel_during_backoff() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/20160918/instances/I"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let policy = RetryPolicy::builder()
        .max_attempts(5)
        .backoff(Backoff::Fixed(Duration::from_secs(30)))
        .build();

    let client = compute_client(&mock_server);
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let request = GetInstanceRequest {
        instance_id: "I".to_string(),
        metadata: RequestMetadata::default().with_retry_policy(policy),
        ..Default::default()
    };
    let result = tokio::time::timeout(Duration::from_secs(5), client.get_instance(&cancel, request))
        .await
        .expect("cancellation should end the backoff sleep");

    assert!(matches!(result, Err(Error::Cancelled)), "got {:?}", result);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_attachment_type_is_preserved() {
    init_tracing();
    let mock_server = MockServer::start().await;
    let payload = r#"{"attachmentType":"fibreChannel","id":"A9","wwn":"50:06:01:60"}"#;

    Mock::given(method("GET"))
        .and(path("/20160918/volumeAttachments/A9"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(payload, "application/json"))
        .mount(&mock_server)
        .await;

    let client = compute_client(&mock_server);
    let request = GetVolumeAttachmentRequest {
        volume_attachment_id: "A9".to_string(),
        ..Default::default()
    };

    let response = client
        .get_volume_attachment(&CancellationToken::new(), request)
        .await
        .unwrap();

    match response.volume_attachment {
        Some(VolumeAttachment::Unknown(unknown)) => {
            assert_eq!(unknown.discriminator(), Some("fibreChannel"));
            assert_eq!(unknown.raw_json(), payload);
        }
        other => panic!("Expected unknown variant, got {:?}", other),
    }
}

#[tokio::test]
async fn test_path_parameter_is_escaped() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/20160918/instancePools/pool%2F42/actions/stop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pool/42",
            "compartmentId": "C",
            "instanceConfigurationId": "cfg",
            "lifecycleState": "STOPPING",
            "placementConfigurations": [{"availabilityDomain": "AD-1", "primarySubnetId": "S"}],
            "size": 2,
            "timeCreated": "2024-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = ComputeManagementClient::new(config()).unwrap();
    client.set_host(&mock_server.uri()).unwrap();

    let request = StopInstancePoolRequest {
        instance_pool_id: "pool/42".to_string(),
        ..Default::default()
    };
    let response = client
        .stop_instance_pool(&CancellationToken::new(), request)
        .await
        .unwrap();

    let pool = response.instance_pool.unwrap();
    assert_eq!(pool.size, 2);
    assert_eq!(pool.lifecycle_state.as_str(), "STOPPING");

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received[0].url.path(), "/20160918/instancePools/pool%2F42/actions/stop");
}

#[tokio::test]
async fn test_empty_path_parameter_sends_nothing() {
    init_tracing();
    let mock_server = MockServer::start().await;
    let client = compute_client(&mock_server);

    let result = client
        .get_instance(&CancellationToken::new(), GetInstanceRequest::default())
        .await;

    assert!(matches!(result, Err(Error::InvalidRequest(_))), "got {:?}", result);
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_service_error_carries_request_id() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/20160918/instances/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({
                    "code": "NotAuthorizedOrNotFound",
                    "message": "Authorization failed"
                }))
                .insert_header("opc-request-id", "req-404"),
        )
        .mount(&mock_server)
        .await;

    let client = compute_client(&mock_server);
    let request = GetInstanceRequest {
        instance_id: "missing".to_string(),
        metadata: RequestMetadata::default().with_retry_policy(RetryPolicy::default()),
        ..Default::default()
    };
    let result = client.get_instance(&CancellationToken::new(), request).await;

    match result {
        Err(Error::Service(failure)) => {
            assert_eq!(failure.status.as_u16(), 404);
            assert_eq!(failure.code, "NotAuthorizedOrNotFound");
            assert_eq!(failure.message, "Authorization failed");
            assert_eq!(failure.opc_request_id.as_deref(), Some("req-404"));
        }
        other => panic!("Expected service error, got {:?}", other),
    }
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_max_attempts_exhausted() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/20160918/instances/I"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let policy = RetryPolicy::builder()
        .max_attempts(3)
        .backoff(Backoff::Fixed(Duration::from_millis(5)))
        .build();

    let client = compute_client(&mock_server);
    let request = GetInstanceRequest {
        instance_id: "I".to_string(),
        metadata: RequestMetadata::default().with_retry_policy(policy),
        ..Default::default()
    };
    let err = client
        .get_instance(&CancellationToken::new(), request)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RetryExhausted { attempts: 3, .. }), "got {:?}", err);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
    assert_eq!(err.raw_response().unwrap().text(), "Server error");
}

#[tokio::test]
async fn test_console_history_is_plain_text() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/20160918/instanceConsoleHistories/H/data"))
        .and(query_param("offset", "0"))
        .and(query_param("length", "1024"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("login: ", "text/plain")
                .insert_header("opc-bytes-remaining", "2048"),
        )
        .mount(&mock_server)
        .await;

    let client = compute_client(&mock_server);
    let request = GetConsoleHistoryContentRequest {
        instance_console_history_id: "H".to_string(),
        offset: Some(0),
        length: Some(1024),
        ..Default::default()
    };
    let response = client
        .get_console_history_content(&CancellationToken::new(), request)
        .await
        .unwrap();

    assert_eq!(response.value.as_deref(), Some("login: "));
    assert_eq!(response.opc_bytes_remaining, Some(2048));
}

struct StaticSigner;

impl RequestSigner for StaticSigner {
    fn sign(&self, request: &mut reqwest::Request, key_id: &str) -> coreservices::Result<()> {
        let value = format!("Signature keyId=\"{}\"", key_id);
        request
            .headers_mut()
            .insert("authorization", value.parse().map_err(|_| Error::InvalidRequest(value))?);
        Ok(())
    }
}

#[tokio::test]
async fn test_signer_sees_default_headers() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/20160918/instances/I"))
        .and(header("authorization", "Signature keyId=\"tenancy/user/aa:bb\""))
        .and(header_exists("date"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "I",
            "availabilityDomain": "AD-1",
            "compartmentId": "C",
            "lifecycleState": "PROVISIONING",
            "region": "phx",
            "shape": "VM.Standard2.1",
            "timeCreated": "2024-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = compute_client(&mock_server).with_signer(Arc::new(StaticSigner));
    let request = GetInstanceRequest {
        instance_id: "I".to_string(),
        ..Default::default()
    };
    let response = client.get_instance(&CancellationToken::new(), request).await.unwrap();

    assert_eq!(response.instance.unwrap().shape, "VM.Standard2.1");
}
