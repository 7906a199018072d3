//! End-to-end Freepik task workflow against a mock server.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use modelgate::providers::freepik::{FreepikConfig, FreepikProvider};
use modelgate::traits::{ImageGenerationCapability, ModelProvider};
use modelgate::types::ImageGenerationRequest;
use modelgate::utils::cancel::CancelHandle;
use modelgate::ProviderError;

// Tiny valid PNG header so MIME sniffing has something to chew on.
const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

fn provider_for(server: &MockServer) -> FreepikProvider {
    let config = FreepikConfig::new(SecretString::from("fpk-test")).with_base_url(server.uri());
    FreepikProvider::new(config).expect("provider")
}

#[tokio::test]
async fn image_task_is_created_polled_and_downloaded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/ai/mystic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "task_id": "task-42", "status": "IN_PROGRESS" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let asset_url = format!("{}/cdn/result.png", server.uri());
    Mock::given(method("GET"))
        .and(path("/v1/ai/mystic/task-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "task_id": "task-42",
                "status": "COMPLETED",
                "generated": [asset_url.clone(), format!("{}/cdn/extra.png", server.uri())]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cdn/result.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let request = ImageGenerationRequest {
        prompt: "a lighthouse at dusk".to_string(),
        ..Default::default()
    };
    let response = provider
        .images()
        .expect("capability")
        .generate_images(request, &CancelHandle::new())
        .await
        .expect("image");

    assert_eq!(response.metadata.id.as_deref(), Some("task-42"));
    assert_eq!(response.images.len(), 1);
    let image = &response.images[0];
    assert_eq!(image.url.as_deref(), Some(asset_url.as_str()));
    assert!(image.b64_data.is_some());
    assert_eq!(image.mime_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn create_response_without_task_id_fails_before_any_poll() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/ai/mystic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "status": "CREATED" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let request = ImageGenerationRequest {
        prompt: "anything".to_string(),
        ..Default::default()
    };
    let err = provider
        .images()
        .expect("capability")
        .generate_images(request, &CancelHandle::new())
        .await
        .expect_err("must fail");

    assert!(matches!(err, ProviderError::ParseError(_)));
    // No status GET was registered; wiremock verifies on drop that the
    // create call was the only request.
}

#[tokio::test]
async fn poll_http_error_propagates_immediately() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/ai/mystic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "task_id": "task-9", "status": "IN_PROGRESS" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/ai/mystic/task-9"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let request = ImageGenerationRequest {
        prompt: "anything".to_string(),
        ..Default::default()
    };
    let err = provider
        .images()
        .expect("capability")
        .generate_images(request, &CancelHandle::new())
        .await
        .expect_err("must fail");

    match err {
        ProviderError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("backend exploded"));
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[tokio::test]
async fn failed_task_surfaces_as_vendor_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/ai/mystic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "task_id": "task-7", "status": "FAILED" }
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let request = ImageGenerationRequest {
        prompt: "anything".to_string(),
        ..Default::default()
    };
    let err = provider
        .images()
        .expect("capability")
        .generate_images(request, &CancelHandle::new())
        .await
        .expect_err("must fail");

    match err {
        ProviderError::ApiError { message, .. } => assert!(message.contains("task-7")),
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[tokio::test]
async fn caller_cancel_stops_an_in_flight_image_poll() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/ai/mystic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "task_id": "task-3", "status": "IN_PROGRESS" }
        })))
        .mount(&server)
        .await;

    // The task never finishes; only cancellation can end the poll loop.
    Mock::given(method("GET"))
        .and(path("/v1/ai/mystic/task-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "task_id": "task-3", "status": "IN_PROGRESS" }
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let cancel = CancelHandle::new();
    let cancel_clone = cancel.clone();

    let task = tokio::spawn(async move {
        let request = ImageGenerationRequest {
            prompt: "anything".to_string(),
            ..Default::default()
        };
        provider
            .images()
            .expect("capability")
            .generate_images(request, &cancel_clone)
            .await
    });

    // Let the create call and first poll land, then cancel mid-wait.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    cancel.cancel();

    let err = tokio::time::timeout(std::time::Duration::from_secs(1), task)
        .await
        .expect("cancel should end the poll loop")
        .expect("task ok")
        .expect_err("must be cancelled");

    assert!(err.is_cancelled());
}
