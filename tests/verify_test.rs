use serde_json::json;
use std::time::Duration;
use unbound_setup::{ApiKeyVerifier, ResponseShape, Verification};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn models_url(server: &MockServer) -> String {
    format!("{}/v1/models", server.uri())
}

#[tokio::test]
async fn test_model_list_is_valid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("Authorization", "Bearer abc123"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "model-1"}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let verifier = ApiKeyVerifier::new(models_url(&mock_server)).unwrap();
    let verification = verifier.verify("abc123").await;

    assert_eq!(verification, Verification::Valid(ResponseShape::ModelList(1)));
    assert!(verification.is_valid());
}

#[tokio::test]
async fn test_unauthorized_carries_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "invalid key"}})),
        )
        .mount(&mock_server)
        .await;

    let verifier = ApiKeyVerifier::new(models_url(&mock_server)).unwrap();
    let verification = verifier.verify("wrong").await;

    assert_eq!(
        verification,
        Verification::Rejected {
            status: 401,
            message: Some("invalid key".to_string()),
        }
    );
    assert!(!verification.is_valid());
}

#[tokio::test]
async fn test_malformed_error_body_is_tolerated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let verifier = ApiKeyVerifier::new(models_url(&mock_server)).unwrap();

    assert_eq!(
        verifier.verify("abc123").await,
        Verification::Rejected {
            status: 502,
            message: None,
        }
    );
}

#[tokio::test]
async fn test_non_200_success_status_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let verifier = ApiKeyVerifier::new(models_url(&mock_server)).unwrap();

    assert!(matches!(
        verifier.verify("abc123").await,
        Verification::Rejected { status: 204, .. }
    ));
}

#[tokio::test]
async fn test_empty_model_list_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;

    let verifier = ApiKeyVerifier::new(models_url(&mock_server)).unwrap();

    assert_eq!(
        verifier.verify("abc123").await,
        Verification::UnexpectedBody(ResponseShape::EmptyModelList)
    );
}

#[tokio::test]
async fn test_any_non_empty_object_is_accepted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"object": "list"})))
        .mount(&mock_server)
        .await;

    let verifier = ApiKeyVerifier::new(models_url(&mock_server)).unwrap();

    assert_eq!(
        verifier.verify("abc123").await,
        Verification::Valid(ResponseShape::Object)
    );
}

#[tokio::test]
async fn test_non_json_success_body_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&mock_server)
        .await;

    let verifier = ApiKeyVerifier::new(models_url(&mock_server)).unwrap();

    assert!(matches!(
        verifier.verify("abc123").await,
        Verification::MalformedBody(_)
    ));
}

#[tokio::test]
async fn test_empty_key_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "m"}]})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let verifier = ApiKeyVerifier::new(models_url(&mock_server)).unwrap();

    assert_eq!(verifier.verify("").await, Verification::EmptyKey);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_network_failure() {
    let url = {
        let mock_server = MockServer::start().await;
        models_url(&mock_server)
    };

    let verifier = ApiKeyVerifier::new(url).unwrap();

    assert!(matches!(
        verifier.verify("abc123").await,
        Verification::Network(_)
    ));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [{"id": "model-1"}]}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let verifier =
        ApiKeyVerifier::with_timeout(models_url(&mock_server), Duration::from_millis(200)).unwrap();

    match verifier.verify("abc123").await {
        Verification::Network(message) => {
            assert!(message.starts_with("Request timed out after 200ms"), "{message}");
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
}
