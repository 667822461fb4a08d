use fedbroker_core::{FederationErrorKind, FEDERATED_ACCESS_TOKEN};
use fedbroker_flow::{Federation, FederationFlow, OAuth2Client};
use fedbroker_providers_vk::{default_config, VkProvider, PROFILE_CONTENT_TYPE};
use serde_json::json;
use std::error::Error as _;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup(body: ResponseTemplate) -> (MockServer, FederationFlow<VkProvider>) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/method/users.get"))
        .respond_with(body)
        .mount(&server)
        .await;

    let config = default_config().with_profile_url(format!("{}/method/users.get", server.uri()));
    let flow = FederationFlow::new(VkProvider::with_config(config));
    (server, flow)
}

fn profile_body(profile: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "response": [profile] }))
}

#[tokio::test]
async fn test_federate_full_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/method/users.get"))
        .and(query_param("fields", "id,screen_name,first_name,last_name"))
        .and(query_param("access_token", "T"))
        .and(query_param("v", "5.78"))
        .and(header("content-type", PROFILE_CONTENT_TYPE))
        .respond_with(profile_body(json!({
            "id": "42",
            "screen_name": "joe",
            "first_name": "Jo",
            "last_name": "E"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = default_config().with_profile_url(format!("{}/method/users.get", server.uri()));
    let flow = FederationFlow::new(VkProvider::with_config(config));

    let identity = flow
        .federate("access_token=T&expires_in=86400&user_id=42&email=a@b.com")
        .await
        .unwrap();

    assert_eq!(identity.provider_id, "vkontakte");
    assert_eq!(identity.identifier, "42");
    assert_eq!(identity.username, "joe");
    assert_eq!(identity.email.as_deref(), Some("a@b.com"));
    assert_eq!(identity.display_name, "Jo E");
    assert_eq!(identity.context_data.get(FEDERATED_ACCESS_TOKEN).unwrap(), "T");
    assert_eq!(
        identity.raw_profile("vkontakte"),
        Some(&json!({
            "id": "42",
            "screen_name": "joe",
            "first_name": "Jo",
            "last_name": "E",
            "email": "a@b.com"
        }))
    );
}

#[tokio::test]
async fn test_json_token_response() {
    let (_server, flow) = setup(profile_body(json!({"id": 42, "first_name": "Jo"}))).await;

    let identity = flow
        .federate(r#"{"access_token":"T","expires_in":0,"user_id":42,"email":"a@b.com"}"#)
        .await
        .unwrap();

    assert_eq!(identity.identifier, "42");
    assert_eq!(identity.username, "a@b.com");
    assert_eq!(identity.display_name, "Jo");
}

#[tokio::test]
async fn test_without_screen_name_or_email() {
    let (_server, flow) =
        setup(profile_body(json!({"id": "42", "first_name": "Jo", "last_name": ""}))).await;

    let identity = flow.federate("access_token=T").await.unwrap();

    assert_eq!(identity.username, "42");
    assert_eq!(identity.email, None);
    assert_eq!(identity.display_name, "Jo ");
    assert_eq!(identity.raw_profile("vkontakte").unwrap()["email"], json!(null));
}

#[tokio::test]
async fn test_missing_token_does_not_call_profile_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(profile_body(json!({"id": "42"})))
        .expect(0)
        .mount(&server)
        .await;

    let config = default_config().with_profile_url(server.uri());
    let flow = FederationFlow::new(VkProvider::with_config(config));

    let err = flow.federate("email=a@b.com").await.unwrap_err();
    assert_eq!(err.kind(), FederationErrorKind::MissingToken);
}

#[tokio::test]
async fn test_malformed_envelopes() {
    for body in [
        ResponseTemplate::new(200).set_body_json(json!({})),
        ResponseTemplate::new(200).set_body_json(json!({"response": []})),
        ResponseTemplate::new(200).set_body_json(json!({"response": {"id": 1}})),
    ] {
        let (_server, flow) = setup(body).await;
        let err = flow.federate("access_token=T").await.unwrap_err();
        assert_eq!(err.kind(), FederationErrorKind::ProfileFetchFailed);
    }
}

#[tokio::test]
async fn test_non_json_body_keeps_cause() {
    let (_server, flow) =
        setup(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>")).await;

    let err = flow.federate("access_token=T").await.unwrap_err();
    assert_eq!(err.kind(), FederationErrorKind::ProfileFetchFailed);
    assert!(err.source().is_some());
}

#[tokio::test]
async fn test_api_error_is_reported() {
    let (_server, flow) = setup(ResponseTemplate::new(200).set_body_json(json!({
        "error": {"error_code": 5, "error_msg": "User authorization failed"}
    })))
    .await;

    let err = flow.federate("access_token=T").await.unwrap_err();
    assert_eq!(err.kind(), FederationErrorKind::ProfileFetchFailed);
    assert!(err.to_string().contains("User authorization failed"));
}

#[tokio::test]
async fn test_missing_id() {
    let (_server, flow) = setup(profile_body(json!({"screen_name": "joe"}))).await;

    let err = flow.federate("access_token=T").await.unwrap_err();
    assert_eq!(err.kind(), FederationErrorKind::InvalidProfile);
}

#[tokio::test]
async fn test_unreachable_profile_endpoint() {
    let config = default_config().with_profile_url("http://127.0.0.1:1/method/users.get");
    let flow = FederationFlow::new(VkProvider::with_config(config));

    let err = flow.federate("access_token=secret").await.unwrap_err();
    assert_eq!(err.kind(), FederationErrorKind::ProfileFetchFailed);
    assert!(err.source().is_some());
    assert!(!format!("{:?}", err).contains("secret"));
}

#[tokio::test]
async fn test_registry_with_custom_alias_and_external_token() {
    let (_server, flow) = setup(profile_body(json!({"id": 7, "screen_name": "id7"}))).await;
    let config = flow.vendor_config().clone();
    let client = OAuth2Client::new("vk-social");

    let federation = Federation::builder()
        .provider(FederationFlow::with_client(
            client,
            VkProvider::with_config(config),
        ))
        .build();

    let identity = federation
        .federate_access_token("vk-social", "external")
        .await
        .unwrap();

    assert_eq!(identity.provider_id, "vk-social");
    assert_eq!(identity.username, "id7");
    assert_eq!(identity.email, None);
    assert_eq!(identity.access_token(), Some("external"));
    assert!(identity.raw_profile("vk-social").is_some());
}

#[tokio::test]
async fn test_escaped_token_is_sent_as_given() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/method/users.get"))
        .and(query_param("access_token", "ab/cd+ef"))
        .respond_with(profile_body(json!({"id": "42"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = default_config().with_profile_url(format!("{}/method/users.get", server.uri()));
    let flow = FederationFlow::new(VkProvider::with_config(config));

    let identity = flow
        .federate("access_token=ab%2Fcd%2Bef&email=a%40b.com")
        .await
        .unwrap();

    assert_eq!(identity.access_token(), Some("ab%2Fcd%2Bef"));
    assert_eq!(identity.email.as_deref(), Some("a%40b.com"));
    assert_eq!(
        flow.profile_endpoint_for_validation(),
        format!(
            "{}/method/users.get?fields=id,screen_name,first_name,last_name&v=5.78",
            server.uri()
        )
    );
}
