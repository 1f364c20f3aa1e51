//! Integration tests against a mocked provider admin API.

use std::time::Duration;

use auth_audit::audit::{self, AuditOutcome};
use auth_audit::{Config, ConfigError, FetchError, Settings, SupabaseAdminClient, UserDirectory};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "service-key";

fn config_for(server: &MockServer) -> Config {
    Config {
        base_url: server.uri(),
        service_role_key: KEY.to_string(),
    }
}

fn admin_users() -> wiremock::MockBuilder {
    Mock::given(method("GET"))
        .and(path("/auth/v1/admin/users"))
        .and(header("authorization", "Bearer service-key"))
        .and(header("apikey", KEY))
        .and(header("content-type", "application/json"))
}

#[tokio::test]
async fn test_list_users_success() {
    let server = MockServer::start().await;
    admin_users()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                {
                    "email": "anothertest@gmail.com",
                    "id": "u-1",
                    "created_at": "2024-01-01T00:00:00Z",
                    "email_confirmed_at": "2024-01-01T00:05:00Z",
                    "last_sign_in_at": "2024-02-01T00:00:00Z"
                },
                {
                    "email": "pending@gmail.com",
                    "id": "u-2",
                    "created_at": "2024-01-02T00:00:00Z",
                    "email_confirmed_at": null
                }
            ],
            "aud": "authenticated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SupabaseAdminClient::new(&config_for(&server));
    let fetched = client.list_users().await.unwrap();

    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.users.len(), 2);
    assert_eq!(fetched.users[0].id, "u-1");
    assert!(fetched.users[0].is_confirmed());
    assert!(!fetched.users[1].is_confirmed());
}

#[tokio::test]
async fn test_list_users_missing_field_is_empty() {
    let server = MockServer::start().await;
    admin_users()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = SupabaseAdminClient::new(&config_for(&server));
    let fetched = client.list_users().await.unwrap();
    assert!(fetched.users.is_empty());
}

#[tokio::test]
async fn test_server_error_is_provider_error() {
    let server = MockServer::start().await;
    admin_users()
        .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
        .mount(&server)
        .await;

    let client = SupabaseAdminClient::new(&config_for(&server));
    match client.list_users().await {
        Err(FetchError::Provider { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "server error");
        }
        other => panic!("expected provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unauthorized_is_provider_error() {
    let server = MockServer::start().await;
    admin_users()
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"msg":"Invalid API key"}"#),
        )
        .mount(&server)
        .await;

    let client = SupabaseAdminClient::new(&config_for(&server));
    let err = client.list_users().await.unwrap_err();
    assert!(matches!(err, FetchError::Provider { status: 401, .. }));
}

#[tokio::test]
async fn test_non_200_success_status_is_provider_error() {
    let server = MockServer::start().await;
    admin_users()
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = SupabaseAdminClient::new(&config_for(&server));
    let err = client.list_users().await.unwrap_err();
    assert!(matches!(err, FetchError::Provider { status: 204, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_transport_error() {
    let server = MockServer::start().await;
    admin_users()
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = SupabaseAdminClient::new(&config_for(&server));
    let err = client.list_users().await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    admin_users()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"users": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client =
        SupabaseAdminClient::with_timeout(&config_for(&server), Duration::from_millis(100)).unwrap();
    let err = client.list_users().await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_run_with_empty_user_list() {
    let server = MockServer::start().await;
    admin_users()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": []})))
        .mount(&server)
        .await;

    let client = SupabaseAdminClient::new(&config_for(&server));
    let outcome = audit::run(&client, &[]).await;

    let text = outcome.render();
    assert!(text.contains("API Response Status: 200"));
    assert!(text.contains("Found 0 users"));
    assert!(text.contains("likely cause of authentication failures"));
}

#[tokio::test]
async fn test_run_with_watch_list() {
    let server = MockServer::start().await;
    admin_users()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"email": "a@x.com", "id": "1", "created_at": "t", "email_confirmed_at": "t2"}]
        })))
        .mount(&server)
        .await;

    let client = SupabaseAdminClient::new(&config_for(&server));
    let watch = vec!["a@x.com".to_string(), "b@x.com".to_string()];
    let outcome = audit::run(&client, &watch).await;

    match &outcome {
        AuditOutcome::Report { report, .. } => {
            assert!(report.contains("Found 1 users"));
            assert!(report.contains("Email Confirmed: ✓"));
            assert!(report.contains("a@x.com: ✅ EXISTS"));
            assert!(report.contains("b@x.com: ❌ NOT FOUND"));
        }
        AuditOutcome::Failed(e) => panic!("unexpected failure: {}", e),
    }
}

#[tokio::test]
async fn test_run_with_provider_error_ends_normally() {
    let server = MockServer::start().await;
    admin_users()
        .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
        .mount(&server)
        .await;

    let client = SupabaseAdminClient::new(&config_for(&server));
    let outcome = audit::run(&client, &[]).await;

    let text = outcome.render();
    assert!(text.contains("API Response Status: 500"));
    assert!(text.contains("Failed to fetch users: 500"));
    assert!(text.contains("Response: server error"));
}

fn env_lookup(vars: Vec<(&'static str, String)>) -> impl Fn(&str) -> Option<String> {
    move |name: &str| {
        vars.iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.clone())
    }
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": []})))
        .expect(0)
        .mount(&server)
        .await;

    let lookup = env_lookup(vec![("SUPABASE_URL", server.uri())]);
    let result = audit::run_with_lookup(lookup, &Settings::default(), &[]).await;

    assert!(matches!(
        result,
        Err(ConfigError::MissingCredentials { url_missing: false, key_missing: true })
    ));
    server.verify().await;
}

#[tokio::test]
async fn test_run_with_lookup_reports_users() {
    let server = MockServer::start().await;
    admin_users()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"email": "a@x.com", "id": "1", "created_at": "t"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lookup = env_lookup(vec![
        ("NEXT_PUBLIC_SUPABASE_URL", format!("{}/", server.uri())),
        ("SUPABASE_SERVICE_ROLE_KEY", KEY.to_string()),
    ]);
    let run = audit::run_with_lookup(lookup, &Settings::default(), &["a@x.com".to_string()])
        .await
        .unwrap();

    assert_eq!(run.base_url, server.uri());
    let text = run.render();
    assert!(text.contains(&format!("Supabase URL: {}", server.uri())));
    assert!(text.contains("API Response Status: 200"));
    assert!(text.contains("a@x.com: ✅ EXISTS"));
}

#[tokio::test]
async fn test_run_with_lookup_applies_timeout_setting() {
    let server = MockServer::start().await;
    admin_users()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"users": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let lookup = env_lookup(vec![
        ("SUPABASE_URL", server.uri()),
        ("SUPABASE_SERVICE_ROLE_KEY", KEY.to_string()),
    ]);
    let settings = Settings {
        request_timeout_secs: Some(1),
        ..Settings::default()
    };
    let run = audit::run_with_lookup(lookup, &settings, &[]).await.unwrap();

    assert!(matches!(run.outcome, AuditOutcome::Failed(FetchError::Transport(_))));
}

#[tokio::test]
async fn test_null_id_and_created_at_are_tolerated() {
    let server = MockServer::start().await;
    admin_users()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"email": "a", "id": null, "created_at": null}]
        })))
        .mount(&server)
        .await;

    let client = SupabaseAdminClient::new(&config_for(&server));
    let outcome = audit::run(&client, &[]).await;

    let text = outcome.render();
    assert!(text.contains("Found 1 users"));
    assert!(text.contains("ID: No ID"));
    assert!(text.contains("Created: Unknown"));
}
