#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use dern_support::core::session::{ROLE_CLAIM, SUBJECT_CLAIM};
use dern_support::{ApiClient, MemoryTokenStore, SessionManager, Settings};
use serde_json::json;

/// Unsigned JWT carrying the claims the support API issues.
pub fn token(role: &str, subject: &str, expires_in_secs: i64) -> String {
    let payload = json!({
        ROLE_CLAIM: role,
        SUBJECT_CLAIM: subject,
        "exp": chrono::Utc::now().timestamp() + expires_in_secs,
    });
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

pub fn settings(base_url: String) -> Settings {
    Settings {
        api_base_url: base_url,
        timeout_seconds: 5,
        token_path: "unused".to_string(),
        log_level: None,
        json_logs: false,
    }
}

pub fn anonymous_client(base_url: String) -> ApiClient<MemoryTokenStore> {
    ApiClient::new(
        &settings(base_url),
        SessionManager::new(MemoryTokenStore::default()),
    )
    .expect("client")
}

/// Client already holding a session for `role` / `subject`.
pub fn client_as(base_url: String, role: &str, subject: &str) -> (ApiClient<MemoryTokenStore>, String) {
    let client = anonymous_client(base_url);
    let token = token(role, subject, 3600);
    client.session().establish(&token).expect("establish");
    (client, token)
}
