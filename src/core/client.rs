use crate::core::session::SessionManager;
use crate::domain::model::{AuthResponse, Identity, LoginRequest, RegisterRequest};
use crate::domain::ports::{ConfigProvider, TokenStore};
use crate::utils::error::{Result, SupportError};
use crate::utils::validation;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// REST collections exposed by the support API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Appointment,
    SupportRequest,
    Quote,
    SparePart,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Appointment => "Appointment",
            Resource::SupportRequest => "SupportRequest",
            Resource::Quote => "Quote",
            Resource::SparePart => "SparePart",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Bearer,
    Anonymous,
}

pub struct ApiClient<S: TokenStore> {
    base_url: String,
    client: Client,
    session: SessionManager<S>,
}

impl<S: TokenStore> ApiClient<S> {
    pub fn new<C: ConfigProvider>(config: &C, session: SessionManager<S>) -> Result<Self> {
        validation::validate_url("api.base_url", config.api_base_url())?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            base_url: config.api_base_url().trim_end_matches('/').to_string(),
            client,
            session,
        })
    }

    pub fn session(&self) -> &SessionManager<S> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current viewer, or `NotAuthenticated` without touching the network.
    pub fn require_identity(&self) -> Result<Identity> {
        self.session.identity().ok_or(SupportError::NotAuthenticated)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: Auth,
    ) -> Result<Response> {
        let url = self.endpoint(path);
        let mut request = self.client.request(method.clone(), &url);

        if auth == Auth::Bearer {
            if let Some(token) = self.session.bearer_token() {
                request = request.bearer_auth(token);
            }
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!("📡 {} {}", method, url);
        let response = request.send().await.map_err(|e| {
            tracing::error!("❌ {} {} failed: {}", method, url, e);
            SupportError::Http(e)
        })?;
        tracing::debug!("📡 {} {} -> {}", method, url, response.status());

        self.check_status(response, auth).await
    }

    async fn check_status(&self, response: Response, auth: Auth) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && auth == Auth::Bearer {
            match self.session.invalidate() {
                Ok(true) => tracing::warn!("🔒 Token rejected by server, session cleared"),
                Ok(false) => tracing::debug!("🔒 401 received without an active session"),
                Err(e) => tracing::error!("❌ Failed to clear rejected session: {}", e),
            }
            return Err(SupportError::Unauthorized);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::error!("❌ API request failed with status {}: {}", status, message);
        Err(SupportError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send::<()>(Method::GET, path, None, Auth::Bearer).await?;
        Ok(response.json().await?)
    }

    /// Send a mutation; the response body, if any, is ignored.
    pub async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<()> {
        self.send(method, path, body, Auth::Bearer).await?;
        Ok(())
    }

    pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>> {
        self.get(resource.path()).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, resource: Resource, body: &B) -> Result<()> {
        self.execute(Method::POST, resource.path(), Some(body)).await
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        resource: Resource,
        id: i64,
        body: &B,
    ) -> Result<()> {
        let path = format!("{}/{}", resource.path(), id);
        self.execute(Method::PUT, &path, Some(body)).await
    }

    pub async fn remove(&self, resource: Resource, id: i64) -> Result<()> {
        let path = format!("{}/{}", resource.path(), id);
        self.execute::<()>(Method::DELETE, &path, None).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(SupportError::validation(
                "Please enter both email and password",
            ));
        }

        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self
            .send(Method::POST, "auth/login", Some(&body), Auth::Anonymous)
            .await?;
        let auth: AuthResponse = response.json().await?;
        self.session.establish(&auth.token)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Identity> {
        validation::require_fields(&[
            ("Full Name", request.full_name.as_str()),
            ("Email", request.email.as_str()),
            ("Password", request.password.as_str()),
            ("Confirm Password", request.confirm_password.as_str()),
        ])?;
        if request.password != request.confirm_password {
            return Err(SupportError::validation("Passwords do not match"));
        }

        let response = self
            .send(Method::POST, "auth/register", Some(request), Auth::Anonymous)
            .await?;
        let auth: AuthResponse = response.json().await?;
        self.session.establish(&auth.token)
    }

    pub fn logout(&self) -> Result<()> {
        self.session.logout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryTokenStore;
    use std::time::Duration;

    struct TestConfig(&'static str);

    impl ConfigProvider for TestConfig {
        fn api_base_url(&self) -> &str {
            self.0
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(5)
        }

        fn token_path(&self) -> &str {
            "unused"
        }
    }

    fn client(base: &'static str) -> Result<ApiClient<MemoryTokenStore>> {
        ApiClient::new(
            &TestConfig(base),
            SessionManager::new(MemoryTokenStore::default()),
        )
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let api = client("http://localhost:5000/api/").unwrap();
        assert_eq!(api.endpoint("Quote"), "http://localhost:5000/api/Quote");
        assert_eq!(api.endpoint("/auth/login"), "http://localhost:5000/api/auth/login");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            client("not a url"),
            Err(SupportError::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_require_identity_when_anonymous() {
        let api = client("http://localhost:5000").unwrap();
        assert!(matches!(
            api.require_identity(),
            Err(SupportError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_login_requires_both_fields_before_network() {
        let api = client("http://localhost:1").unwrap();
        let err = api.login("", "secret").await.unwrap_err();
        assert_eq!(
            err.user_friendly_message(),
            "Please enter both email and password"
        );
    }

    #[tokio::test]
    async fn test_register_checks_password_match() {
        let api = client("http://localhost:1").unwrap();
        let request = RegisterRequest {
            full_name: "Jo Doe".to_string(),
            email: "jo@example.com".to_string(),
            password: "one".to_string(),
            confirm_password: "two".to_string(),
        };
        let err = api.register(&request).await.unwrap_err();
        assert_eq!(err.user_friendly_message(), "Passwords do not match");
    }
}
