use crate::app::{authorize, require_subject};
use crate::core::access::{self, Capability};
use crate::core::client::{ApiClient, Resource};
use crate::domain::model::{NewSupportRequest, SupportRequest};
use crate::domain::ports::TokenStore;
use crate::utils::error::Result;
use crate::utils::validation::require_fields;
use chrono::Utc;

pub struct SupportRequestService<'a, S: TokenStore> {
    client: &'a ApiClient<S>,
}

impl<'a, S: TokenStore> SupportRequestService<'a, S> {
    pub fn new(client: &'a ApiClient<S>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<SupportRequest>> {
        let identity = self.client.require_identity()?;
        let rows = self.client.list(Resource::SupportRequest).await?;
        Ok(access::visible_support_requests(&identity, rows))
    }

    /// 建立支援請求：requestDate 取當下 UTC 時間，userId 取自 token
    pub async fn create(&self, issue_type: &str, description: &str) -> Result<Vec<SupportRequest>> {
        let identity = authorize(self.client, Capability::CreateSupportRequest)?;
        require_fields(&[("Issue Type", issue_type), ("Description", description)])?;

        let body = NewSupportRequest {
            issue_type: issue_type.to_string(),
            description: description.to_string(),
            request_date: Utc::now(),
            user_id: require_subject(&identity)?,
        };
        self.client.create(Resource::SupportRequest, &body).await?;
        tracing::info!("Support request filed: {}", issue_type);
        self.list().await
    }

    /// Replace a request wholesale. Last write wins.
    pub async fn update(&self, request: &SupportRequest) -> Result<Vec<SupportRequest>> {
        authorize(self.client, Capability::ManageSupportRequests)?;
        require_fields(&[
            ("Issue Type", request.issue_type.as_str()),
            ("Description", request.description.as_str()),
        ])?;

        self.client
            .update(Resource::SupportRequest, request.support_request_id, request)
            .await?;
        tracing::info!("Support request {} updated", request.support_request_id);
        self.list().await
    }

    pub async fn delete(&self, support_request_id: i64) -> Result<Vec<SupportRequest>> {
        authorize(self.client, Capability::ManageSupportRequests)?;
        self.client
            .remove(Resource::SupportRequest, support_request_id)
            .await?;
        tracing::info!("Support request {} deleted", support_request_id);
        self.list().await
    }
}
