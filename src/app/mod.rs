//! Per-resource services: fetch, filter for the viewer, mutate, re-fetch.

pub mod appointments;
pub mod knowledge_base;
pub mod quotes;
pub mod spare_parts;
pub mod support_requests;

use crate::core::access::{self, Capability};
use crate::core::client::ApiClient;
use crate::domain::model::Identity;
use crate::domain::ports::TokenStore;
use crate::utils::error::{Result, SupportError};

pub use appointments::AppointmentService;
pub use quotes::{QuoteOverview, QuoteService};
pub use spare_parts::SparePartService;
pub use support_requests::SupportRequestService;

/// Viewer who may perform `capability`. Mirrors the hidden buttons of the
/// dashboard; the API still has the final say.
pub(crate) fn authorize<S: TokenStore>(
    client: &ApiClient<S>,
    capability: Capability,
) -> Result<Identity> {
    let identity = client.require_identity()?;
    if access::can(&identity, capability) {
        Ok(identity)
    } else {
        tracing::warn!(
            "Blocked '{}' for role {:?}",
            capability.action(),
            identity.role
        );
        Err(SupportError::forbidden(capability.action()))
    }
}

pub(crate) fn require_subject(identity: &Identity) -> Result<String> {
    identity
        .subject_id
        .clone()
        .ok_or_else(|| SupportError::validation("The session token carries no user id"))
}
