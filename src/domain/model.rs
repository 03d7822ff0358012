use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 使用者權限等級（取自 token 的 role claim）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Technician,
    Customer,
    /// Claim present but not one of the known tiers. Grants nothing.
    Other(String),
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value {
            "Admin" => Role::Admin,
            "Technician" => Role::Technician,
            "Customer" => Role::Customer,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "Admin",
            Role::Technician => "Technician",
            Role::Customer => "Customer",
            Role::Other(value) => value,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity resolved from a bearer token. Display only, never authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub role: Option<Role>,
    pub subject_id: Option<String>,
    pub email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.role.as_ref().is_some_and(|role| roles.contains(role))
    }

    /// `true` only when both sides carry a subject id and they match.
    pub fn owns(&self, user_id: &str) -> bool {
        self.subject_id.as_deref() == Some(user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(Identity),
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(identity) => Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub appointment_id: i64,
    pub appointment_date: String,
    pub location: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub appointment_date: String,
    pub location: String,
    pub user_id: String,
    pub user_phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportRequest {
    pub support_request_id: i64,
    pub issue_type: String,
    pub description: String,
    pub request_date: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupportRequest {
    pub issue_type: String,
    pub description: String,
    pub request_date: DateTime<Utc>,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparePart {
    pub spare_part_id: i64,
    pub name: String,
    pub stock_level: i64,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSparePart {
    pub name: String,
    pub stock_level: i64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub quote_id: i64,
    pub support_request_id: i64,
    #[serde(default)]
    pub spare_part_ids: Vec<i64>,
    #[serde(default)]
    pub description: String,
    pub total_cost: f64,
}

/// Body for both quote creation and quote update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    pub support_request_id: i64,
    pub spare_part_ids: Vec<i64>,
    pub description: String,
    pub total_cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_round_trips_known_tiers() {
        for name in ["Admin", "Technician", "Customer"] {
            assert_eq!(Role::parse(name).as_str(), name);
        }
        assert_eq!(Role::parse("admin"), Role::Other("admin".to_string()));
    }

    #[test]
    fn test_owns_requires_subject_id() {
        let identity = Identity {
            role: Some(Role::Customer),
            subject_id: None,
            email: None,
            expires_at: None,
        };
        assert!(!identity.owns(""));
        assert!(!identity.owns("u-1"));
    }

    #[test]
    fn test_quote_decodes_api_shape() {
        let quote: Quote = serde_json::from_value(serde_json::json!({
            "quoteId": 4,
            "supportRequestId": 9,
            "sparePartIds": [1, 2],
            "description": "Replace fan",
            "totalCost": 42.5
        }))
        .unwrap();

        assert_eq!(quote.spare_part_ids, vec![1, 2]);
        assert_eq!(quote.total_cost, 42.5);
    }
}
