//! Bearer-token session handling.
//!
//! The token payload is decoded without verifying the signature. Whatever it
//! claims is used to decide what to *show*; the API decides what is allowed.

use crate::domain::model::{Identity, Role, SessionState};
use crate::domain::ports::TokenStore;
use crate::utils::error::{Result, SupportError};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const ROLE_CLAIM: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";
pub const SUBJECT_CLAIM: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
pub const EMAIL_CLAIM: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Decoded JWT payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    claims: Map<String, Value>,
}

impl TokenClaims {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.claims.get(key)
    }

    fn lookup(&self, primary: &str, fallback: &str) -> Option<String> {
        self.claims
            .get(primary)
            .or_else(|| self.claims.get(fallback))
            .and_then(claim_string)
    }

    pub fn role(&self) -> Option<Role> {
        self.lookup(ROLE_CLAIM, "role").map(|role| Role::parse(&role))
    }

    pub fn subject_id(&self) -> Option<String> {
        self.lookup(SUBJECT_CLAIM, "sub")
    }

    pub fn email(&self) -> Option<String> {
        self.lookup(EMAIL_CLAIM, "email")
    }

    /// `Ok(None)` when there is no `exp`, `Err(())` when `exp` is unusable.
    fn expiry(&self) -> std::result::Result<Option<DateTime<Utc>>, ()> {
        let Some(exp) = self.claims.get("exp") else {
            return Ok(None);
        };
        let seconds = exp
            .as_i64()
            .or_else(|| exp.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .ok_or(())?;
        DateTime::from_timestamp(seconds, 0).map(Some).ok_or(())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiry().ok().flatten()
    }

    pub fn identity(&self) -> Identity {
        Identity {
            role: self.role(),
            subject_id: self.subject_id(),
            email: self.email(),
            expires_at: self.expires_at(),
        }
    }
}

// 多角色時 .NET 會輸出陣列，取第一個
fn claim_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.iter().find_map(claim_string),
        _ => None,
    }
}

/// Decode the payload segment of a compact `header.payload.signature` token.
///
/// Returns `None` for anything that is not three segments with a base64
/// (url-safe or standard, padding optional) JSON object in the middle.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };

    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .or_else(|_| STANDARD_LENIENT.decode(payload))
        .ok()?;

    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(claims) => Some(TokenClaims { claims }),
        _ => None,
    }
}

/// Map an optional token to a session state as of `now`.
pub fn resolve(token: Option<&str>, now: DateTime<Utc>) -> SessionState {
    let Some(claims) = token.and_then(decode_claims) else {
        return SessionState::Anonymous;
    };

    match claims.expiry() {
        Err(()) => SessionState::Anonymous,
        Ok(Some(expires_at)) if expires_at <= now => SessionState::Anonymous,
        Ok(_) => SessionState::Authenticated(claims.identity()),
    }
}

#[derive(Debug)]
struct SessionInner {
    token: Option<String>,
    state: SessionState,
}

impl SessionInner {
    fn anonymous() -> Self {
        Self {
            token: None,
            state: SessionState::Anonymous,
        }
    }
}

/// Two-state session (`Anonymous` / `Authenticated`) backed by a token store.
pub struct SessionManager<S: TokenStore> {
    store: S,
    inner: Mutex<SessionInner>,
}

impl<S: TokenStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            inner: Mutex::new(SessionInner::anonymous()),
        }
    }

    /// 從存儲載入先前的 token；過期或無法解析的 token 會被丟棄
    pub fn restore(store: S) -> Result<Self> {
        let manager = Self::new(store);
        if let Some(token) = manager.store.load()? {
            match resolve(Some(token.as_str()), Utc::now()) {
                SessionState::Anonymous => {
                    tracing::info!("Discarding stored token: invalid or expired");
                    manager.store.clear()?;
                }
                state => {
                    tracing::debug!("Restored session from token store");
                    *manager.lock() = SessionInner {
                        token: Some(token),
                        state,
                    };
                }
            }
        }
        Ok(manager)
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adopt the token from a login or register response.
    pub fn establish(&self, token: &str) -> Result<Identity> {
        let identity = match resolve(Some(token), Utc::now()) {
            SessionState::Authenticated(identity) => identity,
            SessionState::Anonymous => {
                return Err(SupportError::validation(
                    "The server returned a token that could not be read",
                ))
            }
        };

        let mut inner = self.lock();
        self.store.save(token)?;
        *inner = SessionInner {
            token: Some(token.to_string()),
            state: SessionState::Authenticated(identity.clone()),
        };
        tracing::info!(
            role = identity.role.as_ref().map(Role::as_str).unwrap_or("none"),
            "Session established"
        );
        Ok(identity)
    }

    pub fn logout(&self) -> Result<()> {
        let mut inner = self.lock();
        *inner = SessionInner::anonymous();
        self.store.clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Drop the session after the server answered 401.
    ///
    /// Returns `true` if this call moved the session to `Anonymous`, `false`
    /// if it was already anonymous.
    pub fn invalidate(&self) -> Result<bool> {
        let mut inner = self.lock();
        if !inner.state.is_authenticated() {
            return Ok(false);
        }
        *inner = SessionInner::anonymous();
        tracing::warn!("Session invalidated after 401 response");
        self.store.clear()?;
        Ok(true)
    }

    fn expire_if_due(&self, inner: &mut SessionInner) {
        let expired = inner
            .state
            .identity()
            .and_then(|identity| identity.expires_at)
            .is_some_and(|expires_at| expires_at <= Utc::now());
        if expired {
            *inner = SessionInner::anonymous();
            tracing::info!("Session expired");
            if let Err(e) = self.store.clear() {
                tracing::warn!("Failed to clear expired token: {}", e);
            }
        }
    }

    pub fn state(&self) -> SessionState {
        let mut inner = self.lock();
        self.expire_if_due(&mut inner);
        inner.state.clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state().identity().cloned()
    }

    /// Token to send as `Authorization: Bearer`, only while authenticated.
    pub fn bearer_token(&self) -> Option<String> {
        let mut inner = self.lock();
        self.expire_if_due(&mut inner);
        inner.token.clone()
    }
}
