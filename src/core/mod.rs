pub mod access;
pub mod client;
pub mod session;

pub use crate::domain::model::{Identity, Role, SessionState};
pub use crate::domain::ports::{ConfigProvider, TokenStore};
pub use crate::utils::error::Result;
