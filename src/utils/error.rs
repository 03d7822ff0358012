use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Session rejected by the server (401)")]
    Unauthorized,

    #[error("Action '{action}' is not available to this role")]
    Forbidden { action: String },

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, SupportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Session,
    Configuration,
    Input,
    Server,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SupportError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_) => ErrorCategory::Network,
            Self::NotAuthenticated | Self::Unauthorized | Self::Forbidden { .. } => {
                ErrorCategory::Session
            }
            Self::Config { .. } | Self::InvalidConfigValue { .. } | Self::MissingConfig { .. } => {
                ErrorCategory::Configuration
            }
            Self::Validation { .. } => ErrorCategory::Input,
            Self::Api { .. } | Self::Serialization(_) => ErrorCategory::Server,
            Self::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation { .. } | Self::Forbidden { .. } => ErrorSeverity::Low,
            Self::Http(_) | Self::Api { .. } | Self::Unauthorized | Self::NotAuthenticated => {
                ErrorSeverity::Medium
            }
            Self::Config { .. }
            | Self::InvalidConfigValue { .. }
            | Self::MissingConfig { .. }
            | Self::Serialization(_) => ErrorSeverity::High,
            Self::Io(_) => ErrorSeverity::Critical,
        }
    }

    /// 顯示給使用者的單行訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => "The support service did not answer in time.".to_string(),
            Self::Http(_) => "Could not reach the support service.".to_string(),
            Self::NotAuthenticated => "You are not logged in.".to_string(),
            Self::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            Self::Forbidden { action } => format!("Your role cannot {}.", action),
            Self::Validation { message } => message.clone(),
            Self::Api { status, .. } => format!("The request failed (HTTP {}).", status),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the API URL and your network connection, then try again.",
            ErrorCategory::Session => "Run `dern-support login` to start a new session.",
            ErrorCategory::Configuration => "Check --api-url, DERN_API_URL or the TOML config file.",
            ErrorCategory::Input => "Correct the highlighted input and submit again.",
            ErrorCategory::Server => "Try again later or contact an administrator.",
            ErrorCategory::System => "Check file permissions for the session file.",
        }
    }
}
