use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Telegram API error in {method}: [{code}] {description}")]
    Telegram {
        method: String,
        code: i64,
        description: String,
    },

    #[error("Invalid config value for {field}: {reason} (got '{value}')")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required config: {field}")]
    MissingConfig { field: String },

    #[error("Config file error: {message}")]
    ConfigParse { message: String },

    #[error("Rate service refused the request (HTTP 403)")]
    RateForbidden,

    #[error("Rate service returned unexpected status {status}")]
    RateStatus { status: u16, body: String },

    #[error("USD not found in rate feed (available: {})", available_symbols.join(", "))]
    UsdNotFound { available_symbols: Vec<String> },

    #[error("Unparseable price in rate feed: '{raw}'")]
    InvalidPrice { raw: String },
}

pub type Result<T> = std::result::Result<T, BotError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Network,
    Telegram,
    Data,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BotError::Transport(_) => ErrorCategory::Network,
            BotError::Telegram { .. } => ErrorCategory::Telegram,
            BotError::InvalidConfigValue { .. }
            | BotError::MissingConfig { .. }
            | BotError::ConfigParse { .. } => ErrorCategory::Config,
            BotError::Serialization(_)
            | BotError::UsdNotFound { .. }
            | BotError::InvalidPrice { .. } => ErrorCategory::Data,
            BotError::RateForbidden | BotError::RateStatus { .. } => ErrorCategory::Network,
            BotError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 配置錯誤無法在運行時恢復
            BotError::InvalidConfigValue { .. }
            | BotError::MissingConfig { .. }
            | BotError::ConfigParse { .. } => ErrorSeverity::Critical,

            // 憑證問題視同配置錯誤
            BotError::Telegram { code: 401, .. } | BotError::Telegram { code: 404, .. } => {
                ErrorSeverity::Critical
            }
            BotError::Telegram { code: 429, .. } => ErrorSeverity::Medium,
            BotError::Telegram { .. } => ErrorSeverity::High,

            // 網路層問題通常重試即可
            BotError::Transport(_) => ErrorSeverity::Medium,
            BotError::RateStatus { status, .. } if *status >= 500 || *status == 429 => {
                ErrorSeverity::Medium
            }
            BotError::RateStatus { .. } | BotError::RateForbidden => ErrorSeverity::High,

            BotError::Serialization(_)
            | BotError::UsdNotFound { .. }
            | BotError::InvalidPrice { .. } => ErrorSeverity::High,

            BotError::IoError(_) => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BotError::Transport(_) => {
                "Network request failed, Telegram may be unreachable".to_string()
            }
            BotError::Telegram { code: 401, .. } => "Telegram rejected the bot token".to_string(),
            BotError::Telegram {
                method,
                description,
                ..
            } => format!("Telegram refused {}: {}", method, description),
            BotError::InvalidConfigValue { field, reason, .. } => {
                format!("Config field '{}' is invalid: {}", field, reason)
            }
            BotError::MissingConfig { field } => format!("Config field '{}' is not set", field),
            BotError::ConfigParse { message } => {
                format!("Config file could not be read: {}", message)
            }
            BotError::RateForbidden => "Rate feed blocked the request (403)".to_string(),
            BotError::UsdNotFound { .. } => "Rate feed did not contain a USD entry".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            BotError::Transport(_) | BotError::RateStatus { .. } => {
                "Check network connectivity and retry".to_string()
            }
            BotError::Telegram { code: 401, .. } => {
                "Verify ASLLPAY_BOT_TOKEN matches the token issued by @BotFather".to_string()
            }
            BotError::Telegram { code: 429, .. } => {
                "Slow down: wait for the rate limit window to pass".to_string()
            }
            BotError::Telegram { .. } => {
                "Check the request parameters and bot permissions".to_string()
            }
            BotError::InvalidConfigValue { field, .. } | BotError::MissingConfig { field } => {
                format!("Fix '{}' on the command line or in the TOML config", field)
            }
            BotError::ConfigParse { .. } => {
                "Make sure the config file exists and is valid TOML".to_string()
            }
            BotError::RateForbidden => {
                "The feed may have blocked this IP or User-Agent; try another key or host"
                    .to_string()
            }
            BotError::UsdNotFound { available_symbols } => format!(
                "Feed schema may have changed; symbols seen: {}",
                available_symbols.join(", ")
            ),
            BotError::InvalidPrice { .. } => {
                "Feed schema may have changed; inspect the raw payload".to_string()
            }
            BotError::Serialization(_) => "Inspect the raw payload for schema drift".to_string(),
            BotError::IoError(_) => "Check file paths and permissions".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_critical() {
        let err = BotError::MissingConfig {
            field: "bot.token".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Config);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_auth_failure_is_critical() {
        let err = BotError::Telegram {
            method: "getMe".to_string(),
            code: 401,
            description: "Unauthorized".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("token"));
    }

    #[test]
    fn test_rate_limit_is_retriable() {
        let err = BotError::Telegram {
            method: "sendMessage".to_string(),
            code: 429,
            description: "Too Many Requests".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_server_error_from_rate_feed_is_retriable() {
        let err = BotError::RateStatus {
            status: 503,
            body: String::new(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);

        let err = BotError::RateStatus {
            status: 418,
            body: String::new(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_usd_not_found_lists_symbols() {
        let err = BotError::UsdNotFound {
            available_symbols: vec!["EUR".to_string(), "GBP".to_string()],
        };
        assert!(err.to_string().contains("EUR, GBP"));
        assert_eq!(err.category(), ErrorCategory::Data);
    }
}
