use crate::utils::error::{BotError, Result};
use regex::Regex;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(BotError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(BotError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(BotError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

// BotFather 發的 token 格式：<bot id>:<35 碼以上的 URL-safe 秘密>
pub fn validate_bot_token(field_name: &str, token: &str) -> Result<()> {
    let re = Regex::new(r"^\d+:[A-Za-z0-9_-]{30,}$").unwrap();
    if re.is_match(token) {
        Ok(())
    } else {
        // 不把 token 本身寫進錯誤訊息
        Err(BotError::InvalidConfigValue {
            field: field_name.to_string(),
            value: "<redacted>".to_string(),
            reason: "Token does not look like '<bot id>:<secret>'".to_string(),
        })
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BotError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BotError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BotError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BotError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api_root", "https://api.telegram.org").is_ok());
        assert!(validate_url("api_root", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("api_root", "").is_err());
        assert!(validate_url("api_root", "not-a-url").is_err());
        assert!(validate_url("api_root", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_bot_token() {
        assert!(validate_bot_token(
            "bot.token",
            "8182446297:AAFVGVfi12xhxDaqxpUPkHPPTxy5A5Cnmz4"
        )
        .is_ok());
        assert!(validate_bot_token("bot.token", "").is_err());
        assert!(validate_bot_token("bot.token", "no-colon-here").is_err());
        assert!(validate_bot_token("bot.token", "123:tooshort").is_err());
    }

    #[test]
    fn test_validate_bot_token_does_not_leak_token() {
        let err = validate_bot_token("bot.token", "123:badtoken").unwrap_err();
        assert!(!err.to_string().contains("badtoken"));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("polling.timeout_seconds", 30u64, 1, 60).is_ok());
        assert!(validate_range("polling.timeout_seconds", 0u64, 1, 60).is_err());
        assert!(validate_range("polling.timeout_seconds", 90u64, 1, 60).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("resources.dir", "./resources").is_ok());
        assert!(validate_non_empty_string("resources.dir", "   ").is_err());
    }
}
