use crate::utils::error::{BotError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bot: Option<BotSection>,
    pub polling: Option<PollingSection>,
    pub rates: Option<RatesSection>,
    pub resources: Option<ResourcesSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotSection {
    pub token: Option<String>,
    pub api_root: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollingSection {
    pub timeout_seconds: Option<u64>,
    pub refresh_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatesSection {
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcesSection {
    pub dir: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BotError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BotError::ConfigParse {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.bot.as_ref().and_then(|b| b.token.as_deref())
    }

    pub fn api_root(&self) -> Option<&str> {
        self.bot.as_ref().and_then(|b| b.api_root.as_deref())
    }

    pub fn poll_timeout_seconds(&self) -> Option<u64> {
        self.polling.as_ref().and_then(|p| p.timeout_seconds)
    }

    pub fn refresh_seconds(&self) -> Option<u64> {
        self.polling.as_ref().and_then(|p| p.refresh_seconds)
    }

    pub fn rates_endpoint(&self) -> Option<&str> {
        self.rates.as_ref().and_then(|r| r.endpoint.as_deref())
    }

    pub fn resources_dir(&self) -> Option<&str> {
        self.resources.as_ref().and_then(|r| r.dir.as_deref())
    }
}

/// 替換環境變數 (例如 ${ASLLPAY_BOT_TOKEN})；查不到的變數保留原樣
fn substitute_env_vars(content: &str) -> String {
    use regex::Regex;
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_config() {
        let toml_content = r#"
[bot]
token = "123456:TESTTOKEN-aaaaaaaaaaaaaaaaaaaaaaaaaaaa"

[polling]
timeout_seconds = 20
refresh_seconds = 120

[rates]
endpoint = "https://brsapi.ir/Api/Market/Gold_Currency.php?key=abc"

[resources]
dir = "./resources"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.token(),
            Some("123456:TESTTOKEN-aaaaaaaaaaaaaaaaaaaaaaaaaaaa")
        );
        assert_eq!(config.poll_timeout_seconds(), Some(20));
        assert_eq!(config.refresh_seconds(), Some(120));
        assert!(config.rates_endpoint().unwrap().contains("key=abc"));
        assert_eq!(config.api_root(), None);
    }

    #[test]
    fn test_missing_sections_are_none() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.token(), None);
        assert_eq!(config.poll_timeout_seconds(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ASLLPAY_TEST_TOKEN", "42:substituted");

        let toml_content = r#"
[bot]
token = "${ASLLPAY_TEST_TOKEN}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.token(), Some("42:substituted"));

        std::env::remove_var("ASLLPAY_TEST_TOKEN");
    }

    #[test]
    fn test_unknown_env_var_left_verbatim() {
        let toml_content = r#"
[rates]
endpoint = "https://example.com/?key=${ASLLPAY_NO_SUCH_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.rates_endpoint(),
            Some("https://example.com/?key=${ASLLPAY_NO_SUCH_VAR}")
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[bot\ntoken=").unwrap_err();
        assert!(matches!(err, BotError::ConfigParse { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[polling]
timeout_seconds = 5
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.poll_timeout_seconds(), Some(5));
    }
}
