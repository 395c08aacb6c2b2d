pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{BotError, Result};
use crate::utils::validation::{
    self, validate_bot_token, validate_non_empty_string, validate_range, validate_url, Validate,
};
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

pub const TOKEN_ENV_VAR: &str = "ASLLPAY_BOT_TOKEN";

pub const DEFAULT_API_ROOT: &str = "https://api.telegram.org";
pub const DEFAULT_RATES_ENDPOINT: &str = "https://brsapi.ir/Api/Market/Gold_Currency.php";

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "asllpay-bot")]
#[command(about = "Asll Pay Telegram services-menu bot")]
pub struct CliConfig {
    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<String>,

    /// Bot token (overrides TOML and the ASLLPAY_BOT_TOKEN env var)
    #[arg(long)]
    pub token: Option<String>,

    #[arg(long, default_value = DEFAULT_API_ROOT)]
    pub api_root: String,

    #[arg(long, default_value = DEFAULT_RATES_ENDPOINT)]
    pub rates_endpoint: String,

    #[arg(long, default_value = "./resources")]
    pub resources_dir: String,

    /// Long-poll timeout handed to getUpdates
    #[arg(long, default_value = "30")]
    pub poll_timeout_seconds: u64,

    /// Refresh interval for screens with live content
    #[arg(long, default_value = "300")]
    pub refresh_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON (for container log collectors)")]
    pub log_json: bool,

    #[arg(long, help = "Log process stats while polling")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併 CLI、TOML 與環境變數。優先序：
    /// --token > TOML > 環境變數；其他欄位 TOML（有給才算）> CLI。
    pub fn resolve(self) -> Result<ResolvedConfig> {
        let toml = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        let token = self
            .token
            .or_else(|| toml.token().map(|t| t.to_string()))
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
            .ok_or_else(|| BotError::MissingConfig {
                field: "bot.token".to_string(),
            })?;

        Ok(ResolvedConfig {
            token,
            api_root: toml
                .api_root()
                .map(|v| v.to_string())
                .unwrap_or(self.api_root),
            rates_endpoint: toml
                .rates_endpoint()
                .map(|v| v.to_string())
                .unwrap_or(self.rates_endpoint),
            resources_dir: toml
                .resources_dir()
                .map(|v| v.to_string())
                .unwrap_or(self.resources_dir),
            poll_timeout_seconds: toml
                .poll_timeout_seconds()
                .unwrap_or(self.poll_timeout_seconds),
            refresh_seconds: toml.refresh_seconds().unwrap_or(self.refresh_seconds),
        })
    }
}

/// 啟動時就定案的完整配置
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub token: String,
    pub api_root: String,
    pub rates_endpoint: String,
    pub resources_dir: String,
    pub poll_timeout_seconds: u64,
    pub refresh_seconds: u64,
}

impl ConfigProvider for ResolvedConfig {
    fn token(&self) -> &str {
        &self.token
    }

    fn api_root(&self) -> &str {
        &self.api_root
    }

    fn rates_endpoint(&self) -> &str {
        &self.rates_endpoint
    }

    fn resources_dir(&self) -> &str {
        &self.resources_dir
    }

    fn poll_timeout_seconds(&self) -> u64 {
        self.poll_timeout_seconds
    }

    fn refresh_seconds(&self) -> u64 {
        self.refresh_seconds
    }
}

impl Validate for ResolvedConfig {
    fn validate(&self) -> Result<()> {
        validate_bot_token("bot.token", &self.token)?;
        validate_url("bot.api_root", &self.api_root)?;
        validate_url("rates.endpoint", &self.rates_endpoint)?;
        validation::validate_path("resources.dir", &self.resources_dir)?;
        validate_non_empty_string("resources.dir", &self.resources_dir)?;
        validate_range(
            "polling.timeout_seconds",
            self.poll_timeout_seconds,
            1,
            60,
        )?;
        validate_range("polling.refresh_seconds", self.refresh_seconds, 5, 86_400)?;
        Ok(())
    }
}
