use asllpay_bot::domain::ports::{ConfigProvider, RateSource};
use asllpay_bot::utils::{logger, validation::Validate};
use asllpay_bot::{BrsRateClient, Catalog, CliConfig, MenuRegistry, MenuSession, TelegramApi};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_container_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting asllpay-bot");
    let verbose = cli.verbose;
    let monitor_enabled = cli.monitor;

    // 合併 CLI / TOML / 環境變數並驗證，有問題就不碰網路
    let config = match cli.resolve().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration invalid: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(3);
        }
    };

    if verbose {
        tracing::debug!(
            "Resolved config: api_root={}, poll_timeout={}s, refresh={}s",
            config.api_root,
            config.poll_timeout_seconds,
            config.refresh_seconds
        );
    }
    if monitor_enabled {
        tracing::info!("🔍 Session monitoring enabled");
    }

    // 服務目錄（PayPal 文案來自 resources 目錄）
    let catalog = match Catalog::load(config.resources_dir()) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("❌ Failed to load resources: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(3);
        }
    };

    let api = TelegramApi::new(config.api_root(), config.token());
    let rates: Arc<dyn RateSource> = Arc::new(BrsRateClient::new(config.rates_endpoint()));
    let registry = MenuRegistry::build(catalog, Arc::clone(&rates));

    let mut session =
        MenuSession::new_with_monitoring(api, config, registry, rates, monitor_enabled);

    match session.run().await {
        Ok(()) => {
            tracing::info!("✅ Session ended cleanly");
        }
        Err(e) => {
            tracing::error!(
                "❌ Session failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 錯誤嚴重程度決定退出碼，容器的退出碼就是它
            let exit_code = match e.severity() {
                asllpay_bot::utils::error::ErrorSeverity::Low => 0,
                asllpay_bot::utils::error::ErrorSeverity::Medium => 2,
                asllpay_bot::utils::error::ErrorSeverity::High => 1,
                asllpay_bot::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
