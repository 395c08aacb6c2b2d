use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// 預設過濾器：壓低 hyper/reqwest 的雜訊，只看自己的包
fn default_filter(verbose: bool) -> EnvFilter {
    let directives = if verbose {
        "asllpay_bot=debug,hyper=warn,reqwest=warn,info"
    } else {
        "asllpay_bot=info,hyper=warn,reqwest=warn,warn"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_container_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(), // 容器環境輸出 JSON，方便日誌收集器解析
        )
        .init();
}
