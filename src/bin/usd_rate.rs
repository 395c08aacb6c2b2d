use anyhow::Context;
use asllpay_bot::config::DEFAULT_RATES_ENDPOINT;
use asllpay_bot::domain::ports::RateSource;
use asllpay_bot::BrsRateClient;
use clap::Parser;

/// 手動敲一次匯率 API，部署前檢查線路用
#[derive(Parser)]
#[command(name = "usd-rate")]
#[command(about = "Fetch the current USD quote from the market feed")]
struct Args {
    #[arg(long, default_value = DEFAULT_RATES_ENDPOINT)]
    endpoint: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    println!("🚀 Querying {}", args.endpoint);

    let client = BrsRateClient::new(&args.endpoint);
    let quote = client
        .usd_quote()
        .await
        .context("USD quote lookup failed")?;

    println!(
        "USD: {} {} (تاریخ: {}، ساعت: {})",
        quote.price_display(),
        quote.unit,
        quote.date,
        quote.time
    );
    println!("  name: {} / {}", quote.name, quote.name_en);

    Ok(())
}
