use crate::domain::model::UsdQuote;
use crate::domain::ports::RateSource;
use crate::utils::error::{BotError, Result};
use async_trait::async_trait;
use std::time::Duration;

// 不帶瀏覽器 UA 會被來源站的防火牆擋下
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/118.0.0.0 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: u32 = 3;
const RETRIABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// brsapi.ir 市場資料的客戶端，失敗時指數退避重試
pub struct BrsRateClient {
    client: reqwest::Client,
    endpoint: String,
    backoff_base: Duration,
}

impl BrsRateClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            backoff_base: Duration::from_secs(1),
        }
    }

    /// 測試用：縮短退避間隔
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    async fn fetch_feed(&self) -> Result<serde_json::Value> {
        let mut attempt: u32 = 0;

        loop {
            let outcome = self
                .client
                .get(&self.endpoint)
                .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
                .timeout(REQUEST_TIMEOUT)
                .send()
                .await;

            match outcome {
                Err(e) => {
                    if attempt >= MAX_RETRIES {
                        return Err(e.into());
                    }
                    tracing::warn!("⚠️ Rate feed request failed ({}), retrying", e);
                }
                Ok(response) => {
                    let status = response.status().as_u16();

                    if status == 403 {
                        // 403 重試也沒用，多半是 IP 或 UA 被封鎖
                        return Err(BotError::RateForbidden);
                    }

                    if RETRIABLE_STATUSES.contains(&status) {
                        if attempt >= MAX_RETRIES {
                            return Err(BotError::RateStatus {
                                status,
                                body: truncate(&response.text().await.unwrap_or_default(), 500),
                            });
                        }
                        tracing::warn!("⚠️ Rate feed returned {}, retrying", status);
                    } else if !(200..300).contains(&status) {
                        return Err(BotError::RateStatus {
                            status,
                            body: truncate(&response.text().await.unwrap_or_default(), 500),
                        });
                    } else {
                        let text = response.text().await?;
                        return Ok(serde_json::from_str(&text)?);
                    }
                }
            }

            attempt += 1;
            tokio::time::sleep(self.backoff_base * 2u32.pow(attempt - 1)).await;
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// 從市場資料裡挑出美元：先比對 symbol，再退而求其次比對名稱
pub fn extract_usd(feed: &serde_json::Value) -> Result<UsdQuote> {
    let empty = Vec::new();
    let currencies = feed
        .get("currency")
        .and_then(|v| v.as_array())
        .unwrap_or(&empty);

    let by_symbol = currencies
        .iter()
        .find(|item| item.get("symbol").and_then(|s| s.as_str()) == Some("USD"));

    let usd = by_symbol.or_else(|| {
        currencies.iter().find(|item| {
            let name_en = item
                .get("name_en")
                .and_then(|s| s.as_str())
                .unwrap_or_default();
            let name = item.get("name").and_then(|s| s.as_str()).unwrap_or_default();
            name_en.to_lowercase().starts_with("us") || name.contains("دلار")
        })
    });

    let usd = usd.ok_or_else(|| BotError::UsdNotFound {
        available_symbols: currencies
            .iter()
            .filter_map(|item| item.get("symbol").and_then(|s| s.as_str()))
            .map(|s| s.to_string())
            .collect(),
    })?;

    let price_field = usd.get("price").cloned().unwrap_or(serde_json::Value::Null);
    let price = match &price_field {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| BotError::InvalidPrice {
        raw: price_field.to_string(),
    })?;

    let text = |key: &str| {
        usd.get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    Ok(UsdQuote {
        symbol: text("symbol"),
        name: text("name"),
        name_en: text("name_en"),
        price,
        unit: text("unit"),
        date: text("date"),
        time: text("time"),
    })
}

#[async_trait]
impl RateSource for BrsRateClient {
    async fn usd_quote(&self) -> Result<UsdQuote> {
        let feed = self.fetch_feed().await?;
        extract_usd(&feed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn sample_feed() -> serde_json::Value {
        serde_json::json!({
            "currency": [
                {"symbol": "EUR", "name": "یورو", "name_en": "Euro", "price": 1300000, "unit": "تومان", "date": "1404/05/13", "time": "12:00"},
                {"symbol": "USD", "name": "دلار", "name_en": "US Dollar", "price": "1112400", "unit": "تومان", "date": "1404/05/13", "time": "12:30"}
            ]
        })
    }

    #[test]
    fn test_extract_usd_by_symbol() {
        let quote = extract_usd(&sample_feed()).unwrap();
        assert_eq!(quote.symbol, "USD");
        assert_eq!(quote.price, 1_112_400.0);
        assert_eq!(quote.unit, "تومان");
    }

    #[test]
    fn test_extract_usd_fallback_by_name_en() {
        let feed = serde_json::json!({
            "currency": [
                {"symbol": "DLR", "name": "?", "name_en": "US Dollar", "price": 99.0}
            ]
        });
        let quote = extract_usd(&feed).unwrap();
        assert_eq!(quote.symbol, "DLR");
        assert_eq!(quote.price, 99.0);
    }

    #[test]
    fn test_extract_usd_fallback_by_persian_name() {
        let feed = serde_json::json!({
            "currency": [
                {"symbol": "XYZ", "name": "دلار آمریکا", "name_en": "", "price": 5}
            ]
        });
        assert!(extract_usd(&feed).is_ok());
    }

    #[test]
    fn test_extract_usd_not_found_reports_symbols() {
        let feed = serde_json::json!({
            "currency": [
                {"symbol": "EUR", "name_en": "Euro", "price": 1},
                {"symbol": "GBP", "name_en": "Pound", "price": 2}
            ]
        });
        match extract_usd(&feed).unwrap_err() {
            BotError::UsdNotFound { available_symbols } => {
                assert_eq!(available_symbols, vec!["EUR", "GBP"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_extract_usd_invalid_price() {
        let feed = serde_json::json!({
            "currency": [{"symbol": "USD", "price": "N/A"}]
        });
        match extract_usd(&feed).unwrap_err() {
            BotError::InvalidPrice { raw } => assert!(raw.contains("N/A")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_usd_quote_happy_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/feed");
            then.status(200).json_body(sample_feed());
        });

        let client = BrsRateClient::new(&server.url("/feed"));
        let quote = client.usd_quote().await.unwrap();

        mock.assert();
        assert_eq!(quote.symbol, "USD");
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_then_reported() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/feed");
            then.status(503).body("unavailable");
        });

        let client = BrsRateClient::new(&server.url("/feed"))
            .with_backoff_base(Duration::from_millis(10));
        let err = client.usd_quote().await.unwrap_err();

        // 初次嘗試 + 三次重試
        assert_eq!(mock.hits(), 4);
        match err {
            BotError::RateStatus { status: 503, .. } => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_forbidden_is_not_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/feed");
            then.status(403);
        });

        let client = BrsRateClient::new(&server.url("/feed"))
            .with_backoff_base(Duration::from_millis(10));
        let err = client.usd_quote().await.unwrap_err();

        assert_eq!(mock.hits(), 1);
        assert!(matches!(err, BotError::RateForbidden));
    }

    #[tokio::test]
    async fn test_browser_user_agent_is_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/feed")
                .header("user-agent", BROWSER_USER_AGENT);
            then.status(200).json_body(sample_feed());
        });

        let client = BrsRateClient::new(&server.url("/feed"));
        client.usd_quote().await.unwrap();
        mock.assert();
    }
}
