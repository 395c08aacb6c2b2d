use chrono::{DateTime, Duration, Utc};

pub type ChatId = i64;
pub type MessageId = i64;

/// 詳情訊息的存活秒數（到期自動刪除）
pub const DETAILS_EXPIRY_SECONDS: i64 = 5;
/// 一般通知訊息的存活秒數
pub const NOTIFY_EXPIRY_SECONDS: i64 = 10;

/// 一項可販售的服務（禮品卡、帳號開通、外幣代付……）
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub title: String,
    pub description: String,
    pub details: String,
    pub price_hint: String,
}

impl Product {
    pub fn new(title: &str, description: &str, details: &str, price_hint: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            details: details.to_string(),
            price_hint: price_hint.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonAction {
    /// 切換到指定 label 的畫面
    Screen(String),
    Back,
    Home,
    /// 回覆一則限時通知
    Notify(String),
    /// 對指定商品下單
    Order(String),
    /// 顯示指定商品的詳情（限時訊息）
    Details(String),
    /// 查詢即時美元匯率
    UsdRate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuButton {
    pub label: String,
    pub action: ButtonAction,
}

impl MenuButton {
    pub fn screen(label: &str) -> Self {
        Self {
            label: label.to_string(),
            action: ButtonAction::Screen(label.to_string()),
        }
    }

    pub fn back() -> Self {
        Self {
            label: "⬅️ بازگشت".to_string(),
            action: ButtonAction::Back,
        }
    }

    pub fn home() -> Self {
        Self {
            label: "🏠 خانه".to_string(),
            action: ButtonAction::Home,
        }
    }

    pub fn notify(label: &str, text: &str) -> Self {
        Self {
            label: label.to_string(),
            action: ButtonAction::Notify(text.to_string()),
        }
    }
}

/// 要送出的訊息：內容 + 選單鍵盤
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutgoingMessage {
    pub text: String,
    /// reply keyboard 的按鍵列；None 表示不更換鍵盤
    pub keyboard: Option<Vec<Vec<String>>>,
    pub silent: bool,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            silent: false,
        }
    }
}

/// 長輪詢收到的一則文字訊息（其他 update 種類在轉接層就被過濾掉）
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    pub update_id: i64,
    pub chat_id: ChatId,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BotProfile {
    pub id: i64,
    pub username: String,
    pub first_name: String,
}

/// brsapi 市場資料中的美元報價
#[derive(Debug, Clone, PartialEq)]
pub struct UsdQuote {
    pub symbol: String,
    pub name: String,
    pub name_en: String,
    pub price: f64,
    pub unit: String,
    pub date: String,
    pub time: String,
}

impl UsdQuote {
    /// 整數價格不顯示小數位
    pub fn price_display(&self) -> String {
        if self.price.fract() == 0.0 {
            format!("{}", self.price as i64)
        } else {
            format!("{}", self.price)
        }
    }
}

/// 已送出、等到期要刪除的訊息
#[derive(Debug, Clone)]
pub struct ExpiringMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub expires_at: DateTime<Utc>,
}

impl ExpiringMessage {
    pub fn new(chat_id: ChatId, message_id: MessageId, ttl_seconds: i64) -> Self {
        Self {
            chat_id,
            message_id,
            expires_at: Utc::now() + Duration::seconds(ttl_seconds),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// 把按鍵 label 排成每列 per_row 個的鍵盤
pub fn keyboard_rows(labels: &[String], per_row: usize) -> Vec<Vec<String>> {
    labels
        .chunks(per_row.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_rows_chunking() {
        let labels: Vec<String> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = keyboard_rows(&labels, 2);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["a", "b"]);
        assert_eq!(rows[2], vec!["e"]);
    }

    #[test]
    fn test_keyboard_rows_zero_per_row_does_not_panic() {
        let labels = vec!["a".to_string()];
        let rows = keyboard_rows(&labels, 0);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_price_display_trims_integral() {
        let mut quote = UsdQuote {
            symbol: "USD".to_string(),
            name: "دلار".to_string(),
            name_en: "US Dollar".to_string(),
            price: 1_112_400.0,
            unit: "تومان".to_string(),
            date: "1404/05/13".to_string(),
            time: "12:30".to_string(),
        };
        assert_eq!(quote.price_display(), "1112400");

        quote.price = 42.5;
        assert_eq!(quote.price_display(), "42.5");
    }

    #[test]
    fn test_expiring_message_deadline() {
        let msg = ExpiringMessage::new(1, 2, 5);
        assert!(!msg.is_expired(Utc::now()));
        assert!(msg.is_expired(Utc::now() + Duration::seconds(6)));
    }
}
