use crate::domain::model::{
    BotProfile, ChatId, IncomingMessage, MenuButton, MessageId, OutgoingMessage, UsdQuote,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Telegram Bot API 中會用到的那幾個方法
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn get_me(&self) -> Result<BotProfile>;

    /// 長輪詢：回傳 offset 之後的文字訊息
    async fn get_updates(&self, offset: i64, timeout_seconds: u64) -> Result<Vec<IncomingMessage>>;

    async fn send_message(&self, chat_id: ChatId, message: &OutgoingMessage) -> Result<MessageId>;

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<()>;

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()>;
}

/// 即時匯率來源
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn usd_quote(&self) -> Result<UsdQuote>;
}

/// 一個選單畫面：標題（也是 reply keyboard 上的 label）、內文、按鍵
#[async_trait]
pub trait MenuScreen: Send + Sync {
    fn label(&self) -> &str;

    /// 訊息內文（HTML）。動態畫面每次呼叫都可能不同。
    async fn body(&self) -> Result<String>;

    fn buttons(&self) -> Vec<MenuButton>;

    /// 送出時不發出提示音
    fn silent(&self) -> bool {
        false
    }

    /// 內文會隨時間變化，需要定期重繪
    fn dynamic(&self) -> bool {
        false
    }
}

pub trait ConfigProvider: Send + Sync {
    fn token(&self) -> &str;
    fn api_root(&self) -> &str;
    fn rates_endpoint(&self) -> &str;
    fn resources_dir(&self) -> &str;
    fn poll_timeout_seconds(&self) -> u64;
    fn refresh_seconds(&self) -> u64;
}
