use crate::domain::model::{
    BotProfile, ChatId, IncomingMessage, MessageId, OutgoingMessage,
};
use crate::domain::ports::BotApi;
use crate::utils::error::{BotError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 一般 API 呼叫的逾時；長輪詢另外加上 polling timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUpdate {
    update_id: i64,
    message: Option<WireMessage>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    message_id: i64,
    chat: WireChat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: i64,
    first_name: String,
    username: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReplyKeyboardMarkup {
    keyboard: Vec<Vec<KeyboardButton>>,
    resize_keyboard: bool,
}

#[derive(Debug, Serialize)]
struct KeyboardButton {
    text: String,
}

/// reqwest 實作的 Bot API 客戶端。base URL 可改接測試用的 mock server。
pub struct TelegramApi {
    client: reqwest::Client,
    base: String,
}

impl TelegramApi {
    pub fn new(api_root: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: format!("{}/bot{}", api_root.trim_end_matches('/'), token),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: serde_json::Value,
        timeout: Duration,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base, method);
        tracing::trace!("POST {}", method);

        // Telegram 在業務錯誤時也可能回 4xx，所以不看 HTTP status，直接解 envelope
        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(&payload)
            .send()
            .await?;

        let envelope: ApiEnvelope<T> = serde_json::from_slice(&response.bytes().await?)?;

        if envelope.ok {
            envelope.result.ok_or_else(|| BotError::Telegram {
                method: method.to_string(),
                code: 0,
                description: "ok envelope without result".to_string(),
            })
        } else {
            Err(BotError::Telegram {
                method: method.to_string(),
                code: envelope.error_code.unwrap_or(0),
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            })
        }
    }
}

fn to_incoming(update: WireUpdate) -> IncomingMessage {
    match update.message {
        Some(message) => IncomingMessage {
            update_id: update.update_id,
            chat_id: message.chat.id,
            text: message.text,
        },
        // 沒有 message 的 update 仍要回報，讓 session 推進 offset
        None => IncomingMessage {
            update_id: update.update_id,
            chat_id: 0,
            text: None,
        },
    }
}

#[async_trait]
impl BotApi for TelegramApi {
    async fn get_me(&self) -> Result<BotProfile> {
        let user: WireUser = self
            .call("getMe", serde_json::json!({}), REQUEST_TIMEOUT)
            .await?;
        Ok(BotProfile {
            id: user.id,
            username: user.username.unwrap_or_default(),
            first_name: user.first_name,
        })
    }

    async fn get_updates(&self, offset: i64, timeout_seconds: u64) -> Result<Vec<IncomingMessage>> {
        let payload = serde_json::json!({
            "offset": offset,
            "timeout": timeout_seconds,
            "allowed_updates": ["message"],
        });
        let updates: Vec<WireUpdate> = self
            .call(
                "getUpdates",
                payload,
                REQUEST_TIMEOUT + Duration::from_secs(timeout_seconds),
            )
            .await?;
        Ok(updates.into_iter().map(to_incoming).collect())
    }

    async fn send_message(&self, chat_id: ChatId, message: &OutgoingMessage) -> Result<MessageId> {
        let mut payload = serde_json::json!({
            "chat_id": chat_id,
            "text": message.text,
            "parse_mode": "HTML",
            "disable_notification": message.silent,
        });
        if let Some(rows) = &message.keyboard {
            let markup = ReplyKeyboardMarkup {
                keyboard: rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|label| KeyboardButton {
                                text: label.clone(),
                            })
                            .collect()
                    })
                    .collect(),
                resize_keyboard: true,
            };
            payload["reply_markup"] = serde_json::to_value(markup)?;
        }

        let sent: WireMessage = self.call("sendMessage", payload, REQUEST_TIMEOUT).await?;
        Ok(sent.message_id)
    }

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<()> {
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
            "parse_mode": "HTML",
        });
        let _: serde_json::Value = self
            .call("editMessageText", payload, REQUEST_TIMEOUT)
            .await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });
        let _: bool = self.call("deleteMessage", payload, REQUEST_TIMEOUT).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const TEST_TOKEN: &str = "123456:TESTTOKEN-aaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    fn api_for(server: &MockServer) -> TelegramApi {
        TelegramApi::new(&server.base_url(), TEST_TOKEN)
    }

    #[tokio::test]
    async fn test_get_me_parses_profile() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(format!("/bot{}/getMe", TEST_TOKEN));
            then.status(200).json_body(serde_json::json!({
                "ok": true,
                "result": {"id": 8182446297i64, "is_bot": true, "first_name": "AsllPay", "username": "AsllPayBot"}
            }));
        });

        let profile = api_for(&server).get_me().await.unwrap();

        mock.assert();
        assert_eq!(profile.id, 8182446297);
        assert_eq!(profile.username, "AsllPayBot");
    }

    #[tokio::test]
    async fn test_get_me_unauthorized() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path(format!("/bot{}/getMe", TEST_TOKEN));
            then.status(401).json_body(serde_json::json!({
                "ok": false,
                "error_code": 401,
                "description": "Unauthorized"
            }));
        });

        let err = api_for(&server).get_me().await.unwrap_err();

        match err {
            BotError::Telegram { code, description, .. } => {
                assert_eq!(code, 401);
                assert_eq!(description, "Unauthorized");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_updates_maps_messages() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path(format!("/bot{}/getUpdates", TEST_TOKEN))
                .json_body_partial(r#"{"offset": 7}"#);
            then.status(200).json_body(serde_json::json!({
                "ok": true,
                "result": [
                    {"update_id": 7, "message": {"message_id": 100, "chat": {"id": 42}, "text": "/start"}},
                    {"update_id": 8, "message": {"message_id": 101, "chat": {"id": 42}}},
                    {"update_id": 9}
                ]
            }));
        });

        let updates = api_for(&server).get_updates(7, 0).await.unwrap();

        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].chat_id, 42);
        assert_eq!(updates[0].text.as_deref(), Some("/start"));
        assert_eq!(updates[1].text, None);
        // message 以外的 update 也要保留 update_id
        assert_eq!(updates[2].update_id, 9);
        assert_eq!(updates[2].chat_id, 0);
    }

    #[tokio::test]
    async fn test_send_message_with_keyboard() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(format!("/bot{}/sendMessage", TEST_TOKEN))
                .json_body_partial(
                    r#"{
                        "chat_id": 42,
                        "parse_mode": "HTML",
                        "reply_markup": {"resize_keyboard": true, "keyboard": [[{"text": "A"}, {"text": "B"}]]}
                    }"#,
                );
            then.status(200).json_body(serde_json::json!({
                "ok": true,
                "result": {"message_id": 555, "chat": {"id": 42}, "text": "hello"}
            }));
        });

        let message = OutgoingMessage {
            text: "hello".to_string(),
            keyboard: Some(vec![vec!["A".to_string(), "B".to_string()]]),
            silent: true,
        };
        let message_id = api_for(&server).send_message(42, &message).await.unwrap();

        mock.assert();
        assert_eq!(message_id, 555);
    }

    #[tokio::test]
    async fn test_delete_message_ok() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(format!("/bot{}/deleteMessage", TEST_TOKEN));
            then.status(200)
                .json_body(serde_json::json!({"ok": true, "result": true}));
        });

        api_for(&server).delete_message(42, 555).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_edit_message_not_modified_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path(format!("/bot{}/editMessageText", TEST_TOKEN));
            then.status(400).json_body(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: message is not modified"
            }));
        });

        let err = api_for(&server)
            .edit_message_text(42, 555, "same")
            .await
            .unwrap_err();
        match err {
            BotError::Telegram { code: 400, .. } => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
