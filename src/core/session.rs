use crate::app::menus::screens::{order_confirmation, MenuRegistry};
use crate::core::navigation::NavigationState;
use crate::domain::model::{
    keyboard_rows, ButtonAction, ChatId, ExpiringMessage, IncomingMessage, MessageId,
    OutgoingMessage, DETAILS_EXPIRY_SECONDS, NOTIFY_EXPIRY_SECONDS,
};
use crate::domain::ports::{BotApi, ConfigProvider, RateSource};
use crate::utils::error::{ErrorSeverity, Result};
use crate::utils::monitor::SessionMonitor;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

const KEYBOARD_COLUMNS: usize = 2;
const POLL_ERROR_PAUSE: Duration = Duration::from_secs(3);
const STATS_EVERY_BATCHES: u64 = 20;

const HINT_TEXT: &str = "لطفاً از دکمه‌های منو استفاده کنید یا /start را بزنید.";
const RATE_UNAVAILABLE_TEXT: &str =
    "نرخ لحظه‌ای فعلاً در دسترس نیست، کمی بعد دوباره امتحان کنید.";

/// 動態畫面最後一次送出的訊息，重繪時要比對內容
struct LiveMessage {
    message_id: MessageId,
    label: String,
    last_body: String,
}

struct ChatState {
    nav: NavigationState,
    live: Option<LiveMessage>,
}

impl ChatState {
    fn new(root_label: &str) -> Self {
        Self {
            nav: NavigationState::new(root_label),
            live: None,
        }
    }
}

/// 長輪詢選單引擎：收 update、走選單、掃過期訊息、重繪動態畫面
pub struct MenuSession<A: BotApi, C: ConfigProvider> {
    api: A,
    config: C,
    registry: MenuRegistry,
    rates: Arc<dyn RateSource>,
    chats: HashMap<ChatId, ChatState>,
    expiring: Vec<ExpiringMessage>,
    offset: i64,
    monitor: SessionMonitor,
    updates_seen: u64,
    messages_sent: u64,
}

impl<A: BotApi, C: ConfigProvider> MenuSession<A, C> {
    pub fn new(api: A, config: C, registry: MenuRegistry, rates: Arc<dyn RateSource>) -> Self {
        Self::new_with_monitoring(api, config, registry, rates, false)
    }

    pub fn new_with_monitoring(
        api: A,
        config: C,
        registry: MenuRegistry,
        rates: Arc<dyn RateSource>,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            api,
            config,
            registry,
            rates,
            chats: HashMap::new(),
            expiring: Vec::new(),
            offset: 0,
            monitor: SessionMonitor::new(monitor_enabled),
            updates_seen: 0,
            messages_sent: 0,
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn pending_expiry_count(&self) -> usize {
        self.expiring.len()
    }

    /// 跑到 CTRL+C 為止
    pub async fn run(&mut self) -> Result<()> {
        let profile = self.api.get_me().await?;
        tracing::info!("🤖 Logged in as @{} ({})", profile.username, profile.first_name);
        tracing::info!(" >> Start the menu session and wait forever, quit with CTRL+C...");

        let refresh_interval = Duration::from_secs(self.config.refresh_seconds());
        let mut last_refresh = Instant::now();
        let mut batches: u64 = 0;

        loop {
            let poll = self
                .api
                .get_updates(self.offset, self.config.poll_timeout_seconds());
            let outcome = tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                outcome = poll => outcome,
            };

            match outcome {
                Ok(batch) => {
                    if !batch.is_empty() {
                        tracing::debug!("📥 {} update(s)", batch.len());
                    }
                    self.process_batch(batch).await?;
                }
                Err(e) if e.severity() == ErrorSeverity::Critical => return Err(e),
                Err(e) => {
                    tracing::warn!("⚠️ Polling failed: {} (pausing {:?})", e, POLL_ERROR_PAUSE);
                    tokio::time::sleep(POLL_ERROR_PAUSE).await;
                }
            }

            self.sweep_expired().await;

            if last_refresh.elapsed() >= refresh_interval {
                let refreshed = self.refresh_live().await;
                if refreshed > 0 {
                    tracing::debug!("🔄 Refreshed {} live message(s)", refreshed);
                }
                last_refresh = Instant::now();
            }

            batches += 1;
            if self.monitor.is_enabled() && batches % STATS_EVERY_BATCHES == 0 {
                self.monitor.log_stats(self.updates_seen, self.messages_sent);
            }
        }

        tracing::info!("👋 Shutting down");
        self.monitor.log_final_stats();
        Ok(())
    }

    /// 跑一輪輪詢（測試與診斷用），回傳處理的 update 數
    pub async fn step(&mut self) -> Result<usize> {
        let batch = self
            .api
            .get_updates(self.offset, self.config.poll_timeout_seconds())
            .await?;
        let count = batch.len();
        self.process_batch(batch).await?;
        self.sweep_expired().await;
        Ok(count)
    }

    async fn process_batch(&mut self, batch: Vec<IncomingMessage>) -> Result<()> {
        for message in batch {
            self.offset = self.offset.max(message.update_id + 1);
            self.updates_seen += 1;

            // chat_id 0 是轉接層的佔位 update，只拿來推進 offset
            if message.chat_id == 0 {
                continue;
            }
            let Some(text) = message.text else {
                // 貼圖、照片等非文字訊息不回應
                continue;
            };

            if let Err(e) = self.dispatch(message.chat_id, text.trim()).await {
                if e.severity() == ErrorSeverity::Critical {
                    return Err(e);
                }
                tracing::warn!("⚠️ Failed to handle update from chat {}: {}", message.chat_id, e);
            }
        }
        Ok(())
    }

    async fn dispatch(&mut self, chat_id: ChatId, text: &str) -> Result<()> {
        // /start 或陌生聊天：一律回到主選單
        if text == "/start" || !self.chats.contains_key(&chat_id) {
            self.chats
                .insert(chat_id, ChatState::new(self.registry.root_label()));
            return self.render_current(chat_id).await;
        }

        let current_label = self
            .chats
            .get(&chat_id)
            .map(|state| state.nav.current().to_string())
            .unwrap_or_default();

        let Some(screen) = self.registry.get(&current_label) else {
            tracing::error!("Screen '{}' missing, resetting chat {}", current_label, chat_id);
            self.chats
                .insert(chat_id, ChatState::new(self.registry.root_label()));
            return self.render_current(chat_id).await;
        };

        let action = screen
            .buttons()
            .into_iter()
            .find(|button| button.label == text)
            .map(|button| button.action);

        let Some(action) = action else {
            return self.send_expiring(chat_id, HINT_TEXT, NOTIFY_EXPIRY_SECONDS).await;
        };

        self.perform(chat_id, action).await
    }

    async fn perform(&mut self, chat_id: ChatId, action: ButtonAction) -> Result<()> {
        use ButtonAction::*;

        match action {
            Screen(label) => {
                if self.registry.get(&label).is_none() {
                    tracing::error!("Button points to unknown screen '{}'", label);
                    return self.send_expiring(chat_id, HINT_TEXT, NOTIFY_EXPIRY_SECONDS).await;
                }
                if let Some(state) = self.chats.get_mut(&chat_id) {
                    state.nav.enter(&label);
                }
                self.render_current(chat_id).await
            }
            Back => {
                if let Some(state) = self.chats.get_mut(&chat_id) {
                    state.nav.back();
                }
                self.render_current(chat_id).await
            }
            Home => {
                if let Some(state) = self.chats.get_mut(&chat_id) {
                    state.nav.home();
                }
                self.render_current(chat_id).await
            }
            Notify(text) => {
                self.send_expiring(chat_id, &text, NOTIFY_EXPIRY_SECONDS).await
            }
            Order(title) => {
                tracing::info!("🛒 Order recorded: chat {}, '{}'", chat_id, title);
                let text = order_confirmation(&title);
                self.send_plain(chat_id, &text).await.map(|_| ())
            }
            Details(title) => {
                let content = self
                    .registry
                    .find_product(&title)
                    .map(|product| product.details.clone())
                    .filter(|details| !details.is_empty())
                    .unwrap_or_else(|| "تعریف نشده".to_string());
                self.send_expiring(chat_id, &content, DETAILS_EXPIRY_SECONDS).await
            }
            UsdRate => {
                let text = match self.rates.usd_quote().await {
                    Ok(quote) => format!(
                        "USD: {} {} (تاریخ: {}، ساعت: {})",
                        quote.price_display(),
                        quote.unit,
                        quote.date,
                        quote.time
                    ),
                    Err(e) => {
                        tracing::warn!("⚠️ USD rate lookup failed: {}", e);
                        RATE_UNAVAILABLE_TEXT.to_string()
                    }
                };
                self.send_expiring(chat_id, &text, NOTIFY_EXPIRY_SECONDS).await
            }
        }
    }

    async fn render_current(&mut self, chat_id: ChatId) -> Result<()> {
        let Some(label) = self
            .chats
            .get(&chat_id)
            .map(|state| state.nav.current().to_string())
        else {
            return Ok(());
        };

        let Some(screen) = self.registry.get(&label) else {
            tracing::error!("Screen '{}' missing from registry", label);
            return Ok(());
        };
        let screen = Arc::clone(screen);

        let body = screen.body().await?;
        let labels: Vec<String> = screen
            .buttons()
            .iter()
            .map(|button| button.label.clone())
            .collect();

        let message = OutgoingMessage {
            text: body.clone(),
            keyboard: Some(keyboard_rows(&labels, KEYBOARD_COLUMNS)),
            silent: screen.silent(),
        };
        let message_id = self.api.send_message(chat_id, &message).await?;
        self.messages_sent += 1;

        if let Some(state) = self.chats.get_mut(&chat_id) {
            state.live = screen.dynamic().then_some(LiveMessage {
                message_id,
                label,
                last_body: body,
            });
        }
        Ok(())
    }

    async fn send_plain(&mut self, chat_id: ChatId, text: &str) -> Result<MessageId> {
        let message_id = self
            .api
            .send_message(chat_id, &OutgoingMessage::text(text))
            .await?;
        self.messages_sent += 1;
        Ok(message_id)
    }

    async fn send_expiring(&mut self, chat_id: ChatId, text: &str, ttl_seconds: i64) -> Result<()> {
        let message_id = self.send_plain(chat_id, text).await?;
        self.expiring
            .push(ExpiringMessage::new(chat_id, message_id, ttl_seconds));
        Ok(())
    }

    /// 刪掉已到期的限時訊息，回傳刪除數。刪除失敗只記 log，不中斷。
    pub async fn sweep_expired(&mut self) -> usize {
        let now = Utc::now();
        let (due, keep): (Vec<_>, Vec<_>) = self
            .expiring
            .drain(..)
            .partition(|message| message.is_expired(now));
        self.expiring = keep;

        for message in &due {
            if let Err(e) = self
                .api
                .delete_message(message.chat_id, message.message_id)
                .await
            {
                tracing::warn!("⚠️ Failed to delete expired message {}: {}", message.message_id, e);
            }
        }
        due.len()
    }

    /// 重繪所有動態畫面：內容變了才 edit，回傳重繪數
    pub async fn refresh_live(&mut self) -> usize {
        let live_chats: Vec<(ChatId, MessageId, String, String)> = self
            .chats
            .iter()
            .filter_map(|(chat_id, state)| {
                state.live.as_ref().map(|live| {
                    (
                        *chat_id,
                        live.message_id,
                        live.label.clone(),
                        live.last_body.clone(),
                    )
                })
            })
            .collect();

        let mut refreshed = 0;
        for (chat_id, message_id, label, last_body) in live_chats {
            let Some(screen) = self.registry.get(&label) else {
                continue;
            };
            let screen = Arc::clone(screen);

            match screen.body().await {
                Ok(body) if body != last_body => {
                    match self.api.edit_message_text(chat_id, message_id, &body).await {
                        Ok(()) => {
                            if let Some(live) = self
                                .chats
                                .get_mut(&chat_id)
                                .and_then(|state| state.live.as_mut())
                            {
                                live.last_body = body;
                            }
                            refreshed += 1;
                        }
                        Err(e) => {
                            tracing::warn!("⚠️ Failed to refresh message {}: {}", message_id, e);
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("⚠️ Live body render failed for '{}': {}", label, e);
                }
            }
        }
        refreshed
    }

    #[cfg(test)]
    fn force_expire_all(&mut self) {
        for message in &mut self.expiring {
            message.expires_at = Utc::now() - chrono::Duration::seconds(1);
        }
    }
}
