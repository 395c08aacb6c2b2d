// Adapters layer: concrete implementations for external systems (Telegram Bot API, rate feed).

pub mod rates;
pub mod telegram;
