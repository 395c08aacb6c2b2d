pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::ResolvedConfig;

pub use adapters::rates::BrsRateClient;
pub use adapters::telegram::TelegramApi;
pub use app::menus::{Catalog, MenuRegistry};
pub use crate::core::session::MenuSession;
pub use utils::error::{BotError, Result};
