pub mod navigation;
pub mod session;

pub use crate::domain::model::{IncomingMessage, OutgoingMessage, Product, UsdQuote};
pub use crate::domain::ports::{BotApi, ConfigProvider, MenuScreen, RateSource};
pub use crate::utils::error::Result;
