use crate::app::menus::catalog::{
    Catalog, ACCOUNTS_LABEL, CONTACT_LABEL, CONVERSION_TITLE, GIFT_CARDS_LABEL, LEARNING_LABEL,
    PAYMENTS_LABEL, SERVICES_LABEL, SPECIAL_TITLE, START_LABEL,
};
use crate::domain::model::{ButtonAction, MenuButton, Product};
use crate::domain::ports::{MenuScreen, RateSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

const START_BODY: &str =
    "🌍💳 Asll Pay | اصل پی 💳🌍\n\nبه ربات اصل‌پی خوش‌آمدید!\nخدمات را از منوی زیر انتخاب کنید.";

pub const ORDER_BUTTON: &str = "🛒 سفارش";
pub const DETAILS_BUTTON: &str = "ℹ️ جزئیات";
pub const LIVE_RATE_BUTTON: &str = "💵 نرخ لحظه‌ای";

/// 下單後回覆的文案
pub fn order_confirmation(title: &str) -> String {
    format!(
        "سفارش برای '{}' ثبت شد. لطفاً اطلاعات پرداخت را ارسال کنید یا با پشتیبانی تماس بگیرید.",
        title
    )
}

fn detail_html(product: &Product) -> String {
    let mut out = format!("<b>{}</b>\n\n{}\n", product.title, product.description);
    if !product.price_hint.is_empty() {
        out.push_str(&format!("\n<b>قیمت تقریبی:</b> {}\n", product.price_hint));
    }
    out.push_str(&format!("\nبرای سفارش دکمه '{}' را بزنید.", ORDER_BUTTON));
    out
}

/// 內容固定的畫面（主選單、各分類選單）
struct StaticScreen {
    label: String,
    body: String,
    buttons: Vec<MenuButton>,
    silent: bool,
}

#[async_trait]
impl MenuScreen for StaticScreen {
    fn label(&self) -> &str {
        &self.label
    }

    async fn body(&self) -> Result<String> {
        Ok(self.body.clone())
    }

    fn buttons(&self) -> Vec<MenuButton> {
        self.buttons.clone()
    }

    fn silent(&self) -> bool {
        self.silent
    }
}

/// 單項服務的詳情畫面
struct ProductDetailScreen {
    product: Product,
}

#[async_trait]
impl MenuScreen for ProductDetailScreen {
    fn label(&self) -> &str {
        &self.product.title
    }

    async fn body(&self) -> Result<String> {
        Ok(detail_html(&self.product))
    }

    fn buttons(&self) -> Vec<MenuButton> {
        vec![
            MenuButton {
                label: ORDER_BUTTON.to_string(),
                action: ButtonAction::Order(self.product.title.clone()),
            },
            MenuButton {
                label: DETAILS_BUTTON.to_string(),
                action: ButtonAction::Details(self.product.title.clone()),
            },
            MenuButton::back(),
            MenuButton::home(),
        ]
    }
}

/// 匯率相關服務的詳情畫面：內文帶即時美元報價，會定期重繪
struct RateDetailScreen {
    product: Product,
    rates: Arc<dyn RateSource>,
}

#[async_trait]
impl MenuScreen for RateDetailScreen {
    fn label(&self) -> &str {
        &self.product.title
    }

    async fn body(&self) -> Result<String> {
        let mut out = detail_html(&self.product);
        match self.rates.usd_quote().await {
            Ok(quote) => {
                out.push_str(&format!(
                    "\n<b>نرخ لحظه‌ای دلار:</b> {} {} ({} - {})",
                    quote.price_display(),
                    quote.unit,
                    quote.date,
                    quote.time
                ));
            }
            Err(e) => {
                tracing::warn!("⚠️ USD rate unavailable: {}", e);
                out.push_str("\nنرخ لحظه‌ای فعلاً در دسترس نیست.");
            }
        }
        Ok(out)
    }

    fn buttons(&self) -> Vec<MenuButton> {
        vec![
            MenuButton {
                label: ORDER_BUTTON.to_string(),
                action: ButtonAction::Order(self.product.title.clone()),
            },
            MenuButton {
                label: LIVE_RATE_BUTTON.to_string(),
                action: ButtonAction::UsdRate,
            },
            MenuButton {
                label: DETAILS_BUTTON.to_string(),
                action: ButtonAction::Details(self.product.title.clone()),
            },
            MenuButton::back(),
            MenuButton::home(),
        ]
    }

    fn dynamic(&self) -> bool {
        true
    }
}

/// 所有畫面的總表，以 label 索引
pub struct MenuRegistry {
    screens: HashMap<String, Arc<dyn MenuScreen>>,
    catalog: Catalog,
}

impl MenuRegistry {
    pub fn build(catalog: Catalog, rates: Arc<dyn RateSource>) -> Self {
        let mut screens: Vec<Arc<dyn MenuScreen>> = Vec::new();

        screens.push(Arc::new(StaticScreen {
            label: START_LABEL.to_string(),
            body: START_BODY.to_string(),
            buttons: vec![
                MenuButton::screen(LEARNING_LABEL),
                MenuButton::screen(SERVICES_LABEL),
                MenuButton::screen(CONTACT_LABEL),
            ],
            silent: false,
        }));

        screens.push(Arc::new(StaticScreen {
            label: SERVICES_LABEL.to_string(),
            body: "خدمات اصلی اصل‌پی را ببینید:".to_string(),
            buttons: vec![
                MenuButton::screen(GIFT_CARDS_LABEL),
                MenuButton::screen(ACCOUNTS_LABEL),
                MenuButton::screen(PAYMENTS_LABEL),
                MenuButton {
                    label: format!("✨ {}", SPECIAL_TITLE),
                    action: ButtonAction::Screen(SPECIAL_TITLE.to_string()),
                },
                MenuButton::back(),
                MenuButton::home(),
            ],
            silent: true,
        }));

        screens.push(Arc::new(Self::category_screen(
            GIFT_CARDS_LABEL,
            "یکی از گیفت‌کارت‌های زیر را انتخاب کنید:",
            &catalog.gift_cards,
        )));
        screens.push(Arc::new(Self::category_screen(
            ACCOUNTS_LABEL,
            "کدام نوع حساب بین‌المللی را می‌خواهید؟",
            &catalog.accounts,
        )));
        screens.push(Arc::new(Self::category_screen(
            PAYMENTS_LABEL,
            "نوع پرداخت ارزی خود را انتخاب کنید:",
            &catalog.payments,
        )));

        screens.push(Arc::new(StaticScreen {
            label: LEARNING_LABEL.to_string(),
            body: "راهنماها و نکات امنیتی را مطالعه کنید.".to_string(),
            buttons: vec![
                MenuButton::notify(
                    "آموزش خرید",
                    "برای خرید: سرویس موردنظر را انتخاب کنید → ثبت سفارش → ارسال اطلاعات پرداخت.",
                ),
                MenuButton::notify(
                    "آموزش امنیت",
                    "نکته امنیتی: هرگز اطلاعات کامل کارت یا رمز یک‌‌بارمصرف را در چت عمومی ارسال نکنید.",
                ),
                MenuButton::back(),
                MenuButton::home(),
            ],
            silent: true,
        }));

        screens.push(Arc::new(StaticScreen {
            label: CONTACT_LABEL.to_string(),
            body: "راه‌های ارتباط با پشتیبانی را انتخاب کنید.".to_string(),
            buttons: vec![
                MenuButton::notify(
                    "ارسال پیام به پشتیبانی",
                    "پیام شما به پشتیبانی ارسال شد. در ساعات کاری ظرف چند ساعت پاسخ خواهیم داد.",
                ),
                MenuButton::notify("تماس ادمین", "برای تماس فوری: @AsllPayAdmin"),
                MenuButton::back(),
                MenuButton::home(),
            ],
            silent: true,
        }));

        // 每項服務各一個詳情畫面；匯率換算那項要接即時報價
        for product in catalog.all_products() {
            if product.title == CONVERSION_TITLE {
                screens.push(Arc::new(RateDetailScreen {
                    product: product.clone(),
                    rates: Arc::clone(&rates),
                }));
            } else {
                screens.push(Arc::new(ProductDetailScreen {
                    product: product.clone(),
                }));
            }
        }

        let screens = screens
            .into_iter()
            .map(|screen| (screen.label().to_string(), screen))
            .collect();

        Self { screens, catalog }
    }

    fn category_screen(label: &str, body: &str, products: &[Product]) -> StaticScreen {
        let mut buttons: Vec<MenuButton> = products
            .iter()
            .map(|p| MenuButton::screen(&p.title))
            .collect();
        buttons.push(MenuButton::back());
        buttons.push(MenuButton::home());

        StaticScreen {
            label: label.to_string(),
            body: body.to_string(),
            buttons,
            silent: true,
        }
    }

    pub fn get(&self, label: &str) -> Option<&Arc<dyn MenuScreen>> {
        self.screens.get(label)
    }

    pub fn root_label(&self) -> &str {
        START_LABEL
    }

    pub fn find_product(&self, title: &str) -> Option<&Product> {
        self.catalog.find(title)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}
