use crate::domain::model::Product;
use crate::utils::error::Result;
use std::path::Path;

pub const START_LABEL: &str = "start";
pub const SERVICES_LABEL: &str = "خدمات ما 🛠️";
pub const GIFT_CARDS_LABEL: &str = "💳 گیفت‌کارت‌ها";
pub const ACCOUNTS_LABEL: &str = "🏦 حساب‌های بین‌المللی";
pub const PAYMENTS_LABEL: &str = "💵 پرداخت‌های ارزی";
pub const LEARNING_LABEL: &str = "آموزش و راهنما 📚";
pub const CONTACT_LABEL: &str = "پشتیبانی 👤";

pub const SPECIAL_TITLE: &str = "خدمات ویژه";
/// 這一項的詳情畫面會帶即時美元匯率
pub const CONVERSION_TITLE: &str = "تبدیل درآمد ارزی به ریال";

fn details_soon(title: &str) -> String {
    format!("جزئیات {} به زودی اضافه می‌شود.", title)
}

/// 全部上架服務，啟動時建立一次
#[derive(Debug, Clone)]
pub struct Catalog {
    pub gift_cards: Vec<Product>,
    pub accounts: Vec<Product>,
    pub payments: Vec<Product>,
    pub special: Product,
}

impl Catalog {
    /// 從 resources 目錄載入（PayPal 的長文案放在 paypal_details.txt）
    pub fn load(resources_dir: &str) -> Result<Self> {
        let paypal_details =
            std::fs::read_to_string(Path::new(resources_dir).join("paypal_details.txt"))?;
        Ok(Self::with_paypal_details(paypal_details.trim().to_string()))
    }

    pub fn with_paypal_details(paypal_details: String) -> Self {
        let gift_cards = vec![
            Product::new(
                "Apple Gift Card",
                "گیفت‌کارت اپل — قابل استفاده در App Store و Apple ID.",
                &details_soon("Apple Gift Card"),
                "از 10 تا 200 دلار",
            ),
            Product::new(
                "Google Play",
                "گیفت‌کارت گوگل‌پلی — شارژ حساب گوگل‌پلی.",
                &details_soon("Google Play"),
                "از 10 تا 100 دلار",
            ),
            Product::new(
                "PlayStation",
                "گیفت‌کارت پلی‌استیشن — شارژ کیف پول PSN.",
                &details_soon("PlayStation"),
                "از 10 تا 100 دلار",
            ),
            Product::new(
                "Xbox",
                "گیفت‌کارت ایکس‌باکس — شارژ کیف پول Xbox.",
                &details_soon("Xbox"),
                "از 10 تا 100 دلار",
            ),
            Product::new(
                "Steam",
                "گیفت‌کارت استیم — برای خرید بازی‌ها و آیتم‌ها.",
                &details_soon("Steam"),
                "از 5 تا 100 دلار",
            ),
            Product::new(
                "Prepaid Master/Visa",
                "کارت‌های پیش‌پرداخت مستر/ویزا — قابل استفاده در وب‌سایت‌هایی که کارت‌های بین‌المللی قبول می‌کنند.",
                &details_soon("Prepaid Master/Visa"),
                "متغیر",
            ),
        ];

        let accounts = vec![
            Product::new(
                "PayPal",
                "باز و فعال‌سازی حساب پی‌پل — مناسب برای دریافت و ارسال ارز دلاری.",
                &paypal_details,
                "خدمات افتتاح/فعالسازی",
            ),
            Product::new(
                "Wirex",
                "حساب و کارت‌های Wirex — امکانات ارزهای دیجیتال و کارت‌های فیزیکی.",
                &details_soon("Wirex"),
                "متغیر",
            ),
            Product::new(
                "MasterCard ترکیه",
                "صدور کارت مسترکارت ترکیه — مناسب برای پرداخت‌های بین‌المللی و سرویس‌های محلی ترکیه.",
                &details_soon("MasterCard ترکیه"),
                "متغیر",
            ),
            Product::new(
                "Wise (TransferWise)",
                "افتتاح حساب Wise برای انتقال ارزی و دریافت حواله‌های بین‌المللی.",
                &details_soon("Wise (TransferWise)"),
                "متغیر",
            ),
        ];

        let payments = vec![
            Product::new(
                "پرداخت شهریه دانشگاه",
                "پرداخت شهریه و fee اپلیکیشن برای دانشگاه‌ها و کالج‌های خارج از کشور.",
                "مدارک موردنیاز: اطلاعات دانشجویی + فاکتور دانشگاه. ⏳مدت زمان: ۱-۳ روز کاری.",
                "بسته به مبلغ",
            ),
            Product::new(
                "خرید سرویس‌های SaaS",
                "خرید اشتراک ChatGPT, Adobe, Canva, ... و سایر سرویس‌ها.",
                "مدارک موردنیاز: اکانت یا ایمیل. ⏳مدت زمان: فوری تا ۲۴ ساعت.",
                "بسته به سرویس",
            ),
            Product::new(
                "بلیط هواپیما / هتل",
                "پرداخت‌های بین‌المللی برای بلیط و هتل.",
                "مدارک موردنیاز: مشخصات رزرو. ⏳مدت زمان: همان روز.",
                "بسته به رزرو",
            ),
            Product::new(
                CONVERSION_TITLE,
                "تبدیل درآمدهای ارزی ارسال شده به حساب شما به ریال.",
                "مدارک موردنیاز: اطلاعات حساب مقصد. ⏳مدت زمان: ۱ روز کاری.",
                "نرخ روز",
            ),
        ];

        let special = Product::new(
            SPECIAL_TITLE,
            "تبدیل درآمد، کارت مجازی و خدمات اختصاصی.",
            &details_soon(SPECIAL_TITLE),
            "متغیر",
        );

        Self {
            gift_cards,
            accounts,
            payments,
            special,
        }
    }

    pub fn all_products(&self) -> impl Iterator<Item = &Product> {
        self.gift_cards
            .iter()
            .chain(self.accounts.iter())
            .chain(self.payments.iter())
            .chain(std::iter::once(&self.special))
    }

    pub fn find(&self, title: &str) -> Option<&Product> {
        self.all_products().find(|p| p.title == title)
    }
}
