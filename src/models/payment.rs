use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Credit Card")]
    #[strum(serialize = "Credit Card")]
    CreditCard,
    #[serde(rename = "PayPal")]
    #[strum(serialize = "PayPal")]
    PayPal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn label(&self) -> String {
        self.to_string().to_uppercase()
    }
}

/// Payment as recorded on a booking by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetail {
    pub method: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    pub status: PaymentStatus,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CardBrand {
    Visa,
    Mastercard,
    #[strum(serialize = "American Express")]
    Amex,
    Discover,
}

impl CardBrand {
    /// Card network guessed from the leading digits of a card number.
    pub fn detect(card_number: &str) -> Option<CardBrand> {
        let number = card_number.trim();
        if number.starts_with('4') {
            Some(CardBrand::Visa)
        } else if number.starts_with('5') || number.starts_with('2') {
            Some(CardBrand::Mastercard)
        } else if number.starts_with("34") || number.starts_with("37") {
            Some(CardBrand::Amex)
        } else if number.starts_with('6') {
            Some(CardBrand::Discover)
        } else {
            None
        }
    }
}
