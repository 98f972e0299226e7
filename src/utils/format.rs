use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency display, two decimals: 200 -> "$200.00"
pub fn format_price(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("${}", rounded)
}

/// Flight length as "{hours}h {minutes}m"; arrival before departure reads as 0h 0m
pub fn format_duration(departure: DateTime<Utc>, arrival: DateTime<Utc>) -> String {
    let minutes = (arrival - departure).num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Date format the flight search endpoint expects
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Search header form, e.g. "Mon, Jan 6"
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}
