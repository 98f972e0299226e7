//! Paths relative to the configured API base URL

pub const FLIGHTS: &str = "flights";
pub const BOOK: &str = "book";
pub const BOOKING_BY_REFERENCE: &str = "bookings/ref";
pub const CANCEL_BOOKING: &str = "bookings/cancel";
pub const CHECK_IN: &str = "bookings/checkIn";

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

pub fn flight(flight_id: i64) -> String {
    format!("{}/{}", FLIGHTS, flight_id)
}
