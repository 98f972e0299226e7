use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::error::{AppError, AppResult};
use crate::utils::validation::not_blank;

pub type FlightId = i64;
pub type SeatClassId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl Airport {
    /// "Toronto Pearson (YYZ)", or just the code when the name is unknown
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", name, self.code),
            None => self.code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airline {
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatClass {
    pub id: SeatClassId,
    pub name: String,
    pub price_multiplier: Decimal,
}

/// One fare class offered on a flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSeat {
    #[serde(rename = "seatClass")]
    pub seat_class: SeatClass,
    #[serde(default)]
    pub available_seats: i32,
}

/// Flight as returned by both the search and the detail endpoints.
/// Only the detail endpoint fills in `flight_seats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: FlightId,
    pub flight_number: String,
    pub airline: Airline,
    pub origin: Airport,
    pub destination: Airport,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub base_price: Decimal,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "flightSeats")]
    pub flight_seats: Vec<FlightSeat>,
}

impl Flight {
    pub fn seat(&self, seat_class_id: SeatClassId) -> Option<&FlightSeat> {
        self.flight_seats
            .iter()
            .find(|seat| seat.seat_class.id == seat_class_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FlightSearchQuery {
    #[validate(custom(
        function = "not_blank",
        message = "Please enter both origin and destination."
    ))]
    pub origin: String,
    #[validate(custom(
        function = "not_blank",
        message = "Please enter both origin and destination."
    ))]
    pub destination: String,
    pub date: NaiveDate,
}

/// The flight and fare class a booking is being made for.
///
/// Fields are private: a selection can only come from [`FlightSelection::new`],
/// which prices it from the flight it was picked on. It is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightSelection {
    flight_id: FlightId,
    seat_class_id: SeatClassId,
    seat_class_name: String,
    unit_price: Decimal,
}

impl FlightSelection {
    /// Fails with `AppError::Decode` when the flight's prices are negative or
    /// their product does not fit in a `Decimal`.
    pub fn new(flight: &Flight, seat: &FlightSeat) -> AppResult<Self> {
        Ok(FlightSelection {
            flight_id: flight.id,
            seat_class_id: seat.seat_class.id,
            seat_class_name: seat.seat_class.name.clone(),
            unit_price: unit_price(flight.base_price, seat.seat_class.price_multiplier)?,
        })
    }

    pub fn flight_id(&self) -> FlightId {
        self.flight_id
    }

    pub fn seat_class_id(&self) -> SeatClassId {
        self.seat_class_id
    }

    pub fn seat_class_name(&self) -> &str {
        &self.seat_class_name
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}

/// Fare for one passenger: `base_price × price_multiplier`, exact.
pub fn unit_price(base_price: Decimal, price_multiplier: Decimal) -> AppResult<Decimal> {
    if base_price < Decimal::ZERO {
        return Err(AppError::Decode(format!("negative base price {}", base_price)));
    }
    if price_multiplier < Decimal::ZERO {
        return Err(AppError::Decode(format!(
            "negative price multiplier {}",
            price_multiplier
        )));
    }
    base_price
        .checked_mul(price_multiplier)
        .ok_or_else(|| AppError::Decode("price out of range".into()))
}
