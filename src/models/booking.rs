use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use validator::Validate;

use crate::models::flight::{Flight, FlightId, SeatClassId};
use crate::models::passenger::PassengerDetails;
use crate::models::payment::{PaymentDetail, PaymentMethod};
use crate::utils::error::{AppError, AppResult};
use crate::utils::validation::{not_blank, parse_age};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub user_id: i64,
    pub flight_id: FlightId,
    pub seat_class_id: SeatClassId,
    pub passengers: Vec<PassengerDetails>,
    pub payment_method: PaymentMethod,
}

/// Body of a successful create-booking response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingCreated {
    #[serde(rename = "bookingReference", alias = "booking_reference")]
    pub booking_reference: String,
    #[serde(default, rename = "bookingId", alias = "booking_id")]
    pub booking_id: Option<i64>,
}

/// What the confirmation view needs to fetch the booking it just created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    pub booking_reference: String,
    pub passenger_name: String,
}

impl BookingConfirmation {
    pub fn lookup(&self) -> BookingLookup {
        BookingLookup {
            booking_reference: self.booking_reference.clone(),
            passenger_name: self.passenger_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    CheckedIn,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub fn label(&self) -> String {
        self.to_string().to_uppercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedPassenger {
    pub full_name: String,
    #[serde(default)]
    pub passport_number: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub seat_number: Option<String>,
}

/// Canonical booking as held by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub booking_reference: String,
    pub status: BookingStatus,
    pub total_price: Decimal,
    pub booked_at: DateTime<Utc>,
    pub flight: Flight,
    #[serde(default)]
    pub passengers: Vec<BookedPassenger>,
    #[serde(default)]
    pub payment: Option<PaymentDetail>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookingLookupResponse {
    pub booking: BookingRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingLookup {
    #[validate(custom(function = "not_blank", message = "Please fill in all fields"))]
    pub booking_reference: String,
    #[validate(custom(function = "not_blank", message = "Please fill in all fields"))]
    pub passenger_name: String,
}

/// Cancel and check-in form as typed by the user; age is still text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct BookingIdentityForm {
    #[validate(custom(function = "not_blank", message = "Please fill in all fields"))]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "Please fill in all fields"))]
    pub booking_reference: String,
    #[validate(custom(function = "not_blank", message = "Please fill in all fields"))]
    pub age: String,
    #[validate(custom(function = "not_blank", message = "Please fill in all fields"))]
    pub passport_number: String,
}

impl BookingIdentityForm {
    pub fn into_identity(self) -> AppResult<BookingIdentity> {
        self.validate()?;
        let age = parse_age(&self.age)
            .ok_or_else(|| AppError::Validation("Age must be a number".to_string()))?;

        Ok(BookingIdentity {
            name: self.name.trim().to_string(),
            booking_reference: self.booking_reference.trim().to_string(),
            age,
            passport_number: self.passport_number.trim().to_string(),
        })
    }
}

/// Identity fields the remote service matches before changing a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingIdentity {
    pub name: String,
    pub booking_reference: String,
    pub age: u32,
    pub passport_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingStatusSnapshot {
    pub booking_reference: String,
    pub status: BookingStatus,
}

/// Response to a cancel or check-in request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingActionOutcome {
    #[serde(default)]
    pub message: String,
    pub booking: BookingStatusSnapshot,
}
