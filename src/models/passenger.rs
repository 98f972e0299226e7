use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use validator::Validate;

use crate::utils::validation::not_blank;

/// A passenger as edited in the roster.
///
/// `expanded` is display state for the accordion and never leaves the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct Passenger {
    #[validate(custom(function = "not_blank"))]
    pub full_name: String,
    #[validate(custom(function = "not_blank"))]
    pub passport_number: String,
    #[validate(required)]
    pub age: Option<u32>,
    pub expanded: bool,
}

impl Passenger {
    pub fn blank() -> Self {
        Passenger::default()
    }

    pub fn details(&self) -> PassengerDetails {
        PassengerDetails {
            full_name: self.full_name.trim().to_string(),
            passport_number: self.passport_number.trim().to_string(),
            age: self.age,
        }
    }
}

/// Passenger as sent to the booking endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerDetails {
    pub full_name: String,
    pub passport_number: String,
    pub age: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PassengerField {
    FullName,
    PassportNumber,
    Age,
}
