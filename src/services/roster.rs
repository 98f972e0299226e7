use rust_decimal::Decimal;
use tracing::{debug, info};
use validator::Validate;

use crate::models::passenger::{Passenger, PassengerDetails, PassengerField};
use crate::utils::error::{AppError, AppResult};
use crate::utils::validation::parse_age;

pub const INCOMPLETE_PASSENGERS: &str = "Please fill out all fields for all passengers";

/// Ordered list of passengers being filled in for one booking attempt.
///
/// Always holds at least one passenger. At most one passenger is expanded.
/// Removal goes through a confirmation step: `request_removal` then
/// `confirm_removal` (or `dismiss_removal`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassengerRoster {
    passengers: Vec<Passenger>,
    pending_removal: Option<usize>,
}

impl Default for PassengerRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl PassengerRoster {
    pub fn new() -> Self {
        PassengerRoster {
            passengers: vec![Passenger::blank()],
            pending_removal: None,
        }
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    /// Never true: the roster cannot drop below one passenger
    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    pub fn get(&self, index: usize) -> AppResult<&Passenger> {
        self.passengers.get(index).ok_or_else(|| out_of_range(index))
    }

    pub fn add_passenger(&mut self) -> usize {
        self.passengers.push(Passenger::blank());
        debug!(count = self.passengers.len(), "passenger added");
        self.passengers.len() - 1
    }

    /// Set one field from text input. Age input that is not a whole number
    /// clears the age instead of failing.
    pub fn update_field(&mut self, index: usize, field: PassengerField, value: &str) -> AppResult<()> {
        let passenger = self
            .passengers
            .get_mut(index)
            .ok_or_else(|| out_of_range(index))?;

        match field {
            PassengerField::FullName => passenger.full_name = value.to_string(),
            PassengerField::PassportNumber => passenger.passport_number = value.to_string(),
            PassengerField::Age => passenger.age = parse_age(value),
        }
        Ok(())
    }

    /// Remove a passenger immediately. Rejected, leaving the roster untouched,
    /// when only one passenger remains.
    pub fn remove_passenger(&mut self, index: usize) -> AppResult<Passenger> {
        if index >= self.passengers.len() {
            return Err(out_of_range(index));
        }
        if self.passengers.len() == 1 {
            return Err(AppError::MinimumPassengers);
        }

        let removed = self.passengers.remove(index);
        self.pending_removal = None;
        info!(index, remaining = self.passengers.len(), "passenger removed");
        Ok(removed)
    }

    /// Ask to remove a passenger; nothing changes until `confirm_removal`.
    /// Rejected up front when only one passenger remains.
    pub fn request_removal(&mut self, index: usize) -> AppResult<()> {
        if index >= self.passengers.len() {
            return Err(out_of_range(index));
        }
        if self.passengers.len() == 1 {
            return Err(AppError::MinimumPassengers);
        }
        self.pending_removal = Some(index);
        Ok(())
    }

    pub fn pending_removal(&self) -> Option<usize> {
        self.pending_removal
    }

    pub fn confirm_removal(&mut self) -> AppResult<Passenger> {
        let index = self
            .pending_removal
            .take()
            .ok_or_else(|| AppError::Validation("No passenger removal to confirm".into()))?;
        self.remove_passenger(index)
    }

    pub fn dismiss_removal(&mut self) {
        self.pending_removal = None;
    }

    /// Accordion toggle: expanding one passenger collapses every other one;
    /// toggling the expanded passenger collapses it.
    pub fn toggle_expand(&mut self, index: usize) -> AppResult<()> {
        if index >= self.passengers.len() {
            return Err(out_of_range(index));
        }

        let expand = !self.passengers[index].expanded;
        for (i, passenger) in self.passengers.iter_mut().enumerate() {
            passenger.expanded = expand && i == index;
        }
        Ok(())
    }

    pub fn expanded_index(&self) -> Option<usize> {
        self.passengers.iter().position(|p| p.expanded)
    }

    /// Every passenger needs a name, a passport number and an age. Failure is
    /// a single message for the whole roster.
    pub fn validate_all(&self) -> AppResult<()> {
        if self.passengers.iter().all(|p| p.validate().is_ok()) {
            Ok(())
        } else {
            Err(AppError::Validation(INCOMPLETE_PASSENGERS.to_string()))
        }
    }

    /// Every passenger pays the selected class's unit price
    pub fn total_price(&self, unit_price: Decimal) -> AppResult<Decimal> {
        unit_price
            .checked_mul(Decimal::from(self.passengers.len()))
            .ok_or_else(|| AppError::Validation("Total price is out of range".into()))
    }

    pub fn to_details(&self) -> Vec<PassengerDetails> {
        self.passengers.iter().map(Passenger::details).collect()
    }

    pub fn lead_passenger(&self) -> &Passenger {
        &self.passengers[0]
    }
}

fn out_of_range(index: usize) -> AppError {
    AppError::NotFound(format!("Passenger {} does not exist", index + 1))
}
