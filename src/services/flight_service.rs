use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, warn};
use validator::Validate;

use crate::api::BookingApi;
use crate::models::flight::{
    unit_price, Flight, FlightId, FlightSearchQuery, FlightSelection, SeatClass, SeatClassId,
};
use crate::utils::error::{AppError, AppResult};

pub const FLIGHT_LOAD_FAILED: &str = "Unable to load flight details.";

/// Where a remotely loaded value stands.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Seat-class picker for one flight.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSelector {
    flight_id: FlightId,
    state: LoadState<Flight>,
}

impl FlightSelector {
    pub fn loading(flight_id: FlightId) -> Self {
        FlightSelector {
            flight_id,
            state: LoadState::Loading,
        }
    }

    pub fn flight_id(&self) -> FlightId {
        self.flight_id
    }

    pub fn state(&self) -> &LoadState<Flight> {
        &self.state
    }

    /// Apply the outcome of the detail request
    pub fn resolve(&mut self, result: AppResult<Flight>) {
        self.state = match result {
            Ok(flight) => LoadState::Ready(flight),
            Err(e) => {
                error!(flight_id = self.flight_id, error = %e, "error fetching flight details");
                LoadState::Failed(e.message_or(FLIGHT_LOAD_FAILED))
            }
        };
    }

    /// Fare menu: every seat class on the flight with its unit price.
    /// Classes whose price cannot be computed are left off the menu.
    pub fn fares(&self) -> Vec<(SeatClass, Decimal)> {
        let Some(flight) = self.state.ready() else {
            return Vec::new();
        };

        flight
            .flight_seats
            .iter()
            .filter_map(|seat| {
                match unit_price(flight.base_price, seat.seat_class.price_multiplier) {
                    Ok(price) => Some((seat.seat_class.clone(), price)),
                    Err(e) => {
                        warn!(
                            flight_id = flight.id,
                            seat_class_id = seat.seat_class.id,
                            error = %e,
                            "seat class has no usable price"
                        );
                        None
                    }
                }
            })
            .collect()
    }

    pub fn select(&self, seat_class_id: SeatClassId) -> AppResult<FlightSelection> {
        let flight = match &self.state {
            LoadState::Ready(flight) => flight,
            LoadState::Loading => {
                return Err(AppError::Validation("Flight details are still loading".into()))
            }
            LoadState::Failed(message) => return Err(AppError::Validation(message.clone())),
        };

        let seat = flight.seat(seat_class_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "Seat class {} is not offered on flight {}",
                seat_class_id, flight.flight_number
            ))
        })?;

        // Sold-out classes stay selectable; the booking service has the final say
        if seat.available_seats <= 0 {
            warn!(
                flight_id = flight.id,
                seat_class_id,
                "selected seat class has no available seats"
            );
        }

        let selection = FlightSelection::new(flight, seat).map_err(|e| {
            error!(flight_id = flight.id, seat_class_id, error = %e, "error pricing seat class");
            e
        })?;
        info!(
            flight_id = selection.flight_id(),
            seat_class_id = selection.seat_class_id(),
            unit_price = %selection.unit_price(),
            "seat class selected"
        );
        Ok(selection)
    }
}

pub struct FlightService {
    api: Arc<dyn BookingApi>,
}

impl FlightService {
    pub fn new(api: Arc<dyn BookingApi>) -> Self {
        FlightService { api }
    }

    /// Search flights for a route and date
    pub async fn search_flights(&self, query: FlightSearchQuery) -> AppResult<Vec<Flight>> {
        query.validate()?;

        let flights = self.api.search_flights(&query).await.map_err(|e| {
            error!(error = %e, "error fetching flights");
            e
        })?;

        info!(
            origin = %query.origin,
            destination = %query.destination,
            count = flights.len(),
            "flights found"
        );
        Ok(flights)
    }

    pub async fn get_flight(&self, flight_id: FlightId) -> AppResult<Flight> {
        self.api.get_flight(flight_id).await
    }

    /// Load a flight for seat-class selection. Failure leaves the selector
    /// in `LoadState::Failed` rather than returning an error.
    pub async fn open_flight(&self, flight_id: FlightId) -> FlightSelector {
        let mut selector = FlightSelector::loading(flight_id);
        selector.resolve(self.api.get_flight(flight_id).await);
        selector
    }
}
