pub mod endpoints;
pub mod http_client;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::booking::{
    BookingActionOutcome, BookingCreated, BookingIdentity, BookingLookup, BookingRecord,
    BookingRequest,
};
use crate::models::flight::{Flight, FlightId, FlightSearchQuery};
use crate::utils::error::AppResult;

pub use http_client::HttpBookingApi;

/// The remote flights and bookings service.
///
/// Each method is a single request/response exchange. Implementations never
/// retry; callers decide what to show when a call fails.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn search_flights(&self, query: &FlightSearchQuery) -> AppResult<Vec<Flight>>;

    async fn get_flight(&self, flight_id: FlightId) -> AppResult<Flight>;

    async fn create_booking(
        &self,
        request: &BookingRequest,
        idempotency_key: Uuid,
    ) -> AppResult<BookingCreated>;

    async fn find_booking(&self, lookup: &BookingLookup) -> AppResult<BookingRecord>;

    async fn cancel_booking(&self, identity: &BookingIdentity) -> AppResult<BookingActionOutcome>;

    async fn check_in(&self, identity: &BookingIdentity) -> AppResult<BookingActionOutcome>;
}
