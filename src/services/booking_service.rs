use std::sync::Arc;
use tracing::{error, info};
use validator::Validate;

use crate::api::BookingApi;
use crate::models::booking::{
    BookingActionOutcome, BookingConfirmation, BookingIdentityForm, BookingLookup, BookingRecord,
};
use crate::services::booking_session::BookingSession;
use crate::utils::config::ClientConfig;
use crate::utils::error::AppResult;

pub const BOOKING_FAILED: &str = "Booking failed. Please try again.";
pub const BOOKING_NOT_FOUND: &str = "Booking not found. Please check your details.";
pub const CANCEL_FAILED: &str = "Failed to cancel booking. Please check your details.";
pub const CHECK_IN_FAILED: &str = "Something went wrong. Please try again.";

pub struct BookingService {
    api: Arc<dyn BookingApi>,
    user_id: i64,
}

impl BookingService {
    pub fn new(api: Arc<dyn BookingApi>, config: &ClientConfig) -> Self {
        BookingService {
            api,
            user_id: config.user_id,
        }
    }

    /// Submit the session as one booking request.
    ///
    /// Validation failures stop before any request is made. A submit while
    /// another one for the same session is outstanding is rejected. Failures
    /// are not retried and leave the session as it was.
    pub async fn submit(&self, session: &BookingSession) -> AppResult<BookingConfirmation> {
        let request = session.build_request(self.user_id)?;
        let total = session.total_price()?;
        let _guard = session.begin_submit()?;

        info!(
            flight_id = request.flight_id,
            seat_class_id = request.seat_class_id,
            passengers = request.passengers.len(),
            total = %total,
            "submitting booking"
        );

        let created = self
            .api
            .create_booking(&request, session.idempotency_key())
            .await
            .map_err(|e| {
                error!(error = %e, "error booking flight");
                e
            })?;

        info!(booking_reference = %created.booking_reference, "booking created");

        Ok(BookingConfirmation {
            booking_reference: created.booking_reference,
            passenger_name: session.roster.lead_passenger().full_name.trim().to_string(),
        })
    }

    /// Fetch the booking just created, for the confirmation view
    pub async fn resolve_confirmation(
        &self,
        confirmation: &BookingConfirmation,
    ) -> AppResult<BookingRecord> {
        self.find_booking(confirmation.lookup()).await
    }

    pub async fn find_booking(&self, lookup: BookingLookup) -> AppResult<BookingRecord> {
        lookup.validate()?;
        let lookup = BookingLookup {
            booking_reference: lookup.booking_reference.trim().to_string(),
            passenger_name: lookup.passenger_name.trim().to_string(),
        };

        self.api.find_booking(&lookup).await.map_err(|e| {
            error!(booking_reference = %lookup.booking_reference, error = %e, "booking lookup failed");
            e
        })
    }

    pub async fn cancel_booking(&self, form: BookingIdentityForm) -> AppResult<BookingActionOutcome> {
        let identity = form.into_identity()?;

        let outcome = self.api.cancel_booking(&identity).await.map_err(|e| {
            error!(booking_reference = %identity.booking_reference, error = %e, "cancellation failed");
            e
        })?;

        info!(
            booking_reference = %outcome.booking.booking_reference,
            status = %outcome.booking.status,
            "booking cancelled"
        );
        Ok(outcome)
    }

    pub async fn check_in(&self, form: BookingIdentityForm) -> AppResult<BookingActionOutcome> {
        let identity = form.into_identity()?;

        let outcome = self.api.check_in(&identity).await.map_err(|e| {
            error!(booking_reference = %identity.booking_reference, error = %e, "check-in failed");
            e
        })?;

        info!(
            booking_reference = %outcome.booking.booking_reference,
            status = %outcome.booking.status,
            "checked in"
        );
        Ok(outcome)
    }
}
