use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use crate::models::booking::BookingRequest;
use crate::models::flight::FlightSelection;
use crate::models::payment::PaymentMethod;
use crate::services::roster::PassengerRoster;
use crate::utils::error::{AppError, AppResult};

/// One booking attempt: the chosen fare, the passengers and how they pay.
///
/// The idempotency key is fixed for the life of the session, so a manual
/// retry after a failed submit is recognisable to the remote service as the
/// same booking.
#[derive(Debug)]
pub struct BookingSession {
    selection: FlightSelection,
    pub roster: PassengerRoster,
    pub payment_method: PaymentMethod,
    idempotency_key: Uuid,
    submitting: AtomicBool,
}

impl BookingSession {
    pub fn new(selection: FlightSelection) -> Self {
        BookingSession {
            selection,
            roster: PassengerRoster::new(),
            payment_method: PaymentMethod::default(),
            idempotency_key: Uuid::new_v4(),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn selection(&self) -> &FlightSelection {
        &self.selection
    }

    pub fn idempotency_key(&self) -> Uuid {
        self.idempotency_key
    }

    pub fn total_price(&self) -> AppResult<Decimal> {
        self.roster.total_price(self.selection.unit_price())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Validate the roster and build the request body. UI-only passenger
    /// state is dropped here.
    pub fn build_request(&self, user_id: i64) -> AppResult<BookingRequest> {
        self.roster.validate_all()?;

        Ok(BookingRequest {
            user_id,
            flight_id: self.selection.flight_id(),
            seat_class_id: self.selection.seat_class_id(),
            passengers: self.roster.to_details(),
            payment_method: self.payment_method,
        })
    }

    /// Claim the session for one submit; released when the guard drops
    pub(crate) fn begin_submit(&self) -> AppResult<SubmitGuard<'_>> {
        self.submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::SubmissionInProgress)?;
        Ok(SubmitGuard { session: self })
    }
}

pub(crate) struct SubmitGuard<'a> {
    session: &'a BookingSession,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.session.submitting.store(false, Ordering::Release);
    }
}
