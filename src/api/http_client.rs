use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::endpoints;
use crate::api::BookingApi;
use crate::models::booking::{
    BookingActionOutcome, BookingCreated, BookingIdentity, BookingLookup, BookingLookupResponse,
    BookingRecord, BookingRequest,
};
use crate::models::flight::{Flight, FlightId, FlightSearchQuery};
use crate::utils::config::ClientConfig;
use crate::utils::error::{AppError, AppResult, ErrorBody};
use crate::utils::format::format_date;

/// `BookingApi` over HTTP/JSON.
#[derive(Clone)]
pub struct HttpBookingApi {
    client: Client,
    config: ClientConfig,
}

impl HttpBookingApi {
    pub fn new(config: ClientConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpBookingApi { client, config })
    }

    pub fn from_env() -> AppResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // Send one request and decode the body; non-2xx turns into AppError::Server
    async fn send<T: DeserializeOwned>(&self, label: &str, request: RequestBuilder) -> AppResult<T> {
        debug!(request = label, "sending request to booking API");

        let response = request.send().await.map_err(|e| {
            warn!(request = label, error = %e, "booking API unreachable");
            AppError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            return serde_json::from_slice::<T>(&body).map_err(|e| {
                warn!(request = label, error = %e, "unexpected response body");
                AppError::from(e)
            });
        }

        // Error bodies are best effort: an empty or non-JSON body has no message
        let body = response.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .unwrap_or_default()
            .into_message();

        warn!(
            request = label,
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "booking API rejected request"
        );

        Err(AppError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn search_flights(&self, query: &FlightSearchQuery) -> AppResult<Vec<Flight>> {
        let request = self
            .client
            .get(self.config.url(endpoints::FLIGHTS))
            .query(&[
                ("origin", query.origin.trim().to_string()),
                ("destination", query.destination.trim().to_string()),
                ("date", format_date(query.date)),
            ]);
        self.send("search_flights", request).await
    }

    async fn get_flight(&self, flight_id: FlightId) -> AppResult<Flight> {
        let request = self.client.get(self.config.url(&endpoints::flight(flight_id)));
        self.send("get_flight", request).await
    }

    async fn create_booking(
        &self,
        request: &BookingRequest,
        idempotency_key: Uuid,
    ) -> AppResult<BookingCreated> {
        let request = self
            .client
            .post(self.config.url(endpoints::BOOK))
            .header(endpoints::IDEMPOTENCY_KEY_HEADER, idempotency_key.to_string())
            .json(request);
        self.send("create_booking", request).await
    }

    async fn find_booking(&self, lookup: &BookingLookup) -> AppResult<BookingRecord> {
        let request = self
            .client
            .post(self.config.url(endpoints::BOOKING_BY_REFERENCE))
            .json(lookup);
        let response: BookingLookupResponse = self.send("find_booking", request).await?;
        Ok(response.booking)
    }

    async fn cancel_booking(&self, identity: &BookingIdentity) -> AppResult<BookingActionOutcome> {
        let request = self
            .client
            .post(self.config.url(endpoints::CANCEL_BOOKING))
            .json(identity);
        self.send("cancel_booking", request).await
    }

    async fn check_in(&self, identity: &BookingIdentity) -> AppResult<BookingActionOutcome> {
        let request = self
            .client
            .post(self.config.url(endpoints::CHECK_IN))
            .json(identity);
        self.send("check_in", request).await
    }
}
