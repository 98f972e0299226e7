#![allow(dead_code)]

// In-process stand-in for the remote flights/bookings service, served by rocket
// on a local port so the HTTP client is exercised end to end.

use rocket::config::{Config, LogLevel, Shutdown as ShutdownConfig};
use rocket::fairing::AdHoc;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::response::status::Custom;
use rocket::serde::json::{json, Json, Value};
use rocket::{get, post, routes, Request, Shutdown, State};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::net::{Ipv4Addr, TcpListener};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type ApiResult = Result<Json<Value>, Custom<Json<Value>>>;

#[derive(Debug, Clone)]
pub struct RecordedBooking {
    pub body: Value,
    pub idempotency_key: Option<String>,
}

pub struct MockState {
    pub flights: Mutex<Vec<Value>>,
    pub bookings: Mutex<Vec<Value>>,
    pub book_requests: Mutex<Vec<RecordedBooking>>,
    pub lookup_requests: Mutex<Vec<Value>>,
    pub cancel_requests: Mutex<Vec<Value>>,
    pub check_in_requests: Mutex<Vec<Value>>,
    pub search_queries: Mutex<Vec<(String, String, String)>>,
    pub references: Mutex<VecDeque<String>>,
    // When set, /book answers 409 with this message
    pub booking_rejection: Mutex<Option<String>>,
    // When set, every booking mutation fails with an empty 500
    pub silent_failures: AtomicBool,
    pub response_delay_ms: AtomicU64,
}

impl MockState {
    pub fn seeded() -> Self {
        MockState {
            flights: Mutex::new(vec![
                json!({
                    "id": 1,
                    "flight_number": "AC101",
                    "airline": { "name": "Air Canada", "logo": null },
                    "origin": { "code": "YYZ", "name": "Toronto Pearson", "city": "Toronto" },
                    "destination": { "code": "JFK", "name": "John F. Kennedy", "city": "New York" },
                    "departure_time": "2024-12-08T10:00:00Z",
                    "arrival_time": "2024-12-08T11:35:00Z",
                    "base_price": "150.00",
                    "status": "scheduled",
                    "flightSeats": [
                        { "seatClass": { "id": 1, "name": "Business", "price_multiplier": "2.00" }, "available_seats": 8 },
                        { "seatClass": { "id": 2, "name": "Economy", "price_multiplier": 1 }, "available_seats": 120 },
                        { "seatClass": { "id": 3, "name": "Premium Economy", "price_multiplier": "1.35" }, "available_seats": 0 }
                    ]
                }),
                json!({
                    "id": 2,
                    "flight_number": "AC856",
                    "airline": { "name": "Air Canada", "logo": "https://example.com/ac.png" },
                    "origin": { "code": "YYZ", "name": "Toronto Pearson", "city": "Toronto" },
                    "destination": { "code": "LHR", "name": "Heathrow", "city": "London" },
                    "departure_time": "2024-12-08T21:15:00Z",
                    "arrival_time": "2024-12-09T04:20:00Z",
                    "base_price": "200.00",
                    "status": "scheduled",
                    "flightSeats": [
                        { "seatClass": { "id": 2, "name": "Economy", "price_multiplier": "1.00" }, "available_seats": 40 }
                    ]
                }),
            ]),
            bookings: Mutex::new(Vec::new()),
            book_requests: Mutex::new(Vec::new()),
            lookup_requests: Mutex::new(Vec::new()),
            cancel_requests: Mutex::new(Vec::new()),
            check_in_requests: Mutex::new(Vec::new()),
            search_queries: Mutex::new(Vec::new()),
            references: Mutex::new(VecDeque::from(vec![
                "ABC123".to_string(),
                "DEF456".to_string(),
                "GHI789".to_string(),
            ])),
            booking_rejection: Mutex::new(None),
            silent_failures: AtomicBool::new(false),
            response_delay_ms: AtomicU64::new(0),
        }
    }

    pub fn book_requests(&self) -> Vec<RecordedBooking> {
        self.book_requests.lock().unwrap().clone()
    }

    pub fn lookup_requests(&self) -> Vec<Value> {
        self.lookup_requests.lock().unwrap().clone()
    }

    pub fn cancel_requests(&self) -> Vec<Value> {
        self.cancel_requests.lock().unwrap().clone()
    }

    pub fn check_in_requests(&self) -> Vec<Value> {
        self.check_in_requests.lock().unwrap().clone()
    }

    pub fn reject_bookings(&self, message: &str) {
        *self.booking_rejection.lock().unwrap() = Some(message.to_string());
    }

    pub fn accept_bookings(&self) {
        *self.booking_rejection.lock().unwrap() = None;
    }

    pub fn set_delay(&self, delay: Duration) {
        self.response_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    // Insert a booking directly, bypassing /book
    pub fn seed_booking(&self, reference: &str, status: &str, passengers: Value) {
        let flight = self.flights.lock().unwrap()[0].clone();
        self.bookings.lock().unwrap().push(json!({
            "booking_reference": reference,
            "status": status,
            "total_price": "300.00",
            "booked_at": "2024-11-20T09:30:00Z",
            "flight": flight,
            "passengers": passengers,
            "payment": {
                "method": "Credit Card",
                "amount": "300.00",
                "status": "completed",
                "paid_at": "2024-11-20T09:31:00Z"
            }
        }));
    }

    async fn delay(&self) {
        let ms = self.response_delay_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn flight(&self, id: i64) -> Option<Value> {
        self.flights
            .lock()
            .unwrap()
            .iter()
            .find(|f| f["id"].as_i64() == Some(id))
            .cloned()
    }
}

fn error(status: Status, message: &str) -> Custom<Json<Value>> {
    Custom(status, Json(json!({ "message": message })))
}

fn silent_error() -> Custom<Json<Value>> {
    Custom(Status::InternalServerError, Json(json!({})))
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).unwrap(),
        _ => Decimal::ZERO,
    }
}

pub struct IdempotencyKey(Option<String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for IdempotencyKey {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let key = request
            .headers()
            .get_one("Idempotency-Key")
            .map(|key| key.to_string());
        Outcome::Success(IdempotencyKey(key))
    }
}

#[get("/flights?<origin>&<destination>&<date>")]
async fn search_flights(
    origin: String,
    destination: String,
    date: String,
    state: &State<Arc<MockState>>,
) -> ApiResult {
    state
        .search_queries
        .lock()
        .unwrap()
        .push((origin.clone(), destination.clone(), date.clone()));

    let matches = |airport: &Value, wanted: &str| {
        airport["code"].as_str().map(|c| c.eq_ignore_ascii_case(wanted)) == Some(true)
            || airport["city"].as_str().map(|c| c.eq_ignore_ascii_case(wanted)) == Some(true)
    };

    let flights: Vec<Value> = state
        .flights
        .lock()
        .unwrap()
        .iter()
        .filter(|f| {
            matches(&f["origin"], &origin)
                && matches(&f["destination"], &destination)
                && f["departure_time"].as_str().map(|t| t.starts_with(&date)) == Some(true)
        })
        .map(|f| {
            let mut summary = f.clone();
            if let Some(obj) = summary.as_object_mut() {
                obj.remove("flightSeats");
            }
            summary
        })
        .collect();

    Ok(Json(Value::Array(flights)))
}

#[get("/flights/<id>")]
async fn get_flight(id: i64, state: &State<Arc<MockState>>) -> ApiResult {
    state.delay().await;
    state
        .flight(id)
        .map(Json)
        .ok_or_else(|| error(Status::NotFound, "Flight not found"))
}

#[post("/book", format = "json", data = "<body>")]
async fn book(body: Json<Value>, key: IdempotencyKey, state: &State<Arc<MockState>>) -> ApiResult {
    let body = body.into_inner();
    state.book_requests.lock().unwrap().push(RecordedBooking {
        body: body.clone(),
        idempotency_key: key.0,
    });
    state.delay().await;

    if state.silent_failures.load(Ordering::SeqCst) {
        return Err(silent_error());
    }
    if let Some(message) = state.booking_rejection.lock().unwrap().clone() {
        return Err(error(Status::Conflict, &message));
    }

    let flight = body["flightId"]
        .as_i64()
        .and_then(|id| state.flight(id))
        .ok_or_else(|| error(Status::NotFound, "Flight not found"))?;
    let seat = flight["flightSeats"]
        .as_array()
        .and_then(|seats| {
            seats
                .iter()
                .find(|s| s["seatClass"]["id"].as_i64() == body["seatClassId"].as_i64())
                .cloned()
        })
        .ok_or_else(|| error(Status::BadRequest, "Seat class not found"))?;

    let passengers = body["passengers"].as_array().cloned().unwrap_or_default();
    let unit_price = decimal(&flight["base_price"]) * decimal(&seat["seatClass"]["price_multiplier"]);
    let total = unit_price * Decimal::from(passengers.len());

    let reference = state
        .references
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| "ZZZ999".to_string());

    let mut bookings = state.bookings.lock().unwrap();
    bookings.push(json!({
        "booking_reference": reference,
        "status": "confirmed",
        "total_price": total.to_string(),
        "booked_at": "2024-11-20T09:30:00Z",
        "flight": flight,
        "passengers": passengers,
        "payment": {
            "method": body["paymentMethod"],
            "amount": total.to_string(),
            "status": "completed",
            "paid_at": "2024-11-20T09:31:00Z"
        }
    }));

    Ok(Json(json!({
        "bookingReference": reference,
        "bookingId": bookings.len()
    })))
}

#[post("/bookings/ref", format = "json", data = "<body>")]
async fn booking_by_reference(body: Json<Value>, state: &State<Arc<MockState>>) -> ApiResult {
    let body = body.into_inner();
    state.lookup_requests.lock().unwrap().push(body.clone());
    state.delay().await;

    let reference = body["bookingReference"].as_str().unwrap_or_default();
    let name = body["passengerName"].as_str().unwrap_or_default();

    state
        .bookings
        .lock()
        .unwrap()
        .iter()
        .find(|b| {
            b["booking_reference"] == reference
                && b["passengers"]
                    .as_array()
                    .map(|ps| ps.iter().any(|p| p["full_name"] == name))
                    == Some(true)
        })
        .map(|booking| Json(json!({ "booking": booking })))
        .ok_or_else(|| error(Status::NotFound, "Booking not found"))
}

// Shared matching for cancel and check-in
fn find_by_identity<'a>(bookings: &'a mut [Value], body: &Value) -> Option<&'a mut Value> {
    bookings.iter_mut().find(|b| {
        b["booking_reference"] == body["bookingReference"]
            && b["passengers"]
                .as_array()
                .map(|ps| {
                    ps.iter().any(|p| {
                        p["full_name"] == body["name"]
                            && p["passport_number"] == body["passportNumber"]
                            && p["age"] == body["age"]
                    })
                })
                == Some(true)
    })
}

#[post("/bookings/cancel", format = "json", data = "<body>")]
async fn cancel_booking(body: Json<Value>, state: &State<Arc<MockState>>) -> ApiResult {
    let body = body.into_inner();
    state.cancel_requests.lock().unwrap().push(body.clone());
    state.delay().await;

    if state.silent_failures.load(Ordering::SeqCst) {
        return Err(silent_error());
    }

    let mut bookings = state.bookings.lock().unwrap();
    let booking = find_by_identity(&mut bookings, &body).ok_or_else(|| {
        error(
            Status::NotFound,
            "No booking matches the provided name and booking reference",
        )
    })?;

    if booking["status"] == "cancelled" {
        return Err(error(Status::BadRequest, "Booking is already cancelled"));
    }
    booking["status"] = json!("cancelled");

    Ok(Json(json!({
        "message": "Booking cancelled successfully",
        "booking": { "booking_reference": booking["booking_reference"], "status": "cancelled" }
    })))
}

#[post("/bookings/checkIn", format = "json", data = "<body>")]
async fn check_in(body: Json<Value>, state: &State<Arc<MockState>>) -> ApiResult {
    let body = body.into_inner();
    state.check_in_requests.lock().unwrap().push(body.clone());
    state.delay().await;

    if state.silent_failures.load(Ordering::SeqCst) {
        return Err(silent_error());
    }

    let mut bookings = state.bookings.lock().unwrap();
    let booking = find_by_identity(&mut bookings, &body)
        .ok_or_else(|| error(Status::NotFound, "Booking not found"))?;

    if booking["status"] == "cancelled" {
        return Err(error(Status::BadRequest, "Cancelled bookings cannot be checked in"));
    }
    booking["status"] = json!("checked_in");

    Ok(Json(json!({
        "message": "Check-in successful",
        "booking": { "booking_reference": booking["booking_reference"], "status": "checked_in" }
    })))
}

pub struct MockApi {
    pub state: Arc<MockState>,
    pub base_url: String,
    shutdown: Shutdown,
}

impl MockApi {
    pub async fn start() -> MockApi {
        let port = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .and_then(|listener| listener.local_addr())
            .map(|addr| addr.port())
            .expect("no free local port");

        let config = Config {
            address: Ipv4Addr::LOCALHOST.into(),
            port,
            log_level: LogLevel::Off,
            shutdown: ShutdownConfig {
                ctrlc: false,
                ..Default::default()
            },
            ..Config::debug_default()
        };

        let state = Arc::new(MockState::seeded());
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();

        let rocket = rocket::custom(config)
            .manage(Arc::clone(&state))
            .mount(
                "/api",
                routes![
                    search_flights,
                    get_flight,
                    book,
                    booking_by_reference,
                    cancel_booking,
                    check_in,
                ],
            )
            .attach(AdHoc::on_liftoff("Mock API ready", move |_| {
                Box::pin(async move {
                    let _ = ready_tx.send(());
                })
            }))
            .ignite()
            .await
            .expect("mock API failed to ignite");

        let shutdown = rocket.shutdown();
        tokio::spawn(async move {
            let _ = rocket.launch().await;
        });
        ready_rx.await.expect("mock API failed to launch");

        MockApi {
            state,
            base_url: format!("http://127.0.0.1:{}/api", port),
            shutdown,
        }
    }

    pub fn stop(self) {
        self.shutdown.notify();
    }
}
