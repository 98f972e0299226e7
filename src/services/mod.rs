pub mod booking_service;
pub mod booking_session;
pub mod flight_service;
pub mod roster;
