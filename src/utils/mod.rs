pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod request_scope;
pub mod validation;
