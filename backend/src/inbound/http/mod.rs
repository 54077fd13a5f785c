//! HTTP inbound adapter exposing the auth and admin dashboard endpoints.

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
