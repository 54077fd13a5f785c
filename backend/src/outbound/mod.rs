//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **baas**: reqwest clients for the hosted table and auth APIs
//! - **memory**: an in-process stand-in for both, used for local demo runs
//!   and tests
//!
//! Adapters are thin translators between domain types and the backend's wire
//! representation. They contain no business logic.

pub mod baas;
pub mod memory;
