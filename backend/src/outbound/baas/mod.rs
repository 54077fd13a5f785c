//! Hosted backend-as-a-service adapters.
//!
//! Thin HTTP implementations of the `RemoteDataService` and
//! `IdentityProvider` ports for a backend exposing a PostgREST-style table
//! API under `/rest/v1` and a GoTrue-style auth API under `/auth/v1`.

mod auth_client;
mod dto;
mod query_string;
mod rest_client;
mod transport;

pub use auth_client::HttpIdentityProvider;
pub use rest_client::HttpDataService;
pub use transport::{BaasEndpoint, build_client};
