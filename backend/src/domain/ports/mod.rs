//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_provider;
mod query;
mod remote_data_service;

#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{AuthError, IdentityProvider};
pub use query::{FieldUpdates, Filter, Join, ListQuery, OrderBy, Record, Table};
#[cfg(test)]
pub use remote_data_service::MockRemoteDataService;
pub use remote_data_service::{QueryError, RemoteDataService, UpdateError};
