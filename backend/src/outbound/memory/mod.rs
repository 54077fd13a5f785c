//! In-process backend implementing both the table and the auth ports.
//!
//! Rows are stored as the same untyped JSON objects the hosted backend would
//! return, so the domain's row decoding is exercised unchanged. Used when no
//! hosted backend is configured and by integration tests.

mod seed;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Map, Value, json};
use tracing::debug;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AuthError, FieldUpdates, Filter, IdentityProvider, Join, ListQuery, QueryError, Record,
    RemoteDataService, Table, UpdateError,
};
use crate::domain::{
    AccessToken, AuthSession, Identity, Registration, Role, SignInCredentials, SignUpOutcome,
    UserId,
};

pub use seed::{DEMO_PASSWORD, DemoAccounts, seed_demo_data};

struct Account {
    identity: Identity,
    password: Zeroizing<String>,
}

#[derive(Default)]
struct Store {
    tables: HashMap<Table, Vec<Record>>,
    accounts: Vec<Account>,
    tokens: HashMap<String, UserId>,
}

/// Shared in-memory backend.
pub struct InMemoryBackend {
    store: Mutex<Store>,
    unavailable: AtomicBool,
    clock: Arc<dyn Clock>,
}

impl InMemoryBackend {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Mutex::new(Store::default()),
            unavailable: AtomicBool::new(false),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every table read and write fail with a transport error, as if the
    /// backend were unreachable. Auth calls are unaffected.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    fn is_unavailable(&self) -> bool {
        self.unavailable.load(AtomicOrdering::SeqCst)
    }

    /// Insert a raw row. A missing `id` is filled with a fresh UUID; the
    /// row's id is returned.
    pub fn insert(&self, table: Table, mut row: Record) -> String {
        let id = match row.get("id").and_then(Value::as_str) {
            Some(id) => id.to_owned(),
            None => {
                let id = Uuid::new_v4().to_string();
                row.insert("id".to_owned(), Value::String(id.clone()));
                id
            }
        };
        self.lock().tables.entry(table).or_default().push(row);
        id
    }

    /// Fetch a raw row by id.
    pub fn row(&self, table: Table, id: &str) -> Option<Record> {
        self.lock()
            .tables
            .get(&table)
            .and_then(|rows| rows.iter().find(|row| row_id(row) == Some(id)).cloned())
    }

    /// Create an account and its `users` row.
    pub fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Identity, AuthError> {
        let email = email.trim().to_ascii_lowercase();
        let mut store = self.lock();
        if store
            .accounts
            .iter()
            .any(|account| account.identity.email == email)
        {
            return Err(AuthError::duplicate_account(email));
        }
        let identity = Identity {
            id: UserId::random(),
            email,
            full_name: full_name.to_owned(),
            role,
        };
        let row = json!({
            "id": identity.id.to_string(),
            "full_name": identity.full_name,
            "email": identity.email,
            "role": role.as_str(),
            "is_active": true,
            "created_at": self.clock.utc().to_rfc3339(),
        });
        if let Value::Object(row) = row {
            store.tables.entry(Table::Users).or_default().push(row);
        }
        store.accounts.push(Account {
            identity: identity.clone(),
            password: Zeroizing::new(password.to_owned()),
        });
        Ok(identity)
    }

    fn issue_token(&self, identity: Identity) -> AuthSession {
        let token = Uuid::new_v4().simple().to_string();
        self.lock().tokens.insert(token.clone(), identity.id);
        AuthSession {
            identity,
            access_token: AccessToken::new(token),
        }
    }
}

fn row_id(row: &Record) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

/// Descending order; values that are missing or not comparable sort last.
fn compare_desc(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => b.cmp(a),
        (Some(Value::Number(a)), Some(Value::Number(b))) => b
            .as_f64()
            .partial_cmp(&a.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Null) | None, Some(Value::Null) | None) => Ordering::Equal,
        (Some(Value::Null) | None, _) => Ordering::Greater,
        (_, Some(Value::Null) | None) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn embed(join: &Join, row: &mut Record, tables: &HashMap<Table, Vec<Record>>) {
    let target = row
        .get(join.foreign_key)
        .and_then(Value::as_str)
        .and_then(|fk| {
            tables
                .get(&join.table)
                .and_then(|rows| rows.iter().find(|candidate| row_id(candidate) == Some(fk)))
        })
        .map(|referenced| {
            let selected: Map<String, Value> = join
                .columns
                .iter()
                .map(|column| {
                    let value = referenced.get(*column).cloned().unwrap_or(Value::Null);
                    ((*column).to_owned(), value)
                })
                .collect();
            Value::Object(selected)
        })
        .unwrap_or(Value::Null);
    row.insert(join.alias.to_owned(), target);
}

#[async_trait]
impl RemoteDataService for InMemoryBackend {
    async fn count(&self, table: Table, filter: Option<Filter>) -> Result<u64, QueryError> {
        if self.is_unavailable() {
            return Err(QueryError::transport("in-memory backend marked unavailable"));
        }
        let store = self.lock();
        let total = store.tables.get(&table).map_or(0, |rows| {
            rows.iter()
                .filter(|row| filter.as_ref().is_none_or(|f| f.matches(row)))
                .count()
        });
        Ok(total as u64)
    }

    async fn list(&self, query: ListQuery) -> Result<Vec<Record>, QueryError> {
        if self.is_unavailable() {
            return Err(QueryError::transport("in-memory backend marked unavailable"));
        }
        let store = self.lock();
        let mut rows: Vec<Record> = store
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filter.as_ref().is_none_or(|f| f.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if let Some(order) = query.order_by {
            rows.sort_by(|a, b| compare_desc(a.get(order.column), b.get(order.column)));
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        if let Some(join) = &query.join {
            for row in &mut rows {
                embed(join, row, &store.tables);
            }
        }
        Ok(rows)
    }

    async fn update(
        &self,
        table: Table,
        id: &str,
        fields: FieldUpdates,
    ) -> Result<(), UpdateError> {
        if self.is_unavailable() {
            return Err(UpdateError::transport("in-memory backend marked unavailable"));
        }
        let mut store = self.lock();
        let row = store
            .tables
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|row| row_id(row) == Some(id)))
            .ok_or_else(|| UpdateError::not_found(id))?;
        for (column, value) in fields.into_record() {
            row.insert(column, value);
        }
        debug!(%table, id, "row updated");
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for InMemoryBackend {
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<AuthSession, AuthError> {
        let email = credentials.email().to_ascii_lowercase();
        let identity = self
            .lock()
            .accounts
            .iter()
            .find(|account| {
                account.identity.email == email
                    && account.password.as_str() == credentials.password()
            })
            .map(|account| account.identity.clone())
            .ok_or_else(AuthError::invalid_credentials)?;
        Ok(self.issue_token(identity))
    }

    async fn sign_up(&self, registration: &Registration) -> Result<SignUpOutcome, AuthError> {
        let identity = self.register(
            registration.full_name(),
            registration.email(),
            registration.password(),
            registration.role(),
        )?;
        Ok(SignUpOutcome::SignedIn(self.issue_token(identity)))
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthError> {
        self.lock().tokens.remove(token.expose());
        Ok(())
    }

    async fn identity(&self, token: &AccessToken) -> Result<Identity, AuthError> {
        let store = self.lock();
        let user_id = store
            .tokens
            .get(token.expose())
            .ok_or_else(AuthError::session_expired)?;
        store
            .accounts
            .iter()
            .find(|account| account.identity.id == *user_id)
            .map(|account| account.identity.clone())
            .ok_or_else(AuthError::session_expired)
    }
}

#[cfg(test)]
mod tests;
