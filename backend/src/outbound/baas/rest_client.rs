//! Reqwest-backed remote data service adapter for the hosted REST API.
//!
//! This adapter owns transport details only: query-string encoding, the
//! count/representation preferences, timeout and HTTP error mapping, and
//! JSON decoding into untyped records.

use async_trait::async_trait;
use reqwest::header::{CONTENT_RANGE, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::query_string::{count_params, id_eq, list_params, parse_content_range_total};
use super::transport::{BaasEndpoint, SendFailure, is_timeout_status, status_message};
use crate::domain::ports::{
    FieldUpdates, Filter, ListQuery, QueryError, Record, RemoteDataService, Table, UpdateError,
};

const PREFER: &str = "Prefer";

/// Remote data service over `/rest/v1/{table}`.
pub struct HttpDataService {
    client: Client,
    endpoint: BaasEndpoint,
}

impl HttpDataService {
    pub fn new(client: Client, endpoint: BaasEndpoint) -> Self {
        Self { client, endpoint }
    }

    fn table_url(&self, table: Table) -> Result<Url, String> {
        self.endpoint
            .url(&format!("rest/v1/{}", table.as_str()))
            .map_err(|err| format!("invalid table url: {err}"))
    }
}

impl From<SendFailure> for QueryError {
    fn from(value: SendFailure) -> Self {
        match value {
            SendFailure::Timeout(message) => QueryError::timeout(message),
            SendFailure::Transport(message) => QueryError::transport(message),
        }
    }
}

impl From<SendFailure> for UpdateError {
    fn from(value: SendFailure) -> Self {
        match value {
            SendFailure::Timeout(message) => UpdateError::timeout(message),
            SendFailure::Transport(message) => UpdateError::transport(message),
        }
    }
}

fn map_query_status(status: StatusCode, body: &[u8]) -> QueryError {
    let message = status_message(status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => QueryError::permission_denied(message),
        _ if is_timeout_status(status) => QueryError::timeout(message),
        _ => QueryError::transport(message),
    }
}

fn map_update_status(status: StatusCode, body: &[u8], id: &str) -> UpdateError {
    let message = status_message(status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpdateError::permission_denied(message),
        StatusCode::NOT_FOUND => UpdateError::not_found(id),
        _ if is_timeout_status(status) => UpdateError::timeout(message),
        _ if status.is_client_error() => UpdateError::rejected(message),
        _ => UpdateError::transport(message),
    }
}

fn parse_records(body: &[u8]) -> Result<Vec<Record>, QueryError> {
    serde_json::from_slice(body)
        .map_err(|error| QueryError::decode(format!("expected a JSON array of objects: {error}")))
}

fn parse_total(header: Option<&HeaderValue>) -> Result<u64, QueryError> {
    header
        .and_then(|value| value.to_str().ok())
        .and_then(parse_content_range_total)
        .ok_or_else(|| QueryError::decode("missing or malformed Content-Range header"))
}

#[async_trait]
impl RemoteDataService for HttpDataService {
    async fn count(&self, table: Table, filter: Option<Filter>) -> Result<u64, QueryError> {
        let url = self.table_url(table).map_err(QueryError::transport)?;
        let request = self
            .client
            .head(url)
            .query(&count_params(filter.as_ref()))
            .header(PREFER, "count=exact");
        let response = self
            .endpoint
            .authorise(request, None)
            .send()
            .await
            .map_err(SendFailure::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_query_status(status, &[]));
        }
        let total = parse_total(response.headers().get(CONTENT_RANGE))?;
        debug!(%table, total, "counted rows");
        Ok(total)
    }

    async fn list(&self, query: ListQuery) -> Result<Vec<Record>, QueryError> {
        let url = self.table_url(query.table).map_err(QueryError::transport)?;
        let request = self.client.get(url).query(&list_params(&query));
        let response = self
            .endpoint
            .authorise(request, None)
            .send()
            .await
            .map_err(SendFailure::from)?;

        let status = response.status();
        let body = response.bytes().await.map_err(SendFailure::from)?;
        if !status.is_success() {
            return Err(map_query_status(status, body.as_ref()));
        }
        parse_records(body.as_ref())
    }

    async fn update(
        &self,
        table: Table,
        id: &str,
        fields: FieldUpdates,
    ) -> Result<(), UpdateError> {
        let url = self.table_url(table).map_err(UpdateError::transport)?;
        let request = self
            .client
            .patch(url)
            .query(&[id_eq(id)])
            .header(PREFER, "return=representation")
            .json(fields.as_record());
        let response = self
            .endpoint
            .authorise(request, None)
            .send()
            .await
            .map_err(SendFailure::from)?;

        let status = response.status();
        let body = response.bytes().await.map_err(SendFailure::from)?;
        if !status.is_success() {
            return Err(map_update_status(status, body.as_ref(), id));
        }
        let updated: Vec<Record> = serde_json::from_slice(body.as_ref())
            .map_err(|error| UpdateError::transport(format!("unreadable update response: {error}")))?;
        if updated.is_empty() {
            // Row filters that match nothing still answer 200 with `[]`.
            return Err(UpdateError::not_found(id));
        }
        debug!(%table, id, "row updated");
        Ok(())
    }
}
