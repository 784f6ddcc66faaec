//! The request collaborator used by paginated sequences

use super::client::{HttpClient, RequestConfig};
use crate::error::Result;
use crate::types::{JsonValue, Method, StringMap};
use async_trait::async_trait;
use serde_json::Value;

/// Performs one API request and returns the decoded JSON body
///
/// This is the only capability the pagination engine needs from the outside
/// world. Anything that can turn `(method, path, params)` into a JSON document
/// can back a [`Cursor`](crate::pagination::Cursor).
#[async_trait]
pub trait Requester: Send + Sync {
    async fn perform_request(
        &self,
        method: Method,
        path: &str,
        params: &StringMap,
    ) -> Result<JsonValue>;
}

#[async_trait]
impl Requester for HttpClient {
    async fn perform_request(
        &self,
        method: Method,
        path: &str,
        params: &StringMap,
    ) -> Result<JsonValue> {
        let mut config = RequestConfig::new();
        if method.uses_query() {
            config.query = params.clone();
        } else if method.uses_json_body() {
            let body: serde_json::Map<String, Value> = params
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            config = config.json(Value::Object(body));
        } else if !params.is_empty() {
            config = config.form(params.clone());
        }

        self.request_value(method.into(), path, config).await
    }
}
