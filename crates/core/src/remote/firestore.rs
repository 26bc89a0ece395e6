use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};
use tokio::sync::mpsc;

use crate::config::RemoteConfig;
use crate::errors::CoreError;

use super::traits::{runtime, Document, DocumentStore, Listener, Snapshot};

const BASE_URL: &str = "https://firestore.googleapis.com/v1";
const PROVIDER: &str = "Firestore";

/// Firestore document store over the v1 REST API.
///
/// - `get`   → `GET    …/documents/{collection}/{uid}` (404 = absent)
/// - `set`   → `PATCH  …/documents/{collection}/{uid}`
/// - `merge` → `PATCH  …?updateMask.fieldPaths=…` (only the named fields)
///
/// REST has no push channel, so `listen` polls and emits only when the
/// document actually changed.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Client,
    config: RemoteConfig,
    id_token: Option<String>,
    poll_interval: Duration,
}

impl FirestoreStore {
    pub fn new(config: RemoteConfig, poll_interval: Duration) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            config,
            id_token: None,
            poll_interval,
        }
    }

    /// Authenticate requests with the signed-in user's Firebase ID token.
    pub fn with_id_token(mut self, token: impl Into<String>) -> Self {
        self.id_token = Some(token.into());
        self
    }

    /// REST URL of a user document (without query string).
    pub fn document_url(&self, doc_id: &str) -> String {
        format!(
            "{BASE_URL}/projects/{}/databases/{}/documents/{}/{}",
            self.config.project_id,
            self.config.database(),
            self.config.user_collection(),
            doc_id
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.query(&[("key", self.config.api_key.as_str())]);
        match &self.id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn patch(
        &self,
        doc_id: &str,
        fields: Document,
        mask: Option<Vec<String>>,
    ) -> Result<(), CoreError> {
        let mut request = self.client.patch(self.document_url(doc_id));
        if let Some(paths) = mask {
            let query: Vec<(&str, String)> = paths
                .into_iter()
                .map(|p| ("updateMask.fieldPaths", p))
                .collect();
            request = request.query(&query);
        }
        let body = FirestoreDocument {
            fields: encode_fields(&fields),
        };
        let resp = self.authorize(request).json(&body).send().await?;
        check_status(resp).await?;
        Ok(())
    }
}

impl std::fmt::Debug for FirestoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreStore")
            .field("project_id", &self.config.project_id)
            .field("authenticated", &self.id_token.is_some())
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

// ── Firestore REST wire types ───────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    fields: Map<String, Value>,
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, CoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("HTTP {status}: {}", body.trim()),
    })
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get(&self, doc_id: &str) -> Result<Snapshot, CoreError> {
        let request = self.client.get(self.document_url(doc_id));
        let resp = self.authorize(request).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = check_status(resp).await?;
        let doc: FirestoreDocument = resp.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse document {doc_id}: {e}"),
        })?;
        decode_fields(&doc.fields).map(Some)
    }

    async fn set(&self, doc_id: &str, document: Document) -> Result<(), CoreError> {
        self.patch(doc_id, document, None).await
    }

    async fn merge(&self, doc_id: &str, fields: Document) -> Result<(), CoreError> {
        let mask = fields.keys().cloned().collect();
        self.patch(doc_id, fields, Some(mask)).await
    }

    fn listen(&self, doc_id: &str) -> Result<Listener, CoreError> {
        let handle = runtime()?;
        let store = self.clone();
        let doc_id = doc_id.to_string();
        let (tx, rx) = mpsc::unbounded_channel();

        let feed = handle.spawn(async move {
            let mut last: Option<Snapshot> = None;
            loop {
                let event = match store.get(&doc_id).await {
                    Ok(snapshot) if last.as_ref() == Some(&snapshot) => None,
                    Ok(snapshot) => {
                        last = Some(snapshot.clone());
                        Some(Ok(snapshot))
                    }
                    Err(e) => Some(Err(e)),
                };
                if let Some(event) = event {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                tokio::time::sleep(store.poll_interval).await;
            }
        });

        Ok(Listener::new(rx, Some(feed)))
    }
}

// ── Value codec ─────────────────────────────────────────────────────

/// Encode a JSON value as a Firestore typed value.
pub fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // int64 travels as a decimal string
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(to_firestore_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Decode a Firestore typed value into plain JSON.
pub fn from_firestore_value(value: &Value) -> Result<Value, CoreError> {
    let (kind, inner) = value
        .as_object()
        .and_then(|obj| obj.iter().next())
        .ok_or_else(|| malformed(format!("expected a typed value, got {value}")))?;

    let decoded = match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().unwrap_or_default()),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            let parsed = parsed.ok_or_else(|| malformed(format!("bad integerValue {inner}")))?;
            Value::Number(Number::from(parsed))
        }
        "doubleValue" => {
            let f = inner.as_f64().ok_or_else(|| malformed(format!("bad doubleValue {inner}")))?;
            Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
        }
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(from_firestore_value).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default();
            Value::Array(values)
        }
        "mapValue" => {
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            Value::Object(decode_fields(&fields)?)
        }
        other => return Err(malformed(format!("unsupported value type '{other}'"))),
    };
    Ok(decoded)
}

/// Encode every field of a document.
pub fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), to_firestore_value(v)))
        .collect()
}

/// Decode every field of a Firestore `fields` map.
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Document, CoreError> {
    fields
        .iter()
        .map(|(k, v)| Ok((k.clone(), from_firestore_value(v)?)))
        .collect()
}

fn malformed(message: String) -> CoreError {
    CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Malformed document: {message}"),
    }
}
