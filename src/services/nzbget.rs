//! NZBGet JSON-RPC client.

use super::DownloadClient;
use crate::models::config::NzbgetConfig;
use crate::models::release::ActiveDownload;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};

/// NZBGet client.
pub struct NzbgetClient {
    url: String,
    username: String,
    password: String,
    category: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Group {
    #[serde(rename = "NZBName", default)]
    nzb_name: String,
    #[serde(rename = "Status", default)]
    status: String,
}

impl NzbgetClient {
    pub fn new(config: &NzbgetConfig, client: reqwest::Client) -> Self {
        Self {
            url: config.url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            category: config.category.clone(),
            client,
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let payload = json!({ "method": method, "params": params });
        let resp = self
            .client
            .post(&self.url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::DownloadClient(format!(
                "{} returned HTTP {}",
                method,
                resp.status()
            )));
        }

        let body: RpcResponse = resp.json().await?;
        match body.error.filter(|e| !e.is_null()) {
            Some(error) => Err(Error::DownloadClient(format!("{} failed: {}", method, error))),
            None => Ok(body.result),
        }
    }

    /// Server version, used by preflight.
    pub async fn version(&self) -> Result<String> {
        let result = self.call("version", json!([])).await?;
        Ok(result.as_str().unwrap_or_default().to_string())
    }

    /// All groups in the queue.
    pub async fn listgroups(&self) -> Result<Vec<ActiveDownload>> {
        let result = self.call("listgroups", json!([])).await?;
        parse_groups(result)
    }

    /// Append an NZB to the queue.
    pub async fn append(&self, name: &str, payload: &[u8]) -> Result<bool> {
        let timestamp = chrono::Utc::now().timestamp();
        let params = build_append_params(name, payload, &self.category, timestamp);
        let result = self.call("append", params).await?;
        Ok(is_truthy(&result))
    }
}

#[async_trait]
impl DownloadClient for NzbgetClient {
    async fn active_downloads(&self) -> Result<Vec<ActiveDownload>> {
        let groups = self.listgroups().await?;
        for group in &groups {
            tracing::debug!("NZBGet group: {} ({})", group.name, group.status);
        }
        Ok(groups.into_iter().filter(ActiveDownload::is_live).collect())
    }

    async fn submit(&self, name: &str, payload: &[u8]) -> Result<bool> {
        self.append(name, payload).await
    }
}

/// Positional parameters of the `append` call.
///
/// The dupe key carries a timestamp so a resubmission is never folded into
/// an earlier attempt, and the dupe mode is `FORCE`.
pub fn build_append_params(name: &str, payload: &[u8], category: &str, timestamp: i64) -> Value {
    json!([
        name,
        STANDARD.encode(payload),
        category,
        0,
        false,
        false,
        format!("{}_{}", name, timestamp),
        0,
        "FORCE",
        []
    ])
}

/// Decode a `listgroups` result.
pub fn parse_groups(result: Value) -> Result<Vec<ActiveDownload>> {
    if result.is_null() {
        return Ok(Vec::new());
    }
    let groups: Vec<Group> = serde_json::from_value(result)?;
    Ok(groups
        .into_iter()
        .map(|g| ActiveDownload {
            name: g.nzb_name,
            status: g.status,
        })
        .collect())
}

/// NZBGet answers `append` with the new NZB id, or `true` on older versions.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n > 0),
        _ => false,
    }
}
