//! Newznab indexer preflight checks.

use super::CheckResult;
use crate::models::config::Config;
use crate::services::newznab::NewznabClient;
use futures::future::join_all;

/// One result per enabled indexer, or a single failure when none is usable.
pub async fn check(config: &Config, client: reqwest::Client) -> Vec<CheckResult> {
    let indexers = config.enabled_indexers();
    if indexers.is_empty() {
        return vec![CheckResult::fail(
            "Indexers",
            "no enabled indexer with an API key",
            "Add an [[indexers]] entry with api_key to the config",
        )];
    }

    let checks = indexers.iter().map(|indexer| {
        let client = NewznabClient::new(indexer, config.max_results, client.clone());
        let name = format!("Indexer {}", indexer.name);
        async move {
            match client.health_check().await {
                Ok(true) => CheckResult::ok(&name, "reachable"),
                _ => CheckResult::fail(&name, "not reachable", "Check the indexer url and api_key"),
            }
        }
    });
    join_all(checks).await
}
