//! NZBGet preflight check.

use super::CheckResult;
use crate::models::config::NzbgetConfig;
use crate::services::nzbget::NzbgetClient;

/// Check NZBGet answers JSON-RPC with the configured credentials.
pub async fn check(config: &NzbgetConfig, client: reqwest::Client) -> CheckResult {
    let nzbget = NzbgetClient::new(config, client);
    match nzbget.version().await {
        Ok(version) => CheckResult::ok("NZBGet", &format!("version {}", version)),
        Err(e) => CheckResult::fail(
            "NZBGet",
            &e.to_string(),
            &format!("Check nzbget.url ({}) and credentials", config.url),
        ),
    }
}
