//! Trakt API preflight check.

use super::CheckResult;
use crate::models::config::TraktConfig;
use crate::services::trakt::TraktClient;

/// Check the Trakt token is accepted.
pub async fn check(config: &TraktConfig, client: reqwest::Client) -> CheckResult {
    match TraktClient::new(config, client) {
        Ok(trakt) => match trakt.verify_token().await {
            Ok(true) => CheckResult::ok("Trakt API", "authorized"),
            Ok(false) => CheckResult::fail(
                "Trakt API",
                "access token rejected",
                "Run `showfetch authorize` to get a new token",
            ),
            Err(_) => CheckResult::fail(
                "Trakt API",
                "connection failed",
                "Check your network connection",
            ),
        },
        Err(_) => CheckResult::fail(
            "Trakt API",
            "client id or access token not configured",
            "Set trakt.client_id and run `showfetch authorize`",
        ),
    }
}
