//! Authorize command implementation.
//!
//! Runs the Trakt device flow and prints the token to put in the config.

use crate::models::config::{config_dir, Config};
use crate::services::http_client;
use crate::services::trakt::TraktAuthorizer;
use crate::Result;
use colored::Colorize;

/// Obtain a Trakt access token.
pub async fn authorize(config: &Config) -> Result<()> {
    println!("{}", "🔑 Authorizing with Trakt...".bold().cyan());
    println!();

    let authorizer = TraktAuthorizer::new(&config.trakt, http_client(config.request_timeout_secs)?)?;
    let code = authorizer.request_device_code().await?;

    println!("Follow these steps to authorize showfetch:");
    println!("  1. Go to: {}", code.verification_url.bold());
    println!("  2. Enter the code: {}", code.user_code.bold().yellow());
    println!("  3. This command continues once the code is approved.");
    println!();

    let token = authorizer.poll_for_token(&code).await?;

    println!("{}", "✅ Authorization successful!".green());
    println!();
    println!(
        "Add this to {}:",
        config_dir().join("config.local.toml").display()
    );
    println!();
    println!("[trakt]");
    println!("access_token = \"{}\"", token.access_token);

    Ok(())
}
