//! Auth Config

use clap::Args;

/// API token verification settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Server-side secret mixed into every stored token hash
    #[arg(long, env = "API_TOKEN_PEPPER", hide_env_values = true)]
    pub api_token_pepper: String,
}
