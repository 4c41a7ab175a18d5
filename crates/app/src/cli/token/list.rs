use bazaar_app::{
    auth::{ApiTokenMetadata, PgAuthRepository},
    database,
};
use clap::Args;
use jiff::Timestamp;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ListTokensArgs {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Tenant whose tokens should be listed
    #[arg(long)]
    tenant_uuid: Uuid,

    /// Hide revoked and expired tokens
    #[arg(long)]
    active: bool,
}

#[expect(clippy::print_stdout, reason = "CLI output for operators")]
pub(crate) async fn run(args: ListTokensArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let now = Timestamp::now();

    let tokens: Vec<_> = PgAuthRepository::new(pool)
        .list_api_tokens_by_tenant(args.tenant_uuid.into())
        .await
        .map_err(|error| format!("failed to list tokens: {error}"))?
        .into_iter()
        .filter(|token| !args.active || token_state(token, now) == "active")
        .collect();

    if tokens.is_empty() {
        println!("no tokens found for tenant {}", args.tenant_uuid);
        return Ok(());
    }

    println!("token_uuid\tscope\tstate\tcreated_at\tlast_used_at");

    for token in tokens {
        let scope = token
            .user_uuid
            .map_or_else(|| "admin".to_string(), |user| format!("user:{user}"));

        let last_used = token
            .last_used_at
            .as_ref()
            .map_or_else(|| "never".to_string(), ToString::to_string);

        println!(
            "{}\t{scope}\t{}\t{}\t{last_used}",
            token.uuid,
            token_state(&token, now),
            token.created_at,
        );
    }

    Ok(())
}

fn token_state(token: &ApiTokenMetadata, now: Timestamp) -> &'static str {
    if token.revoked_at.is_some() {
        "revoked"
    } else if token.expires_at.is_some_and(|expires_at| expires_at <= now) {
        "expired"
    } else {
        "active"
    }
}
