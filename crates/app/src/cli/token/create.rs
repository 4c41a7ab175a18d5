use bazaar_app::{
    auth::{PgAuthService, TokenVerifier},
    database,
    domain::tenants::{PgTenantsService, TenantsService},
};
use clap::Args;
use jiff::Timestamp;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Tenant UUID that should own the token
    #[arg(long)]
    tenant_uuid: Uuid,

    /// Customer the token acts as; omit for a tenant admin token
    #[arg(long)]
    user_uuid: Option<Uuid>,

    /// Server-side pepper mixed into stored token verifiers
    #[arg(long, env = "API_TOKEN_PEPPER", hide_env_values = true)]
    token_pepper: String,

    /// Optional token expiration timestamp (RFC 3339)
    #[arg(long)]
    token_expires_at: Option<String>,
}

#[expect(clippy::print_stdout, reason = "CLI output for operators")]
pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    if args.token_pepper.is_empty() {
        return Err("token-pepper cannot be empty".to_string());
    }

    let token_expires_at = parse_token_expires_at(args.token_expires_at.as_deref())?;

    if let Some(expires_at) = token_expires_at.as_ref()
        && *expires_at <= Timestamp::now()
    {
        return Err("token-expires-at must be in the future".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let tenant = PgTenantsService::new(pool.clone())
        .get_tenant(args.tenant_uuid.into())
        .await
        .map_err(|error| format!("tenant {}: {error}", args.tenant_uuid))?;

    let service = PgAuthService::new(pool, TokenVerifier::new(args.token_pepper));

    let issued = service
        .issue_api_token(
            args.tenant_uuid.into(),
            args.user_uuid.map(Into::into),
            token_expires_at,
        )
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("tenant: {} ({})", tenant.name, issued.metadata.tenant_uuid);
    match issued.metadata.user_uuid {
        Some(user_uuid) => println!("user_uuid: {user_uuid}"),
        None => println!("scope: admin"),
    }
    println!("token_version: {}", issued.metadata.version.as_i16());
    println!("token_created_at: {}", issued.metadata.created_at);
    if let Some(expires_at) = issued.metadata.expires_at {
        println!("token_expires_at: {expires_at}");
    }
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}

fn parse_token_expires_at(raw: Option<&str>) -> Result<Option<Timestamp>, String> {
    raw.map(|value| {
        value
            .parse::<Timestamp>()
            .map_err(|error| format!("invalid token-expires-at timestamp: {error}"))
    })
    .transpose()
}
