use bazaar_app::{auth::PgAuthRepository, database};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct RevokeTokenArgs {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Tenant that owns the token
    #[arg(long)]
    tenant_uuid: Uuid,

    /// Token to revoke
    #[arg(long)]
    token_uuid: Uuid,
}

#[expect(clippy::print_stdout, reason = "CLI output for operators")]
pub(crate) async fn run(args: RevokeTokenArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let revoked = PgAuthRepository::new(pool)
        .revoke_api_token(args.tenant_uuid.into(), args.token_uuid)
        .await
        .map_err(|error| format!("failed to revoke token: {error}"))?;

    match revoked {
        Some(token_uuid) => println!("revoked token {token_uuid}"),
        None => {
            return Err(format!(
                "no active token {} for tenant {}",
                args.token_uuid, args.tenant_uuid
            ));
        }
    }

    Ok(())
}
