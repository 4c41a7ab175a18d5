use bazaar_app::{
    database,
    domain::tenants::{PgTenantsService, TenantsService},
};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct ListTenantsArgs {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

#[expect(clippy::print_stdout, reason = "CLI output for operators")]
pub(crate) async fn run(args: ListTenantsArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let tenants = PgTenantsService::new(pool)
        .list_tenants()
        .await
        .map_err(|error| format!("failed to list tenants: {error}"))?;

    if tenants.is_empty() {
        println!("no tenants found");
    }

    for tenant in tenants {
        println!("{}\t{}\t{}", tenant.uuid, tenant.created_at, tenant.name);
    }

    Ok(())
}
