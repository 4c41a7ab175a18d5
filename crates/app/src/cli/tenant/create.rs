use bazaar_app::{
    database,
    domain::tenants::{PgTenantsService, TenantsService, data::NewTenant},
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateTenantArgs {
    /// Storefront display name
    #[arg(long)]
    name: String,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Tenant UUID to assign; generated when omitted
    #[arg(long)]
    tenant_uuid: Option<Uuid>,
}

#[expect(clippy::print_stdout, reason = "CLI output for operators")]
pub(crate) async fn run(args: CreateTenantArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let mut tenant = NewTenant::new(args.name);

    if let Some(uuid) = args.tenant_uuid {
        tenant = tenant.with_uuid(uuid.into());
    }

    let tenant = PgTenantsService::new(pool)
        .create_tenant(tenant)
        .await
        .map_err(|error| format!("failed to create tenant: {error}"))?;

    println!("tenant_uuid: {}", tenant.uuid);
    println!("tenant_name: {}", tenant.name);
    println!("next: bazaar-app token create --tenant-uuid {}", tenant.uuid);

    Ok(())
}
