use bazaar_app::database;
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct EnsureAppRoleArgs {
    /// Administrative Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Application runtime role name
    #[arg(long, default_value = "bazaar_app")]
    role_name: String,

    /// Application role password
    #[arg(long, env = "APP_DB_PASSWORD", hide_env_values = true)]
    password: String,
}

#[expect(clippy::print_stdout, reason = "CLI output for operators")]
pub(crate) async fn run(args: EnsureAppRoleArgs) -> Result<(), String> {
    if args.role_name.trim().is_empty() {
        return Err("role_name cannot be empty".to_string());
    }

    if args.password.trim().is_empty() {
        return Err("password cannot be empty".to_string());
    }

    // CREATE/ALTER ROLE needs an administrative connection, not the runtime role.
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    database::ensure_app_role(&pool, &args.role_name, &args.password)
        .await
        .map_err(|error| format!("failed to ensure app role: {error}"))?;

    println!("role {} is ready and subject to row-level security", args.role_name);

    Ok(())
}
