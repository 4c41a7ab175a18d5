//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, query, query_scalar};

use crate::domain::tenants::records::TenantUuid;

/// SQL used to set tenant context for row-level security.
pub const SET_TENANT_CONTEXT_SQL: &str = "SELECT set_config('app.current_tenant_uuid', $1, true)";

const ROLE_BYPASSES_RLS_SQL: &str =
    "SELECT rolsuper OR rolbypassrls FROM pg_roles WHERE rolname = current_user";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction and set tenant context for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting tenant context fails.
    pub async fn begin_tenant_transaction(
        &self,
        tenant: TenantUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_TENANT_CONTEXT_SQL)
            .bind(tenant.into_uuid().to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Returns `true` when the connected role can see every tenant's rows.
///
/// # Errors
///
/// Returns an error if the role attributes cannot be read.
pub async fn role_bypasses_rls(pool: &PgPool) -> Result<bool, sqlx::Error> {
    query_scalar::<Postgres, bool>(ROLE_BYPASSES_RLS_SQL)
        .fetch_one(pool)
        .await
}

/// Creates or updates the runtime login role and grants it data access on the
/// current database.
///
/// The role is always left without `SUPERUSER` or `BYPASSRLS`, so every query it
/// runs is subject to the tenant policies.
///
/// # Errors
///
/// Returns an error if any statement fails; nothing is committed in that case.
pub async fn ensure_app_role(
    pool: &PgPool,
    role_name: &str,
    password: &str,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    // Identifiers cannot be bound, so quote them server-side before interpolating.
    let role: String = query_scalar("SELECT quote_ident($1)")
        .bind(role_name)
        .fetch_one(&mut *tx)
        .await?;

    let password: String = query_scalar("SELECT quote_literal($1)")
        .bind(password)
        .fetch_one(&mut *tx)
        .await?;

    let database: String = query_scalar("SELECT quote_ident(current_database())")
        .fetch_one(&mut *tx)
        .await?;

    let exists: bool = query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
        .bind(role_name)
        .fetch_one(&mut *tx)
        .await?;

    let verb = if exists { "ALTER" } else { "CREATE" };

    let statements = [
        format!(
            "{verb} ROLE {role} LOGIN PASSWORD {password} \
             NOSUPERUSER NOCREATEDB NOCREATEROLE NOREPLICATION NOBYPASSRLS"
        ),
        format!("GRANT CONNECT ON DATABASE {database} TO {role}"),
        format!("GRANT USAGE ON SCHEMA public TO {role}"),
        format!("GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {role}"),
        format!("GRANT USAGE, SELECT, UPDATE ON ALL SEQUENCES IN SCHEMA public TO {role}"),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public \
             GRANT SELECT, INSERT, UPDATE, DELETE ON TABLES TO {role}"
        ),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public \
             GRANT USAGE, SELECT, UPDATE ON SEQUENCES TO {role}"
        ),
    ];

    for statement in statements {
        query(&statement).execute(&mut *tx).await?;
    }

    tx.commit().await
}

/// Converts a money or quantity value into its `BIGINT` column form.
pub(crate) fn to_bigint(value: u64, column: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|error| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    })
}

/// Reads a non-negative `BIGINT` column back into `u64`.
pub(crate) fn from_bigint(value: i64, column: &str) -> Result<u64, sqlx::Error> {
    u64::try_from(value).map_err(|error| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    })
}
