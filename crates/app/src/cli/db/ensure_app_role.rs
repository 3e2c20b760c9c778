use clap::Args;
use painel_app::database;
use sqlx::{Postgres, Transaction, query, query_scalar};

/// Flags that keep the runtime role subject to row-level security.
const RUNTIME_ROLE_FLAGS: &str =
    "LOGIN NOSUPERUSER NOCREATEDB NOCREATEROLE NOREPLICATION NOBYPASSRLS";

#[derive(Debug, Args)]
pub(crate) struct EnsureAppRoleArgs {
    /// Administrative PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Role the API server connects as
    #[arg(long, default_value = "painel_app")]
    role_name: String,

    /// Password for the runtime role
    #[arg(long, env = "APP_DB_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(args: EnsureAppRoleArgs) -> Result<(), String> {
    if args.role_name.trim().is_empty() {
        return Err("role_name cannot be empty".to_string());
    }

    if args.password.trim().is_empty() {
        return Err("password cannot be empty".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|error| format!("failed to start transaction: {error}"))?;

    // Role names cannot be bound as parameters; let the server quote them.
    let role = quote(&mut tx, "SELECT quote_ident($1)", &args.role_name).await?;
    let password = quote(&mut tx, "SELECT quote_literal($1)", &args.password).await?;

    let exists: bool = query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
        .bind(&args.role_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to look up role: {error}"))?;

    let verb = if exists { "ALTER" } else { "CREATE" };

    let database: String = query_scalar("SELECT quote_ident(current_database())")
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to resolve database name: {error}"))?;

    let statements = [
        format!("{verb} ROLE {role} PASSWORD {password} {RUNTIME_ROLE_FLAGS}"),
        format!("GRANT CONNECT ON DATABASE {database} TO {role}"),
        format!("GRANT USAGE ON SCHEMA public TO {role}"),
        format!("GRANT SELECT, INSERT, UPDATE, DELETE ON sellers, sessions, products TO {role}"),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public GRANT SELECT, INSERT, UPDATE, DELETE ON TABLES TO {role}"
        ),
    ];

    for statement in statements {
        query(&statement)
            .execute(&mut *tx)
            .await
            .map_err(|error| format!("failed to apply `{verb} ROLE`/grant step: {error}"))?;
    }

    tx.commit()
        .await
        .map_err(|error| format!("failed to commit changes: {error}"))?;

    println!("ensured app role: {}", args.role_name);

    Ok(())
}

async fn quote(
    tx: &mut Transaction<'_, Postgres>,
    sql: &'static str,
    value: &str,
) -> Result<String, String> {
    query_scalar(sql)
        .bind(value)
        .fetch_one(&mut **tx)
        .await
        .map_err(|error| format!("failed to quote value: {error}"))
}
