use clap::Args;
use painel_app::{
    auth::{AuthService, AuthServiceError, DEFAULT_SESSION_TTL, PgAuthService, SessionToken},
    database,
};

#[derive(Debug, Args)]
pub(crate) struct RevokeSessionArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Bearer token of the session to revoke
    #[arg(long, hide_env_values = true, env = "PAINEL_SESSION_TOKEN")]
    token: String,
}

pub(crate) async fn run(args: RevokeSessionArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAuthService::new(pool, DEFAULT_SESSION_TTL);

    match service.sign_out(&SessionToken::new(args.token)).await {
        Ok(()) => println!("revoked session"),
        Err(AuthServiceError::NotFound) => println!("session was not active"),
        Err(error) => return Err(format!("failed to revoke session: {error}")),
    }

    Ok(())
}
