use std::io;

use clap::Args;

use painel_app::auth::Credentials;
use painel_dashboard::session::SessionError;

use super::{Dashboard, render};

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Login email
    #[arg(long)]
    email: String,

    /// Login password
    #[arg(long, env = "PAINEL_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn login(
    dashboard: &Dashboard,
    args: LoginArgs,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let session = dashboard
        .sessions()
        .sign_in(Credentials {
            email: args.email,
            password: args.password,
        })
        .await
        .map_err(|error| match error {
            SessionError::InvalidCredentials => "invalid email or password".to_string(),
            other => format!("failed to sign in: {other}"),
        })?;

    render::write_session(out, &session).map_err(|error| error.to_string())
}

pub(crate) async fn logout(dashboard: &Dashboard, out: &mut impl io::Write) -> Result<(), String> {
    dashboard.sessions().sign_out().await;

    writeln!(out, "Signed out").map_err(|error| error.to_string())
}

pub(crate) async fn whoami(dashboard: &Dashboard, out: &mut impl io::Write) -> Result<(), String> {
    let session = dashboard.require_session().await?;

    render::write_session(out, &session).map_err(|error| error.to_string())
}
