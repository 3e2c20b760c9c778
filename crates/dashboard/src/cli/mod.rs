use std::{
    env, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::debug;
use tracing_subscriber::{EnvFilter, util::TryInitError};

use painel_app::domain::products::records::ProductUuid;
use painel_dashboard::{
    catalog::CatalogController,
    credentials::FileCredentialStore,
    edit::EditController,
    guard::{AccessGuard, GuardEffect},
    http::ApiClient,
    notifications::{self, Notification, NotificationKind, Notifier},
    session::{Session, SessionStore},
};

mod products;
mod render;
mod session;

const DEFAULT_CREDENTIALS_FILE: &str = ".painel/credentials.json";

#[derive(Debug, Parser)]
#[command(name = "painel", about = "Painel seller dashboard", long_about = None)]
pub(crate) struct Cli {
    /// Base URL of the Painel JSON API
    #[arg(
        long,
        env = "PAINEL_API_URL",
        default_value = "http://localhost:8698",
        global = true
    )]
    api_url: String,

    /// Session file; defaults to ~/.painel/credentials.json
    #[arg(long, env = "PAINEL_CREDENTIALS", global = true)]
    credentials: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login(session::LoginArgs),
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in seller
    Whoami,
    /// Manage the product catalog
    Products(products::ProductsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let credentials = self.credentials.unwrap_or_else(default_credentials_path);
        let mut dashboard = Dashboard::new(&self.api_url, &credentials);
        let mut out = io::stdout().lock();

        let result = match self.command {
            Commands::Login(args) => session::login(&dashboard, args, &mut out).await,
            Commands::Logout => session::logout(&dashboard, &mut out).await,
            Commands::Whoami => session::whoami(&dashboard, &mut out).await,
            Commands::Products(command) => products::run(&dashboard, command, &mut out).await,
        };

        dashboard
            .flush_notifications(&mut out)
            .map_err(|error| format!("failed to write output: {error}"))?;

        result
    }
}

/// Log to stderr, filtered by `RUST_LOG` (warnings by default).
pub(crate) fn init_logging() -> Result<(), TryInitError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,hyper=warn,reqwest=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr),
        )
        .try_init()
}

fn default_credentials_path() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(DEFAULT_CREDENTIALS_FILE)
}

/// Everything a command needs: the API client, the session store, and the
/// notification queue the controllers report into.
pub(crate) struct Dashboard {
    api: Arc<ApiClient>,
    sessions: Arc<SessionStore>,
    notifier: Notifier,
    inbox: mpsc::UnboundedReceiver<Notification>,
}

impl Dashboard {
    fn new(api_url: &str, credentials: &Path) -> Self {
        let api = Arc::new(ApiClient::new(api_url));
        let sessions = Arc::new(SessionStore::new(
            Arc::clone(&api) as _,
            Arc::new(FileCredentialStore::new(credentials)),
        ));
        let (notifier, inbox) = notifications::channel();

        debug!(credentials = %credentials.display(), "dashboard ready");

        Self {
            api,
            sessions,
            notifier,
            inbox,
        }
    }

    pub(crate) fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// The access guard for protected commands: the restored session, or
    /// an error pointing at `painel login`.
    pub(crate) async fn require_session(&self) -> Result<Session, String> {
        let state = self.sessions.restore().await;

        match AccessGuard::new().observe(&state) {
            GuardEffect::Render(session) => Ok(session),
            GuardEffect::Redirect(_) | GuardEffect::ShowLoading | GuardEffect::Unchanged => {
                Err("not signed in; run `painel login` first".to_string())
            }
        }
    }

    pub(crate) fn catalog(&self) -> CatalogController {
        CatalogController::new(
            Arc::clone(&self.api) as _,
            Arc::clone(&self.sessions),
            self.notifier.clone(),
        )
    }

    pub(crate) fn editor(&self, id: ProductUuid) -> EditController {
        EditController::new(
            id,
            Arc::clone(&self.api) as _,
            Arc::clone(&self.sessions),
            self.notifier.clone(),
        )
    }

    /// Print queued success notifications. Failures reach the user as the
    /// command's error instead.
    fn flush_notifications(&mut self, out: &mut impl io::Write) -> io::Result<()> {
        for notification in notifications::drain(&mut self.inbox) {
            match notification.kind {
                NotificationKind::Success => writeln!(out, "{}", notification.message)?,
                NotificationKind::Error => debug!(message = %notification.message, "notification"),
            }
        }

        Ok(())
    }
}
