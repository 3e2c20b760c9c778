//! Auth Config

use clap::Args;
use jiff::SignedDuration;

/// Session settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Lifetime of a session issued at sign-in, in minutes
    #[arg(
        long,
        env = "SESSION_TTL_MINUTES",
        default_value_t = 720,
        value_parser = clap::value_parser!(i64).range(1..=525_600)
    )]
    pub session_ttl_minutes: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn session_ttl(&self) -> SignedDuration {
        SignedDuration::from_mins(self.session_ttl_minutes)
    }
}
