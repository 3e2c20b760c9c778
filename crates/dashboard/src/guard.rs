//! Access guard for protected views.

use tokio::sync::mpsc;

use crate::{
    routes::LOGIN_PATH,
    session::{Session, SessionState, SessionStore},
};

/// What the guard last saw of the session store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GuardState {
    /// The session store has not resolved yet.
    #[default]
    Pending,
    Authenticated(Session),
    Unauthenticated,
}

/// What the view should do after the guard observed a session change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardEffect {
    /// Show a loading indicator instead of protected content.
    ShowLoading,
    /// Render protected content for this session.
    Render(Session),
    /// Navigate away. Emitted once per entry into the unauthenticated state.
    Redirect(&'static str),
    /// Nothing changed for the view.
    Unchanged,
}

/// Gate in front of protected views.
///
/// Feed it every [`SessionState`] the store publishes and act on the returned
/// [`GuardEffect`].
#[derive(Debug, Default)]
pub struct AccessGuard {
    state: GuardState,
}

impl AccessGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// The session protected content may use. `None` unless authenticated,
    /// so repository calls cannot be made from any other state.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            GuardState::Authenticated(session) => Some(session),
            GuardState::Pending | GuardState::Unauthenticated => None,
        }
    }

    /// Record a session state and return what the view should do about it.
    pub fn observe(&mut self, session: &SessionState) -> GuardEffect {
        match session {
            SessionState::Unresolved => {
                self.state = GuardState::Pending;

                GuardEffect::ShowLoading
            }
            SessionState::Authenticated(session) => {
                if matches!(&self.state, GuardState::Authenticated(current) if current == session) {
                    return GuardEffect::Unchanged;
                }

                self.state = GuardState::Authenticated(session.clone());

                GuardEffect::Render(session.clone())
            }
            SessionState::Anonymous => {
                if self.state == GuardState::Unauthenticated {
                    return GuardEffect::Unchanged;
                }

                self.state = GuardState::Unauthenticated;

                GuardEffect::Redirect(LOGIN_PATH)
            }
        }
    }
}

/// An [`AccessGuard`] fed by a session store subscription.
#[derive(Debug)]
pub struct GuardWatcher {
    guard: AccessGuard,
    updates: mpsc::UnboundedReceiver<SessionState>,
}

impl GuardWatcher {
    pub async fn new(store: &SessionStore) -> Self {
        Self {
            guard: AccessGuard::new(),
            updates: store.subscribe().await,
        }
    }

    #[must_use]
    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    /// Wait for the next session change and evaluate it. `None` once the
    /// store is gone.
    pub async fn next(&mut self) -> Option<GuardEffect> {
        let state = self.updates.recv().await?;

        Some(self.guard.observe(&state))
    }

    /// Evaluate every change already queued, returning the effects that
    /// changed the view.
    pub fn poll(&mut self) -> Vec<GuardEffect> {
        let mut effects = Vec::new();

        while let Ok(state) = self.updates.try_recv() {
            let effect = self.guard.observe(&state);

            if effect != GuardEffect::Unchanged {
                effects.push(effect);
            }
        }

        effects
    }
}
