//! Session guard for admin views.
//!
//! `Checking` until the first session lookup answers, then
//! `Authenticated` or `Unauthenticated`. A mounted guard follows session
//! changes until it is torn down. Unauthenticated visitors are sent to
//! the login path, which is itself never guarded.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::identity::Identity;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub identity: Identity,
    pub access_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Authenticated(Session),
    Unauthenticated,
}

/// What the guarded view should do right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Lookup in flight: show a placeholder, do not navigate.
    Loading,
    Render(Session),
    Redirect(String),
    /// The path is the login entry point.
    Unguarded,
}

/// Where sessions come from.
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn current(&self) -> Option<Session>;
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;
}

/// A session holder that notifies subscribers on sign in and out.
pub struct SessionStore {
    tx: watch::Sender<Option<Session>>,
}

impl SessionStore {
    pub fn new(initial: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn sign_in(&self, session: Session) {
        self.tx.send_replace(Some(session));
    }

    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[async_trait]
impl SessionSource for SessionStore {
    async fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

pub struct SessionGuard {
    state: GuardState,
    login_path: String,
    subscription: Option<watch::Receiver<Option<Session>>>,
}

impl SessionGuard {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            state: GuardState::Checking,
            login_path: login_path.into(),
            subscription: None,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Look the session up once and start following changes.
    ///
    /// Subscribes before the lookup so a change racing it is not lost.
    pub async fn mount(&mut self, source: &dyn SessionSource) {
        self.subscription = Some(source.subscribe());
        let session = source.current().await;
        self.apply(session);
    }

    /// Wait for the next session change and apply it.
    ///
    /// Returns `false` once torn down or when the source is gone.
    pub async fn changed(&mut self) -> bool {
        let Some(rx) = self.subscription.as_mut() else {
            return false;
        };
        if rx.changed().await.is_err() {
            return false;
        }
        let session = rx.borrow_and_update().clone();
        self.apply(session);
        true
    }

    pub fn apply(&mut self, session: Option<Session>) {
        self.state = match session {
            Some(s) => GuardState::Authenticated(s),
            None => GuardState::Unauthenticated,
        };
    }

    /// Stop following session changes.
    pub fn teardown(&mut self) {
        self.subscription = None;
    }

    pub fn decision(&self, path: &str) -> GuardDecision {
        if is_same_path(path, &self.login_path) {
            return GuardDecision::Unguarded;
        }
        match &self.state {
            GuardState::Checking => GuardDecision::Loading,
            GuardState::Authenticated(s) => GuardDecision::Render(s.clone()),
            GuardState::Unauthenticated => GuardDecision::Redirect(self.login_path.clone()),
        }
    }
}

fn is_same_path(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}
