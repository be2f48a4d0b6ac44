//! Login, registration and logout against the backend's user and session
//! concepts. Only the glue needed to populate a [`Session`] lives here.

use crate::backend::Backend;
use crate::error::Result;
use crate::models::UserId;
use crate::session::{Identity, Session, SessionFile};

pub struct Authenticator {
    backend: Backend,
    session: Session,
    file: Option<SessionFile>,
}

impl Authenticator {
    pub fn new(backend: Backend, session: Session, file: Option<SessionFile>) -> Self {
        Self {
            backend,
            session,
            file,
        }
    }

    /// Load a previously persisted identity into the session.
    /// Returns whether someone is now signed in.
    pub fn restore(&self) -> bool {
        let Some(file) = &self.file else {
            return self.session.is_authenticated();
        };
        match file.load() {
            Ok(Some(identity)) => {
                tracing::debug!(user = %identity.user, "restored session");
                self.session.set(identity);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring unreadable session file: {:#}", e),
        }
        self.session.is_authenticated()
    }

    /// Authenticate, then open a backend session for the user.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserId> {
        let user = self.backend.login(username, password).await?;
        let token = self.backend.create_session(&user).await?;

        let identity = Identity {
            user: user.clone(),
            session: token,
        };
        if let Some(file) = &self.file {
            if let Err(e) = file.save(&identity) {
                tracing::warn!("Failed to persist session: {:#}", e);
            }
        }
        self.session.set(identity);

        tracing::info!(%user, "logged in");
        Ok(user)
    }

    /// Create the account, then log straight in.
    pub async fn register(&self, username: &str, password: &str) -> Result<UserId> {
        self.backend.register(username, password).await?;
        self.login(username, password).await
    }

    /// End the session. Backend and file cleanup are best effort; the local
    /// identity is always cleared.
    pub async fn logout(&self) {
        if let Some(identity) = self.session.identity() {
            if let Err(e) = self.backend.delete_session(&identity.session).await {
                tracing::warn!("Error deleting session: {}", e);
            }
        }
        self.session.clear();
        if let Some(file) = &self.file {
            if let Err(e) = file.clear() {
                tracing::warn!("Failed to remove session file: {:#}", e);
            }
        }
    }
}
