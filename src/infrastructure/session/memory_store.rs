use crate::domain::entities::ContactSession;
use crate::domain::ports::session_store::ContactSessionStore;
use chrono::{DateTime, Utc};

/// Process-local session store, for clients without a cookie jar
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    session: Option<ContactSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: ContactSession) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// Stored session without expiry handling
    pub fn peek(&self) -> Option<&ContactSession> {
        self.session.as_ref()
    }
}

impl ContactSessionStore for MemorySessionStore {
    fn load(&mut self, now: DateTime<Utc>) -> Option<ContactSession> {
        match &self.session {
            Some(session) if session.is_expired(now) => {
                self.session = None;
                None
            }
            other => other.clone(),
        }
    }

    fn save(&mut self, session: ContactSession) {
        self.session = Some(session);
    }

    fn clear(&mut self) {
        self.session = None;
    }
}
