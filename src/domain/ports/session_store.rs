use crate::domain::entities::ContactSession;
use chrono::{DateTime, Utc};

/// Client-side persistence of the single active contact session
pub trait ContactSessionStore: Send {
    /// Current session; an expired or unreadable session is cleared and reported as absent
    fn load(&mut self, now: DateTime<Utc>) -> Option<ContactSession>;

    /// Store a session, replacing any previous one
    fn save(&mut self, session: ContactSession);

    fn clear(&mut self);
}
