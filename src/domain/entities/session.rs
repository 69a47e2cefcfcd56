use crate::domain::entities::IdentificationMethod;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Name of the cookie holding the contact session
pub const CONTACT_SESSION_COOKIE: &str = "ensol_contact_session";

/// Contact sessions are honoured for 30 days
pub const CONTACT_SESSION_TTL_DAYS: i64 = 30;

/// Remembered identification, used to resume a known contact on return visits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSession {
    pub method: IdentificationMethod,
    pub value: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl ContactSession {
    pub fn new(method: IdentificationMethod, value: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            method,
            value: value.into(),
            timestamp: now.timestamp_millis(),
        }
    }

    pub fn ttl() -> Duration {
        Duration::days(CONTACT_SESSION_TTL_DAYS)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.timestamp < (now - Self::ttl()).timestamp_millis()
    }
}
