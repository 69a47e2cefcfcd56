use crate::domain::entities::{ContactSession, CONTACT_SESSION_COOKIE, CONTACT_SESSION_TTL_DAYS};
use crate::domain::ports::session_store::ContactSessionStore;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Contact session kept in the `ensol_contact_session` cookie
///
/// The value is the JSON session encoded as unpadded base64url. Hand the jar
/// back to axum with [`CookieSessionStore::into_jar`] so changes reach the
/// response.
pub struct CookieSessionStore {
    jar: CookieJar,
}

impl CookieSessionStore {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }

    fn update(&mut self, f: impl FnOnce(CookieJar) -> CookieJar) {
        let jar = std::mem::replace(&mut self.jar, CookieJar::new());
        self.jar = f(jar);
    }
}

impl ContactSessionStore for CookieSessionStore {
    fn load(&mut self, now: DateTime<Utc>) -> Option<ContactSession> {
        let raw = self.jar.get(CONTACT_SESSION_COOKIE)?.value().to_string();

        match decode_session(&raw) {
            Some(session) if !session.is_expired(now) => Some(session),
            Some(_) => {
                debug!("Contact session expired, clearing cookie");
                self.clear();
                None
            }
            None => {
                debug!("Unreadable contact session cookie, clearing it");
                self.clear();
                None
            }
        }
    }

    fn save(&mut self, session: ContactSession) {
        let Some(value) = encode_session(&session) else {
            return;
        };

        let cookie = Cookie::build((CONTACT_SESSION_COOKIE, value))
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(time::Duration::days(CONTACT_SESSION_TTL_DAYS));

        self.update(|jar| jar.add(cookie));
    }

    fn clear(&mut self) {
        self.update(|jar| jar.remove(Cookie::build(CONTACT_SESSION_COOKIE).path("/")));
    }
}

pub fn encode_session(session: &ContactSession) -> Option<String> {
    serde_json::to_vec(session)
        .ok()
        .map(|json| URL_SAFE_NO_PAD.encode(json))
}

pub fn decode_session(raw: &str) -> Option<ContactSession> {
    let bytes = URL_SAFE_NO_PAD.decode(raw.trim()).ok()?;
    serde_json::from_slice(&bytes).ok()
}
