//! Signed session cookies for logged-in hospitals.
//!
//! The cookie carries JSON claims (hospital id and expiry) signed with the
//! server key. The expiry inside the claims is what counts; the client-side
//! cookie lifetime is advisory only.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use axum_extra::extract::SignedCookieJar;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel_async::AsyncPgConnection;
use diesel_async::RunQueryDsl;
use http::request::Parts;
use serde::{Deserialize, Serialize};
use vaccination_management_database::models::Hospital;
use vaccination_management_database::schema::hospital;

use crate::error::AppError;

const COOKIE_NAME_SESSION: &str = "__Host-hospital-session";

const SESSION_VALIDITY_HOURS: i64 = 24;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClaims {
    pub hospital_id: i32,
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    #[must_use]
    pub fn issue(hospital_id: i32, now: DateTime<Utc>) -> Self {
        Self {
            hospital_id,
            expires_at: now + Duration::hours(SESSION_VALIDITY_HOURS),
        }
    }

    /// The embedded identity, unless the claims have expired at `now`.
    #[must_use]
    pub fn hospital_id(self, now: DateTime<Utc>) -> Option<i32> {
        (now < self.expires_at).then_some(self.hospital_id)
    }
}

/// Session state of the incoming request. An invalid signature, an
/// unparsable payload or an expired token all degrade to "no identity";
/// handlers branch on that and render the login prompt.
pub struct HospitalSession {
    jar: SignedCookieJar,
    identity: Option<i32>,
}

#[async_trait]
impl<S> FromRequestParts<S> for HospitalSession
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = core::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_headers(&parts.headers, Key::from_ref(state));
        let identity = jar
            .get(COOKIE_NAME_SESSION)
            .and_then(|cookie| serde_json::from_str::<SessionClaims>(cookie.value()).ok())
            .and_then(|claims| claims.hospital_id(Utc::now()));
        Ok(Self { jar, identity })
    }
}

impl HospitalSession {
    #[must_use]
    pub fn hospital_id(&self) -> Option<i32> {
        self.identity
    }

    /// Issues a fresh session for `hospital_id` and returns the jar to send
    /// with the response.
    #[must_use]
    pub fn log_in(self, hospital_id: i32) -> SignedCookieJar {
        let claims = SessionClaims::issue(hospital_id, Utc::now());
        // two integers and a timestamp serialize infallibly
        let value = serde_json::to_string(&claims).unwrap();
        self.jar.add(
            Cookie::build((COOKIE_NAME_SESSION, value))
                .http_only(true)
                .same_site(SameSite::Strict)
                .secure(true)
                .path("/")
                .build(),
        )
    }

    #[must_use]
    pub fn log_out(self) -> SignedCookieJar {
        self.jar
            .remove(Cookie::build(COOKIE_NAME_SESSION).path("/").build())
    }
}

/// Resolves a session identity to the hospital row. A stale id (row deleted
/// since login) counts as "not logged in".
pub async fn resolve_hospital(
    connection: &mut AsyncPgConnection,
    hospital_id: i32,
) -> Result<Option<Hospital>, AppError> {
    Ok(hospital::table
        .find(hospital_id)
        .select(Hospital::as_select())
        .first(connection)
        .await
        .optional()?)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::SessionClaims;

    #[test]
    fn accepted_one_minute_before_expiry() {
        let issued = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let claims = SessionClaims::issue(7, issued);
        let now = issued + Duration::hours(24) - Duration::minutes(1);
        assert_eq!(claims.hospital_id(now), Some(7));
    }

    #[test]
    fn rejected_one_minute_after_expiry() {
        let issued = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let claims = SessionClaims::issue(7, issued);
        let now = issued + Duration::hours(24) + Duration::minutes(1);
        assert_eq!(claims.hospital_id(now), None);
    }

    #[test]
    fn rejected_at_the_exact_expiry_instant() {
        let issued = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let claims = SessionClaims::issue(7, issued);
        assert_eq!(claims.hospital_id(claims.expires_at), None);
    }

    #[test]
    fn garbage_payloads_do_not_parse() {
        assert!(serde_json::from_str::<SessionClaims>("gibberish").is_err());
        assert!(serde_json::from_str::<SessionClaims>("{\"hospital_id\":1}").is_err());
    }
}
