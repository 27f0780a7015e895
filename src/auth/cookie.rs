//! Defines functions for handling user sessions with cookies.
//!
//! The whole [AuthSession] is stored as JSON in a single private cookie, so
//! the server holds no per-user session state. The cookie is encrypted and
//! signed by the [PrivateCookieJar], which keeps the backend id token out of
//! the client's reach.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, backend::AuthSession};

pub(crate) const COOKIE_SESSION: &str = "session";
/// The default duration for which session cookies are valid.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::hours(12);

/// Add a session cookie to the cookie jar, indicating that a user is logged
/// in and authenticated.
///
/// Sets the expiry of the cookie to `duration` from the current time.
/// You can use [DEFAULT_COOKIE_DURATION] for the default duration.
///
/// Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns a [serde_json::Error] if the session cannot be serialized.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    session: &AuthSession,
    duration: Duration,
) -> Result<PrivateCookieJar, serde_json::Error> {
    let expiry = OffsetDateTime::now_utc() + duration;
    let session_string = serde_json::to_string(session)?;

    Ok(jar.add(
        Cookie::build((COOKIE_SESSION, session_string))
            .expires(expiry)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the session cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session stored in the cookie jar.
///
/// # Errors
///
/// Returns [Error::SessionExpired] if the session cookie is missing or its
/// contents cannot be decoded.
pub(crate) fn get_session_from_cookies(jar: &PrivateCookieJar) -> Result<AuthSession, Error> {
    let cookie = jar.get(COOKIE_SESSION).ok_or(Error::SessionExpired)?;

    serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::SessionExpired)
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{Error, backend::AuthSession};

    use super::{
        COOKIE_SESSION, DEFAULT_COOKIE_DURATION, get_session_from_cookies,
        invalidate_session_cookie, set_session_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    fn test_session() -> AuthSession {
        AuthSession {
            user_id: "abc123".to_owned(),
            email: "test@example.com".to_owned(),
            id_token: "token".to_owned(),
        }
    }

    #[test]
    fn can_set_and_read_session_cookie() {
        let session = test_session();

        let jar = set_session_cookie(get_jar(), &session, DEFAULT_COOKIE_DURATION).unwrap();
        let retrieved_session = get_session_from_cookies(&jar).unwrap();

        assert_eq!(retrieved_session, session);
    }

    #[test]
    fn session_cookie_expires_after_duration() {
        let jar = set_session_cookie(get_jar(), &test_session(), DEFAULT_COOKIE_DURATION).unwrap();
        let cookie = jar.get(COOKIE_SESSION).unwrap();

        let expiry = cookie.expires_datetime().unwrap();
        let want = OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION;

        assert!(
            (expiry - want).abs() < Duration::seconds(1),
            "got expiry {expiry:?}, want {want:?}"
        );
    }

    #[test]
    fn missing_cookie_is_an_expired_session() {
        assert_eq!(
            get_session_from_cookies(&get_jar()),
            Err(Error::SessionExpired)
        );
    }

    #[test]
    fn garbled_cookie_is_an_expired_session() {
        let jar = get_jar().add(
            axum_extra::extract::cookie::Cookie::build((COOKIE_SESSION, "not json")).build(),
        );

        assert_eq!(get_session_from_cookies(&jar), Err(Error::SessionExpired));
    }

    #[test]
    fn invalidate_session_cookie_succeeds() {
        let jar = set_session_cookie(get_jar(), &test_session(), DEFAULT_COOKIE_DURATION).unwrap();

        let jar = invalidate_session_cookie(jar);
        let cookie = jar.get(COOKIE_SESSION).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));

        assert_eq!(get_session_from_cookies(&jar), Err(Error::SessionExpired));
    }
}
