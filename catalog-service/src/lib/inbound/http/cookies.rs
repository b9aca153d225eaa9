use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::CookieJar;

/// Name of the cookie carrying the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// HTTP-only, secure cookie holding a freshly issued refresh token.
pub fn session_cookie(refresh_token: String, lifetime: chrono::Duration) -> Cookie<'static> {
    Cookie::build((REFRESH_TOKEN_COOKIE, refresh_token))
        .http_only(true)
        .secure(true)
        .path("/")
        .max_age(time::Duration::seconds(lifetime.num_seconds()))
        .build()
}

/// Cookie that instructs the client to drop the refresh token.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((REFRESH_TOKEN_COOKIE, ""))
        .http_only(true)
        .secure(true)
        .path("/")
        .max_age(time::Duration::ZERO)
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Refresh token presented by the client; an empty value counts as absent.
pub fn refresh_token(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("token".to_string(), chrono::Duration::days(7));

        assert_eq!(cookie.name(), "refreshToken");
        assert_eq!(cookie.value(), "token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604_800)));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie();

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_refresh_token_from_jar() {
        let jar = CookieJar::new();
        assert_eq!(refresh_token(&jar), None);

        let jar = jar.add(Cookie::new(REFRESH_TOKEN_COOKIE, ""));
        assert_eq!(refresh_token(&jar), None);

        let jar = jar.add(Cookie::new(REFRESH_TOKEN_COOKIE, "abc"));
        assert_eq!(refresh_token(&jar).as_deref(), Some("abc"));
    }
}
