use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::cookies::refresh_token;
use crate::inbound::http::cookies::removal_cookie;
use crate::inbound::http::router::AppState;

/// Revoke the presented refresh token.
///
/// The removal cookie is sent even when revocation fails.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<LogoutResponseData>), (CookieJar, ApiError)> {
    let Some(token) = refresh_token(&jar) else {
        return Err((jar, ApiError::invalid_credentials()));
    };

    let jar = jar.add(removal_cookie());

    match state.session_service.logout(&token).await {
        Ok(()) => Ok((
            jar,
            ApiSuccess::new(
                StatusCode::OK,
                LogoutResponseData {
                    message: "Logout successful".to_string(),
                },
            ),
        )),
        Err(e) => Err((jar, ApiError::from(e))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
