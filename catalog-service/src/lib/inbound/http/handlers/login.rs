use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::cookies::session_cookie;
use crate::inbound::http::router::AppState;
use crate::session::models::Username;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    let Json(body) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected login body");
        ApiError::BadRequest("Invalid request body".to_string())
    })?;

    if body.username.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    // An over-long username cannot belong to any record
    let username = Username::new(body.username).map_err(|_| ApiError::invalid_credentials())?;

    let outcome = state
        .session_service
        .login(LoginCommand::new(username, body.password))
        .await?;

    let cookie = session_cookie(
        outcome.refresh_token,
        state.session_policy.refresh_token_lifetime,
    );

    Ok((
        jar.add(cookie),
        ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                auth_token: outcome.access_token,
            },
        ),
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseData {
    pub auth_token: String,
}
