use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::cookies::refresh_token;
use crate::inbound::http::router::AppState;

pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<ApiSuccess<RefreshResponseData>, ApiError> {
    let token = refresh_token(&jar).ok_or_else(ApiError::invalid_credentials)?;

    let auth_token = state.session_service.refresh(&token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RefreshResponseData { auth_token },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponseData {
    pub auth_token: String,
}
