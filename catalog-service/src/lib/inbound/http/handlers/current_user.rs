use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

pub async fn current_user(
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<CurrentUserData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        CurrentUserData {
            user_id: user.user_id.to_string(),
            username: user.username,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserData {
    pub user_id: String,
    pub username: String,
}
