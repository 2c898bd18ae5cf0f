// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::{Claims, Role},
};

// Extrator para as rotas de admin: exige "Authorization: Bearer <token>" válido
pub struct AdminUser(pub Claims);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();

        if !app_state.auth_service.is_configured() {
            return Err(AppError::AdminNotConfigured.to_api_error(&locale));
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::InvalidToken.to_api_error(&locale))?;

        let claims = app_state
            .auth_service
            .validate_token(bearer.token())
            .map_err(|e| e.to_api_error(&locale))?;

        if claims.role != Role::Admin {
            return Err(AppError::InvalidToken.to_api_error(&locale));
        }

        Ok(AdminUser(claims))
    }
}
