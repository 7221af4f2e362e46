//! Middleware and request guards for the GradDrive API.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::middleware::Logger;
use actix_web::{web, FromRequest, HttpRequest};
use actix_cors::Cors;
use std::future::{ready, Ready};

use gd_core::error::AppError;
use gd_core::traits::SessionClaims;

use crate::error::ApiError;
use crate::state::AppState;

// Returns a standard set of middleware for the GradDrive API.
pub fn standard_middleware() -> Logger {
    // We use the 'default' logger which outputs:
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    Logger::default()
}

// Configures CORS (Cross-Origin Resource Sharing)
// Important if the dashboards and API ever live on different subdomains.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allow_any_header()
        .max_age(3600)
}

/// Request guard for admin-only endpoints. Extraction checks the bearer
/// session token and the role it carries; handlers taking an `AdminUser`
/// never see an unprivileged caller.
pub struct AdminUser(pub SessionClaims);

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_admin(req))
    }
}

fn extract_admin(req: &HttpRequest) -> Result<AdminUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError(AppError::Internal("application state missing".to_string())))?;

    let token = bearer_token(req).ok_or_else(|| {
        ApiError(AppError::Unauthorized("Authentication required.".to_string()))
    })?;
    let claims = state.auth.check_session(token).ok_or_else(|| {
        ApiError(AppError::Unauthorized(
            "Session expired. Please sign in again.".to_string(),
        ))
    })?;

    if !claims.role.is_admin() {
        return Err(ApiError(AppError::Forbidden(
            "Admin access required.".to_string(),
        )));
    }
    Ok(AdminUser(claims))
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
