//! Admin dashboard endpoints: accounts, role management, the audit trail,
//! and the derived analytics views.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use gd_core::analytics;
use gd_core::audit::AuditEntry;
use gd_core::error::AppError;
use gd_core::models::Role;

use crate::error::ApiResult;
use crate::handlers::record_audit;
use crate::middleware::AdminUser;
use crate::state::AppState;

const DEFAULT_LOG_LIMIT: i64 = 50;
const MAX_LOG_LIMIT: i64 = 200;

/// GET /api/users
pub async fn list_users(state: web::Data<AppState>, _admin: AdminUser) -> HttpResponse {
    let accounts = state.repo.list_accounts().await.unwrap_or_else(|err| {
        log::warn!("account list read failed, serving empty list: {err:#}");
        Vec::new()
    });
    HttpResponse::Ok().json(accounts)
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    pub role: Role,
}

/// PUT /api/users/{id}/role
pub async fn set_user_role(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<Uuid>,
    payload: web::Json<RoleUpdate>,
) -> ApiResult<HttpResponse> {
    // Admins administer content; only a super admin hands out roles.
    if admin.0.role != Role::SuperAdmin {
        return Err(AppError::Forbidden(
            "Only a super admin can change account roles.".to_string(),
        )
        .into());
    }

    let id = path.into_inner();
    let role = payload.into_inner().role;
    if !state.repo.set_account_role(id, role).await? {
        return Err(AppError::NotFound("Account".to_string(), id.to_string()).into());
    }

    record_audit(
        &state,
        AuditEntry::new("Updated User Role", "update")
            .actor(admin.0.account_id, &admin.0.name, &admin.0.email)
            .role(admin.0.role)
            .details(serde_json::json!({ "targetId": id, "role": role })),
    );
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<i64>,
}

/// GET /api/logs?limit=
pub async fn recent_logs(
    state: web::Data<AppState>,
    _admin: AdminUser,
    query: web::Query<LogsQuery>,
) -> HttpResponse {
    let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);
    let logs = state.repo.recent_logs(limit).await.unwrap_or_else(|err| {
        log::warn!("system log read failed, serving empty list: {err:#}");
        Vec::new()
    });
    HttpResponse::Ok().json(logs)
}

/// GET /api/analytics
pub async fn analytics(state: web::Data<AppState>, _admin: AdminUser) -> HttpResponse {
    let snapshot = analytics::compute_snapshot(state.repo.as_ref()).await;
    HttpResponse::Ok().json(snapshot)
}

/// GET /api/analytics/downloads
pub async fn download_totals(state: web::Data<AppState>, _admin: AdminUser) -> HttpResponse {
    let breakdown = analytics::download_breakdown(state.repo.as_ref()).await;
    HttpResponse::Ok().json(breakdown)
}
