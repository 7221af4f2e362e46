//! Identity endpoints: the passkey gate, signup, login, and logout.
//!
//! The passkey step never becomes a client-side flag. A correct passkey
//! yields a short-lived signed gate token, and signup/login accept that
//! token to attach the role it selected. Everything else about the flow
//! is ordinary email-and-password.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gd_core::audit::AuditEntry;
use gd_core::error::AppError;
use gd_core::models::{non_blank, Account, Role};
use gd_core::traits::SessionClaims;

use crate::error::ApiResult;
use crate::handlers::record_audit;
use crate::state::AppState;

const MSG_BAD_PASSKEY: &str = "Invalid admin passkey.";
const MSG_GATE_EXPIRED: &str =
    "Admin passkey verification expired. Please verify the passkey again.";
const MSG_BAD_CREDENTIALS: &str = "Invalid email or password.";
const MSG_DUPLICATE_EMAIL: &str =
    "An account already exists with this email. Please sign in with your existing method.";

#[derive(Debug, Deserialize)]
pub struct PasskeyRequest {
    pub passkey: String,
}

#[derive(Debug, Serialize)]
pub struct PasskeyResponse {
    pub token: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub passkey_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub passkey_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: Account,
}

/// POST /api/auth/passkey
pub async fn verify_passkey(
    state: web::Data<AppState>,
    payload: web::Json<PasskeyRequest>,
) -> ApiResult<HttpResponse> {
    let role = state
        .auth
        .passkey_role(&payload.passkey)
        .ok_or_else(|| AppError::Unauthorized(MSG_BAD_PASSKEY.to_string()))?;
    let token = state.auth.issue_gate_token(role)?;
    Ok(HttpResponse::Ok().json(PasskeyResponse { token, role }))
}

/// POST /api/auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let name = payload.name.trim().to_string();
    let email = payload.email.trim().to_lowercase();
    if name.is_empty() || email.is_empty() || !email.contains('@') {
        return Err(AppError::ValidationError(
            "A name and a valid email address are required.".to_string(),
        )
        .into());
    }
    if payload.password.len() < 6 {
        return Err(AppError::ValidationError(
            "Password must be at least 6 characters.".to_string(),
        )
        .into());
    }

    if state.repo.find_account_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(MSG_DUPLICATE_EMAIL.to_string()).into());
    }

    // A stale gate token rejects the signup outright rather than silently
    // downgrading to an unprivileged account.
    let role = match &payload.passkey_token {
        Some(token) => state
            .auth
            .check_gate_token(token)
            .ok_or_else(|| AppError::Unauthorized(MSG_GATE_EXPIRED.to_string()))?,
        None => Role::User,
    };

    let password_hash = state.auth.hash_password(&payload.password)?;
    let now = Utc::now();
    let account = Account {
        id: Uuid::now_v7(),
        email: email.clone(),
        display_name: Some(name.clone()),
        photo_url: non_blank(payload.photo_url),
        password_hash: Some(password_hash),
        role,
        created_at: now,
        updated_at: now,
    };
    state.repo.upsert_account(account.clone()).await?;

    let claims = SessionClaims {
        account_id: account.id,
        role,
        name,
        email,
    };
    let token = state.auth.issue_session(&claims)?;

    record_audit(
        &state,
        AuditEntry::new("User Signup", "auth")
            .actor(claims.account_id, &claims.name, &claims.email)
            .role(role),
    );
    Ok(HttpResponse::Created().json(AuthResponse { token, user: account }))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let email = payload.email.trim().to_lowercase();

    let mut account = state
        .repo
        .find_account_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(MSG_BAD_CREDENTIALS.to_string()))?;
    // Federated accounts have no local hash and cannot password-login.
    let hash = account
        .password_hash
        .clone()
        .ok_or_else(|| AppError::Unauthorized(MSG_BAD_CREDENTIALS.to_string()))?;
    if !state.auth.verify_password(&payload.password, &hash) {
        return Err(AppError::Unauthorized(MSG_BAD_CREDENTIALS.to_string()).into());
    }

    // A valid gate token at login promotes the account to the role the
    // passkey selected, and the change sticks.
    if let Some(token) = &payload.passkey_token {
        let gated = state
            .auth
            .check_gate_token(token)
            .ok_or_else(|| AppError::Unauthorized(MSG_GATE_EXPIRED.to_string()))?;
        if gated != account.role {
            state.repo.set_account_role(account.id, gated).await?;
            account.role = gated;
        }
    }

    let claims = SessionClaims {
        account_id: account.id,
        role: account.role,
        name: account.display_name.clone().unwrap_or_default(),
        email: account.email.clone(),
    };
    let token = state.auth.issue_session(&claims)?;

    record_audit(
        &state,
        AuditEntry::new("User Login", "auth")
            .actor(claims.account_id, &claims.name, &claims.email)
            .role(account.role),
    );
    Ok(HttpResponse::Ok().json(AuthResponse { token, user: account }))
}

/// POST /api/auth/logout
///
/// Sessions are stateless tokens, so there is nothing to revoke; the
/// endpoint exists to close the audit trail when a valid session is still
/// attached.
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let claims = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| state.auth.check_session(token));
    if let Some(claims) = claims {
        record_audit(
            &state,
            AuditEntry::new("User Logout", "auth")
                .actor(claims.account_id, &claims.name, &claims.email)
                .role(claims.role),
        );
    }
    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}
