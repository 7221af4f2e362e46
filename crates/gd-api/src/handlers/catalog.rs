//! CRUD endpoints for the four portal collections.
//!
//! Reads are resilient: a failed collection read serves an empty list and
//! a warning instead of a 500, so one bad table never blanks a whole
//! dashboard. Mutations are admin-gated and strict.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use gd_core::audit::AuditEntry;
use gd_core::error::AppError;
use gd_core::models::{
    non_blank, AssetKind, AssetPatch, EbookPatch, NewAsset, NewEbook, NewPhotographer,
    PhotographerPatch,
};

use crate::error::ApiResult;
use crate::handlers::record_audit;
use crate::middleware::AdminUser;
use crate::state::AppState;

/// Display name used in audit actions and not-found messages.
fn kind_title(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Poster => "Poster",
        AssetKind::CapDesign => "Cap Design",
    }
}

// ── Posters and cap designs ─────────────────────────────────────────────────

async fn asset_list(state: web::Data<AppState>, kind: AssetKind) -> HttpResponse {
    let items = state.repo.list_assets(kind).await.unwrap_or_else(|err| {
        log::warn!("{} list read failed, serving empty list: {err:#}", kind.label());
        Vec::new()
    });
    HttpResponse::Ok().json(items)
}

async fn asset_get(
    state: web::Data<AppState>,
    kind: AssetKind,
    id: Uuid,
) -> ApiResult<HttpResponse> {
    let asset = state
        .repo
        .get_asset(kind, id)
        .await?
        .ok_or_else(|| AppError::NotFound(kind_title(kind).to_string(), id.to_string()))?;
    Ok(HttpResponse::Ok().json(asset))
}

async fn asset_create(
    state: web::Data<AppState>,
    admin: AdminUser,
    kind: AssetKind,
    mut data: NewAsset,
) -> ApiResult<HttpResponse> {
    if data.name.trim().is_empty() || data.description.trim().is_empty() {
        return Err(
            AppError::ValidationError("A name and a description are required.".to_string()).into(),
        );
    }
    // Attribution comes from the session, never from the payload.
    data.uploaded_by = Some(admin.0.account_id.to_string());
    data.uploaded_by_name = non_blank(Some(admin.0.name.clone()));

    let id = state.repo.add_asset(kind, data).await?;
    let stored = state
        .repo
        .get_asset(kind, id)
        .await?
        .ok_or_else(|| AppError::NotFound(kind_title(kind).to_string(), id.to_string()))?;

    record_audit(
        &state,
        AuditEntry::new(format!("Added {}", kind_title(kind)), "create")
            .actor(admin.0.account_id, &admin.0.name, &admin.0.email)
            .role(admin.0.role)
            .details(serde_json::json!({ "id": id, "name": stored.name })),
    );
    Ok(HttpResponse::Created().json(stored))
}

async fn asset_update(
    state: web::Data<AppState>,
    admin: AdminUser,
    kind: AssetKind,
    id: Uuid,
    patch: AssetPatch,
) -> ApiResult<HttpResponse> {
    if !state.repo.update_asset(kind, id, patch).await? {
        return Err(AppError::NotFound(kind_title(kind).to_string(), id.to_string()).into());
    }
    let stored = state
        .repo
        .get_asset(kind, id)
        .await?
        .ok_or_else(|| AppError::NotFound(kind_title(kind).to_string(), id.to_string()))?;

    record_audit(
        &state,
        AuditEntry::new(format!("Updated {}", kind_title(kind)), "update")
            .actor(admin.0.account_id, &admin.0.name, &admin.0.email)
            .role(admin.0.role)
            .details(serde_json::json!({ "id": id, "name": stored.name })),
    );
    Ok(HttpResponse::Ok().json(stored))
}

async fn asset_delete(
    state: web::Data<AppState>,
    admin: AdminUser,
    kind: AssetKind,
    id: Uuid,
) -> ApiResult<HttpResponse> {
    if !state.repo.delete_asset(kind, id).await? {
        return Err(AppError::NotFound(kind_title(kind).to_string(), id.to_string()).into());
    }
    record_audit(
        &state,
        AuditEntry::new(format!("Deleted {}", kind_title(kind)), "delete")
            .actor(admin.0.account_id, &admin.0.name, &admin.0.email)
            .role(admin.0.role)
            .details(serde_json::json!({ "id": id })),
    );
    Ok(HttpResponse::NoContent().finish())
}

/// Public endpoint behind the download buttons. Bumps are monotonic and
/// unauthenticated; the only failure mode is an unknown id.
async fn asset_bump(
    state: web::Data<AppState>,
    kind: AssetKind,
    id: Uuid,
) -> ApiResult<HttpResponse> {
    if !state.repo.bump_asset_downloads(kind, id).await? {
        return Err(AppError::NotFound(kind_title(kind).to_string(), id.to_string()).into());
    }
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_posters(state: web::Data<AppState>) -> HttpResponse {
    asset_list(state, AssetKind::Poster).await
}

pub async fn get_poster(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    asset_get(state, AssetKind::Poster, path.into_inner()).await
}

pub async fn create_poster(
    state: web::Data<AppState>,
    admin: AdminUser,
    payload: web::Json<NewAsset>,
) -> ApiResult<HttpResponse> {
    asset_create(state, admin, AssetKind::Poster, payload.into_inner()).await
}

pub async fn update_poster(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<Uuid>,
    payload: web::Json<AssetPatch>,
) -> ApiResult<HttpResponse> {
    asset_update(state, admin, AssetKind::Poster, path.into_inner(), payload.into_inner()).await
}

pub async fn delete_poster(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    asset_delete(state, admin, AssetKind::Poster, path.into_inner()).await
}

pub async fn bump_poster(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    asset_bump(state, AssetKind::Poster, path.into_inner()).await
}

pub async fn list_cap_designs(state: web::Data<AppState>) -> HttpResponse {
    asset_list(state, AssetKind::CapDesign).await
}

pub async fn get_cap_design(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    asset_get(state, AssetKind::CapDesign, path.into_inner()).await
}

pub async fn create_cap_design(
    state: web::Data<AppState>,
    admin: AdminUser,
    payload: web::Json<NewAsset>,
) -> ApiResult<HttpResponse> {
    asset_create(state, admin, AssetKind::CapDesign, payload.into_inner()).await
}

pub async fn update_cap_design(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<Uuid>,
    payload: web::Json<AssetPatch>,
) -> ApiResult<HttpResponse> {
    asset_update(state, admin, AssetKind::CapDesign, path.into_inner(), payload.into_inner())
        .await
}

pub async fn delete_cap_design(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    asset_delete(state, admin, AssetKind::CapDesign, path.into_inner()).await
}

pub async fn bump_cap_design(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    asset_bump(state, AssetKind::CapDesign, path.into_inner()).await
}

// ── Ebooks ──────────────────────────────────────────────────────────────────

pub async fn list_ebooks(state: web::Data<AppState>) -> HttpResponse {
    let items = state.repo.list_ebooks().await.unwrap_or_else(|err| {
        log::warn!("ebook list read failed, serving empty list: {err:#}");
        Vec::new()
    });
    HttpResponse::Ok().json(items)
}

pub async fn get_ebook(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let ebook = state
        .repo
        .get_ebook(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ebook".to_string(), id.to_string()))?;
    Ok(HttpResponse::Ok().json(ebook))
}

pub async fn create_ebook(
    state: web::Data<AppState>,
    admin: AdminUser,
    payload: web::Json<NewEbook>,
) -> ApiResult<HttpResponse> {
    let mut data = payload.into_inner();
    if data.title.trim().is_empty() || data.author.trim().is_empty() {
        return Err(
            AppError::ValidationError("A title and an author are required.".to_string()).into(),
        );
    }
    data.uploaded_by = Some(admin.0.account_id.to_string());
    data.uploaded_by_name = non_blank(Some(admin.0.name.clone()));
    data.uploaded_by_email = non_blank(Some(admin.0.email.clone()));

    let id = state.repo.add_ebook(data).await?;
    let stored = state
        .repo
        .get_ebook(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ebook".to_string(), id.to_string()))?;

    record_audit(
        &state,
        AuditEntry::new("Added Ebook", "create")
            .actor(admin.0.account_id, &admin.0.name, &admin.0.email)
            .role(admin.0.role)
            .details(serde_json::json!({ "id": id, "title": stored.title })),
    );
    Ok(HttpResponse::Created().json(stored))
}

pub async fn update_ebook(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<Uuid>,
    payload: web::Json<EbookPatch>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !state.repo.update_ebook(id, payload.into_inner()).await? {
        return Err(AppError::NotFound("Ebook".to_string(), id.to_string()).into());
    }
    let stored = state
        .repo
        .get_ebook(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ebook".to_string(), id.to_string()))?;

    record_audit(
        &state,
        AuditEntry::new("Updated Ebook", "update")
            .actor(admin.0.account_id, &admin.0.name, &admin.0.email)
            .role(admin.0.role)
            .details(serde_json::json!({ "id": id, "title": stored.title })),
    );
    Ok(HttpResponse::Ok().json(stored))
}

pub async fn delete_ebook(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !state.repo.delete_ebook(id).await? {
        return Err(AppError::NotFound("Ebook".to_string(), id.to_string()).into());
    }
    record_audit(
        &state,
        AuditEntry::new("Deleted Ebook", "delete")
            .actor(admin.0.account_id, &admin.0.name, &admin.0.email)
            .role(admin.0.role)
            .details(serde_json::json!({ "id": id })),
    );
    Ok(HttpResponse::NoContent().finish())
}

pub async fn bump_ebook(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !state.repo.bump_ebook_downloads(id).await? {
        return Err(AppError::NotFound("Ebook".to_string(), id.to_string()).into());
    }
    Ok(HttpResponse::NoContent().finish())
}

// ── Photographers ───────────────────────────────────────────────────────────

pub async fn list_photographers(state: web::Data<AppState>) -> HttpResponse {
    let items = state.repo.list_photographers().await.unwrap_or_else(|err| {
        log::warn!("photographer list read failed, serving empty list: {err:#}");
        Vec::new()
    });
    HttpResponse::Ok().json(items)
}

pub async fn get_photographer(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let photographer = state
        .repo
        .get_photographer(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Photographer".to_string(), id.to_string()))?;
    Ok(HttpResponse::Ok().json(photographer))
}

pub async fn create_photographer(
    state: web::Data<AppState>,
    admin: AdminUser,
    payload: web::Json<NewPhotographer>,
) -> ApiResult<HttpResponse> {
    let data = payload.into_inner();
    if data.name.trim().is_empty() || data.location.trim().is_empty() {
        return Err(
            AppError::ValidationError("A name and a location are required.".to_string()).into(),
        );
    }
    let id = state.repo.add_photographer(data).await?;
    let stored = state
        .repo
        .get_photographer(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Photographer".to_string(), id.to_string()))?;

    record_audit(
        &state,
        AuditEntry::new("Added Photographer", "create")
            .actor(admin.0.account_id, &admin.0.name, &admin.0.email)
            .role(admin.0.role)
            .details(serde_json::json!({ "id": id, "name": stored.name })),
    );
    Ok(HttpResponse::Created().json(stored))
}

pub async fn update_photographer(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<Uuid>,
    payload: web::Json<PhotographerPatch>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !state.repo.update_photographer(id, payload.into_inner()).await? {
        return Err(AppError::NotFound("Photographer".to_string(), id.to_string()).into());
    }
    let stored = state
        .repo
        .get_photographer(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Photographer".to_string(), id.to_string()))?;

    record_audit(
        &state,
        AuditEntry::new("Updated Photographer", "update")
            .actor(admin.0.account_id, &admin.0.name, &admin.0.email)
            .role(admin.0.role)
            .details(serde_json::json!({ "id": id, "name": stored.name })),
    );
    Ok(HttpResponse::Ok().json(stored))
}

pub async fn delete_photographer(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !state.repo.delete_photographer(id).await? {
        return Err(AppError::NotFound("Photographer".to_string(), id.to_string()).into());
    }
    record_audit(
        &state,
        AuditEntry::new("Deleted Photographer", "delete")
            .actor(admin.0.account_id, &admin.0.name, &admin.0.email)
            .role(admin.0.role)
            .details(serde_json::json!({ "id": id })),
    );
    Ok(HttpResponse::NoContent().finish())
}
