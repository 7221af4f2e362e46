//! Blob upload and deletion endpoints.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;

use gd_core::audit::AuditEntry;
use gd_core::error::AppError;

use crate::error::ApiResult;
use crate::handlers::record_audit;
use crate::middleware::AdminUser;
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// POST /api/uploads/{folder}
///
/// Accepts one file field per request; the store prefixes a timestamp to
/// the client-supplied name so uploads never collide.
pub async fn upload(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<String>,
    mut payload: Multipart,
) -> ApiResult<HttpResponse> {
    let folder = path.into_inner();

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|err| AppError::ValidationError(format!("malformed multipart body: {err}")))?
    {
        let Some(filename) = field.content_disposition().get_filename().map(str::to_string)
        else {
            // Non-file fields (labels etc.) are ignored.
            continue;
        };

        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|err| AppError::ValidationError(format!("upload stream failed: {err}")))?
        {
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::ValidationError(
                    "Upload exceeds the 20 MB limit.".to_string(),
                )
                .into());
            }
            data.extend_from_slice(&chunk);
        }
        file = Some((filename, data));
        break;
    }

    let (filename, data) = file.ok_or_else(|| {
        AppError::ValidationError("No file field found in the upload.".to_string())
    })?;
    if data.is_empty() {
        return Err(AppError::ValidationError("Uploaded file is empty.".to_string()).into());
    }

    let blob = state.blobs.save(&folder, &filename, data).await?;
    record_audit(
        &state,
        AuditEntry::new("Uploaded File", "upload")
            .actor(admin.0.account_id, &admin.0.name, &admin.0.email)
            .role(admin.0.role)
            .details(serde_json::json!({ "folder": folder, "path": blob.path })),
    );
    Ok(HttpResponse::Created().json(serde_json::json!({ "url": blob.url, "path": blob.path })))
}

/// DELETE /api/uploads/{path}
pub async fn delete_upload(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let path = path.into_inner();
    state
        .blobs
        .delete(&path)
        .await
        .map_err(|_| AppError::NotFound("Upload".to_string(), path.clone()))?;

    record_audit(
        &state,
        AuditEntry::new("Deleted File", "delete")
            .actor(admin.0.account_id, &admin.0.name, &admin.0.email)
            .role(admin.0.role)
            .details(serde_json::json!({ "path": path })),
    );
    Ok(HttpResponse::NoContent().finish())
}
