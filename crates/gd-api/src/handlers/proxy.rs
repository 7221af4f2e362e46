//! Server-side download proxy.
//!
//! Browsers can't force a cross-origin download, so the portal fetches the
//! file itself and re-serves it as an attachment. The upstream body is
//! passed through untouched; only the disposition and content type are set.

use actix_web::{web, HttpResponse};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::Deserialize;

use gd_core::error::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

const PROXY_USER_AGENT: &str = "GradDrive-Downloader/1.0";
const MSG_MISSING_URL: &str = "Missing url parameter.";
const MSG_FETCH_FAILED: &str = "Failed to fetch the requested file.";

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub url: Option<String>,
    pub filename: Option<String>,
}

/// GET /api/download?url=&filename=
pub async fn download(
    state: web::Data<AppState>,
    query: web::Query<DownloadQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let url = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::ValidationError(MSG_MISSING_URL.to_string()))?;

    let response = state
        .http
        .get(url)
        .header(USER_AGENT, PROXY_USER_AGENT)
        .send()
        .await
        .map_err(|err| {
            log::warn!("download proxy fetch failed for {url}: {err}");
            AppError::Upstream(MSG_FETCH_FAILED.to_string())
        })?;
    if !response.status().is_success() {
        log::warn!("download proxy got {} from {url}", response.status());
        return Err(AppError::Upstream(MSG_FETCH_FAILED.to_string()).into());
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let filename = attachment_name(query.filename.as_deref(), url);

    let body = response.bytes().await.map_err(|err| {
        log::warn!("download proxy body read failed for {url}: {err}");
        AppError::Upstream(MSG_FETCH_FAILED.to_string())
    })?;

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename.replace('"', "")),
        ))
        .body(body))
}

/// The explicit `filename` parameter wins; otherwise the last path segment
/// of the URL, with any query string stripped.
fn attachment_name(explicit: Option<&str>, url: &str) -> String {
    if let Some(name) = explicit.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    url.rsplit('/')
        .next()
        .map(|seg| seg.split_once('?').map_or(seg, |(base, _)| base))
        .filter(|seg| !seg.is_empty())
        .unwrap_or("download")
        .to_string()
}
