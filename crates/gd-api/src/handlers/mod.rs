//! Handlers coordinate the flow between HTTP requests and Core traits.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod proxy;
pub mod uploads;

use actix_web::web;

use gd_core::audit::{self, AuditEntry};

use crate::state::AppState;

/// Spawns a best-effort audit write. A failed append is logged and
/// swallowed; the mutation it describes has already succeeded and must
/// not be rolled back or re-reported over it.
pub(crate) fn record_audit(state: &web::Data<AppState>, entry: AuditEntry) {
    let repo = state.repo.clone();
    let action = entry.action.clone();
    actix_web::rt::spawn(async move {
        if let Err(err) = audit::record(repo.as_ref(), entry).await {
            log::warn!("audit write failed for {action:?}: {err:#}");
        }
    });
}
