//! # Analytics Aggregator
//!
//! Computes the dashboard summary counters by reading full collections and
//! folding in memory. Nothing here is cached or incremental: every call
//! re-reads, and a failed read fails closed rather than partially.

use crate::models::{AnalyticsSnapshot, AssetKind, DownloadBreakdown, DownloadEntry, Role};
use crate::traits::PortalRepo;

/// Recomputes the summary snapshot. If any collection read fails the whole
/// snapshot is zeroed; the dashboard never sees a half-populated one.
pub async fn compute_snapshot(repo: &dyn PortalRepo) -> AnalyticsSnapshot {
    match try_snapshot(repo).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            log::warn!("analytics read failed, serving zeroed snapshot: {err:#}");
            AnalyticsSnapshot::default()
        }
    }
}

async fn try_snapshot(repo: &dyn PortalRepo) -> anyhow::Result<AnalyticsSnapshot> {
    let accounts = repo.list_accounts().await?;
    // Role classification is mutually exclusive, so the two partitions
    // always sum to the full account count.
    let total_admins = accounts.iter().filter(|a| a.role.is_admin()).count();
    let total_users = accounts.len() - total_admins;

    let posters = repo.list_assets(AssetKind::Poster).await?;
    let ebooks = repo.list_ebooks().await?;
    let cap_designs = repo.list_assets(AssetKind::CapDesign).await?;

    let total_downloads = posters.iter().map(|a| a.downloads).sum::<i64>()
        + ebooks.iter().map(|e| e.downloads).sum::<i64>()
        + cap_designs.iter().map(|a| a.downloads).sum::<i64>();

    let photographers_listed = repo.list_photographers().await?.len();
    let recent_activity = repo.recent_logs(10).await?;

    Ok(AnalyticsSnapshot {
        total_users,
        total_admins,
        total_downloads,
        photographers_listed,
        posters_uploaded: posters.len(),
        cap_designs: cap_designs.len(),
        recent_activity,
    })
}

/// Per-asset download counts for all three kinds, most-downloaded first.
/// The sort is stable, so equal counters keep their collection order and
/// re-running without intervening writes yields an identical result.
pub async fn download_breakdown(repo: &dyn PortalRepo) -> DownloadBreakdown {
    match try_breakdown(repo).await {
        Ok(breakdown) => breakdown,
        Err(err) => {
            log::warn!("download breakdown read failed, serving empty lists: {err:#}");
            DownloadBreakdown::default()
        }
    }
}

async fn try_breakdown(repo: &dyn PortalRepo) -> anyhow::Result<DownloadBreakdown> {
    let mut posters: Vec<DownloadEntry> = repo
        .list_assets(AssetKind::Poster)
        .await?
        .into_iter()
        .map(|a| DownloadEntry { id: a.id, name: a.name, downloads: a.downloads })
        .collect();
    let mut ebooks: Vec<DownloadEntry> = repo
        .list_ebooks()
        .await?
        .into_iter()
        .map(|e| DownloadEntry { id: e.id, name: e.title, downloads: e.downloads })
        .collect();
    let mut cap_designs: Vec<DownloadEntry> = repo
        .list_assets(AssetKind::CapDesign)
        .await?
        .into_iter()
        .map(|a| DownloadEntry { id: a.id, name: a.name, downloads: a.downloads })
        .collect();

    posters.sort_by(|a, b| b.downloads.cmp(&a.downloads));
    ebooks.sort_by(|a, b| b.downloads.cmp(&a.downloads));
    cap_designs.sort_by(|a, b| b.downloads.cmp(&a.downloads));

    Ok(DownloadBreakdown { posters, ebooks, cap_designs })
}

/// True when an account counts toward `totalUsers` rather than
/// `totalAdmins`.
pub fn counts_as_user(role: Role) -> bool {
    !role.is_admin()
}
