//! # Domain Models
//!
//! These structs represent the core entities of the GradDrive portal.
//! We use UUID v7 for time-ordered, globally unique identification, and
//! camelCase wire names to match the records the dashboards consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Privilege level attached to an account. Exactly one per account;
/// an account with no stored role reads back as `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "user")]
    User,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "super admin")]
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "super admin",
        }
    }

    /// Lenient parse for stored values; anything unknown or unset is `User`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            "super admin" => Role::SuperAdmin,
            _ => Role::User,
        }
    }

    /// Admins and super admins clear the dashboard gate.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

/// A signed-up identity. `password_hash` is absent for accounts created
/// through a federated provider and is never serialized outward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The two downloadable artwork collections share one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Poster,
    CapDesign,
}

impl AssetKind {
    pub fn table(&self) -> &'static str {
        match self {
            AssetKind::Poster => "posters",
            AssetKind::CapDesign => "cap_designs",
        }
    }

    /// Storage folder assets of this kind upload into.
    pub fn folder(&self) -> &'static str {
        match self {
            AssetKind::Poster => "posters",
            AssetKind::CapDesign => "cap-designs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Poster => "poster",
            AssetKind::CapDesign => "cap design",
        }
    }
}

/// A poster or cap design. `downloads` starts at 0 and only ever climbs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    /// Ordered, duplicates allowed.
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub shopify_link: Option<String>,
    pub uploaded_by: Option<String>,
    pub uploaded_by_name: Option<String>,
    #[serde(default)]
    pub downloads: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Distinguished from [`Asset`] by an availability flag and a separate
/// downloadable file next to the display thumbnail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ebook {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub pages: i64,
    pub available: bool,
    pub category: Option<String>,
    pub isbn: Option<String>,
    pub thumbnail_url: Option<String>,
    pub file_url: Option<String>,
    #[serde(default)]
    pub downloads: i64,
    pub uploaded_by: Option<String>,
    pub uploaded_by_name: Option<String>,
    pub uploaded_by_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listed photographer. Independent entity with no link back to accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photographer {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub description: String,
    pub style: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price: f64,
    pub rating: f64,
    pub reviews: i64,
    pub verified: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One audit-trail entry. Append-only; never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemLog {
    pub id: Uuid,
    pub action: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_role: Role,
    #[serde(default)]
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

// ── Write payloads ──────────────────────────────────────────────────────────
//
// Create payloads carry required fields plus optionals; patch payloads are
// all-optional. An absent patch field means "leave as is", never "clear".
// Blank strings are normalized to absent before they reach the store.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub shopify_link: Option<String>,
    pub uploaded_by: Option<String>,
    pub uploaded_by_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub shopify_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEbook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub pages: i64,
    #[serde(default)]
    pub available: bool,
    pub category: Option<String>,
    pub isbn: Option<String>,
    pub thumbnail_url: Option<String>,
    pub file_url: Option<String>,
    pub uploaded_by: Option<String>,
    pub uploaded_by_name: Option<String>,
    pub uploaded_by_email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub pages: Option<i64>,
    pub available: Option<bool>,
    pub category: Option<String>,
    pub isbn: Option<String>,
    pub thumbnail_url: Option<String>,
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhotographer {
    pub name: String,
    pub location: String,
    pub description: String,
    pub style: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: i64,
    #[serde(default)]
    pub verified: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotographerPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub style: Option<String>,
    pub tags: Option<Vec<String>>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub reviews: Option<i64>,
    pub verified: Option<bool>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSystemLog {
    pub action: String,
    pub kind: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_role: Role,
    pub details: serde_json::Value,
}

// ── Derived analytics ───────────────────────────────────────────────────────

/// Recomputed on demand; never persisted. `Default` is the fail-closed
/// zeroed snapshot.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_users: usize,
    pub total_admins: usize,
    pub total_downloads: i64,
    pub photographers_listed: usize,
    pub posters_uploaded: usize,
    pub cap_designs: usize,
    pub recent_activity: Vec<SystemLog>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadEntry {
    pub id: Uuid,
    pub name: String,
    pub downloads: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadBreakdown {
    pub posters: Vec<DownloadEntry>,
    pub ebooks: Vec<DownloadEntry>,
    pub cap_designs: Vec<DownloadEntry>,
}

/// Normalizes an optional text field: blank or whitespace-only content is
/// treated as absent so it is omitted from writes instead of stored as "".
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
