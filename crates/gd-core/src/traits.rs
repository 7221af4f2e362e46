//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Account, Asset, AssetKind, AssetPatch, Ebook, EbookPatch, NewAsset, NewEbook,
    NewPhotographer, NewSystemLog, Photographer, PhotographerPatch, Role, SystemLog,
};

/// Data persistence contract for every portal collection.
///
/// Semantics shared by all entity kinds:
/// - `list_*` returns newest-created first.
/// - `get_*` treats not-found as a valid `None`, never an error.
/// - `add_*` injects server timestamps (and a zeroed download counter for
///   download-tracked kinds) and strips blank optional fields.
/// - `update_*` applies a patch where an omitted field keeps its stored
///   value, and always refreshes the updated timestamp.
/// - `delete_*` removes only the record; any blob it references stays
///   behind unless the caller removes it through the [`BlobStore`].
#[async_trait]
pub trait PortalRepo: Send + Sync {
    // Accounts
    async fn upsert_account(&self, account: Account) -> anyhow::Result<()>;
    async fn get_account(&self, id: Uuid) -> anyhow::Result<Option<Account>>;
    async fn find_account_by_email(&self, email: &str) -> anyhow::Result<Option<Account>>;
    async fn list_accounts(&self) -> anyhow::Result<Vec<Account>>;
    async fn set_account_role(&self, id: Uuid, role: Role) -> anyhow::Result<bool>;

    // Posters and cap designs
    async fn list_assets(&self, kind: AssetKind) -> anyhow::Result<Vec<Asset>>;
    async fn get_asset(&self, kind: AssetKind, id: Uuid) -> anyhow::Result<Option<Asset>>;
    async fn add_asset(&self, kind: AssetKind, data: NewAsset) -> anyhow::Result<Uuid>;
    async fn update_asset(&self, kind: AssetKind, id: Uuid, patch: AssetPatch)
        -> anyhow::Result<bool>;
    async fn delete_asset(&self, kind: AssetKind, id: Uuid) -> anyhow::Result<bool>;
    /// Monotonic bump performed by the download endpoint.
    async fn bump_asset_downloads(&self, kind: AssetKind, id: Uuid) -> anyhow::Result<bool>;

    // Ebooks
    async fn list_ebooks(&self) -> anyhow::Result<Vec<Ebook>>;
    async fn get_ebook(&self, id: Uuid) -> anyhow::Result<Option<Ebook>>;
    async fn add_ebook(&self, data: NewEbook) -> anyhow::Result<Uuid>;
    async fn update_ebook(&self, id: Uuid, patch: EbookPatch) -> anyhow::Result<bool>;
    async fn delete_ebook(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn bump_ebook_downloads(&self, id: Uuid) -> anyhow::Result<bool>;

    // Photographers
    async fn list_photographers(&self) -> anyhow::Result<Vec<Photographer>>;
    async fn get_photographer(&self, id: Uuid) -> anyhow::Result<Option<Photographer>>;
    async fn add_photographer(&self, data: NewPhotographer) -> anyhow::Result<Uuid>;
    async fn update_photographer(&self, id: Uuid, patch: PhotographerPatch)
        -> anyhow::Result<bool>;
    async fn delete_photographer(&self, id: Uuid) -> anyhow::Result<bool>;

    // System logs (append-only)
    async fn add_log(&self, log: NewSystemLog) -> anyhow::Result<Uuid>;
    async fn recent_logs(&self, limit: i64) -> anyhow::Result<Vec<SystemLog>>;
}

/// A blob saved through the [`BlobStore`], addressable both for serving
/// (`url`) and for later deletion (`path`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub path: String,
    pub url: String,
}

/// Object storage contract for uploaded images and ebook files.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Saves raw bytes under `folder`, deriving a collision-resistant object
    /// name by prefixing the current timestamp to `original_name`.
    async fn save(&self, folder: &str, original_name: &str, data: Vec<u8>)
        -> anyhow::Result<StoredBlob>;
    /// Removes a previously stored blob by its path.
    async fn delete(&self, path: &str) -> anyhow::Result<()>;
    /// Returns the retrievable URL for a stored path.
    fn url_for(&self, path: &str) -> String;
}

/// Claims carried by an authenticated session token. Name and email ride
/// along so audit records don't need an extra account lookup.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub account_id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
}

/// Identity contract: password hashing, the admin passkey gate, and the
/// signed tokens that replace client-side session flags.
pub trait Authenticator: Send + Sync {
    fn hash_password(&self, password: &str) -> anyhow::Result<String>;
    fn verify_password(&self, password: &str, hash: &str) -> bool;

    /// Maps a shared secret to the role it selects; anything else is `None`
    /// and the caller stays at the passkey step.
    fn passkey_role(&self, passkey: &str) -> Option<Role>;

    /// Issues the short-lived gate token proving the passkey step passed.
    fn issue_gate_token(&self, role: Role) -> anyhow::Result<String>;
    /// Validates a gate token, returning the role it selected.
    fn check_gate_token(&self, token: &str) -> Option<Role>;

    fn issue_session(&self, claims: &SessionClaims) -> anyhow::Result<String>;
    fn check_session(&self, token: &str) -> Option<SessionClaims>;
}
