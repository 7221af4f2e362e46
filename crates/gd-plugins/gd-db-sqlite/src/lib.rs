//! # gd-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational
//! model and the `gd-core` domain models. One table per collection; tags and
//! log details are stored as JSON text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gd_core::models::{
    non_blank, Account, Asset, AssetKind, AssetPatch, Ebook, EbookPatch, NewAsset, NewEbook,
    NewPhotographer, NewSystemLog, Photographer, PhotographerPatch, Role, SystemLog,
};
use gd_core::traits::PortalRepo;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

/// Table-creation statements, applied idempotently at startup.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS accounts (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        display_name TEXT,
        photo_url TEXT,
        password_hash TEXT,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS posters (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        category TEXT,
        tags TEXT NOT NULL DEFAULT '[]',
        image_url TEXT,
        shopify_link TEXT,
        uploaded_by TEXT,
        uploaded_by_name TEXT,
        downloads INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS cap_designs (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        category TEXT,
        tags TEXT NOT NULL DEFAULT '[]',
        image_url TEXT,
        shopify_link TEXT,
        uploaded_by TEXT,
        uploaded_by_name TEXT,
        downloads INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS ebooks (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        author TEXT NOT NULL,
        description TEXT NOT NULL,
        pages INTEGER NOT NULL DEFAULT 0,
        available INTEGER NOT NULL DEFAULT 0,
        category TEXT,
        isbn TEXT,
        thumbnail_url TEXT,
        file_url TEXT,
        downloads INTEGER NOT NULL DEFAULT 0,
        uploaded_by TEXT,
        uploaded_by_name TEXT,
        uploaded_by_email TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS photographers (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        location TEXT NOT NULL,
        description TEXT NOT NULL,
        style TEXT NOT NULL,
        tags TEXT NOT NULL DEFAULT '[]',
        price REAL NOT NULL DEFAULT 0,
        rating REAL NOT NULL DEFAULT 0,
        reviews INTEGER NOT NULL DEFAULT 0,
        verified INTEGER NOT NULL DEFAULT 0,
        email TEXT,
        phone TEXT,
        image_url TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS system_logs (
        id TEXT PRIMARY KEY,
        action TEXT NOT NULL,
        type TEXT NOT NULL,
        user_id TEXT NOT NULL,
        user_name TEXT NOT NULL,
        user_email TEXT NOT NULL,
        user_role TEXT NOT NULL DEFAULT 'user',
        details TEXT,
        timestamp TEXT NOT NULL
    )",
];

#[derive(Clone)]
pub struct SqlitePortalRepo {
    pool: SqlitePool,
}

// Helpers for lossy column decoding; a corrupt cell degrades to a default
// instead of poisoning the whole list read.
fn parse_uuid(text: &str) -> Uuid {
    Uuid::parse_str(text).unwrap_or_default()
}

fn parse_tags(text: &str) -> Vec<String> {
    serde_json::from_str(text).unwrap_or_default()
}

impl SqlitePortalRepo {
    /// Opens (or creates) the database and applies the schema.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        // SQLite serializes writers anyway; a single pooled connection also
        // keeps `sqlite::memory:` databases coherent across acquires.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        log::debug!("sqlite store ready at {url}");
        Ok(Self { pool })
    }

    /// Test-only access for fault injection (e.g., dropping a table).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn row_to_account(row: &SqliteRow) -> Account {
        Account {
            id: parse_uuid(&row.get::<String, _>("id")),
            email: row.get("email"),
            display_name: row.get("display_name"),
            photo_url: row.get("photo_url"),
            password_hash: row.get("password_hash"),
            role: Role::from_db(&row.get::<String, _>("role")),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn row_to_asset(row: &SqliteRow) -> Asset {
        Asset {
            id: parse_uuid(&row.get::<String, _>("id")),
            name: row.get("name"),
            description: row.get("description"),
            category: row.get("category"),
            tags: parse_tags(&row.get::<String, _>("tags")),
            image_url: row.get("image_url"),
            shopify_link: row.get("shopify_link"),
            uploaded_by: row.get("uploaded_by"),
            uploaded_by_name: row.get("uploaded_by_name"),
            downloads: row.get("downloads"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn row_to_ebook(row: &SqliteRow) -> Ebook {
        Ebook {
            id: parse_uuid(&row.get::<String, _>("id")),
            title: row.get("title"),
            author: row.get("author"),
            description: row.get("description"),
            pages: row.get("pages"),
            available: row.get("available"),
            category: row.get("category"),
            isbn: row.get("isbn"),
            thumbnail_url: row.get("thumbnail_url"),
            file_url: row.get("file_url"),
            downloads: row.get("downloads"),
            uploaded_by: row.get("uploaded_by"),
            uploaded_by_name: row.get("uploaded_by_name"),
            uploaded_by_email: row.get("uploaded_by_email"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn row_to_photographer(row: &SqliteRow) -> Photographer {
        Photographer {
            id: parse_uuid(&row.get::<String, _>("id")),
            name: row.get("name"),
            location: row.get("location"),
            description: row.get("description"),
            style: row.get("style"),
            tags: parse_tags(&row.get::<String, _>("tags")),
            price: row.get("price"),
            rating: row.get("rating"),
            reviews: row.get("reviews"),
            verified: row.get("verified"),
            email: row.get("email"),
            phone: row.get("phone"),
            image_url: row.get("image_url"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn row_to_log(row: &SqliteRow) -> SystemLog {
        let details = row
            .get::<Option<String>, _>("details")
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or(serde_json::Value::Null);
        SystemLog {
            id: parse_uuid(&row.get::<String, _>("id")),
            action: row.get("action"),
            kind: row.get("type"),
            user_id: parse_uuid(&row.get::<String, _>("user_id")),
            user_name: row.get("user_name"),
            user_email: row.get("user_email"),
            user_role: Role::from_db(&row.get::<String, _>("user_role")),
            details,
            timestamp: row.get("timestamp"),
        }
    }
}

#[async_trait]
impl PortalRepo for SqlitePortalRepo {
    async fn upsert_account(&self, account: Account) -> anyhow::Result<()> {
        // Role is deliberately untouched on conflict: role changes only go
        // through `set_account_role`, where the caller has decided them.
        sqlx::query(
            "INSERT INTO accounts (id, email, display_name, photo_url, password_hash, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                display_name = COALESCE(excluded.display_name, accounts.display_name),
                photo_url = COALESCE(excluded.photo_url, accounts.photo_url),
                password_hash = COALESCE(excluded.password_hash, accounts.password_hash),
                updated_at = excluded.updated_at",
        )
        .bind(account.id.to_string())
        .bind(&account.email)
        .bind(non_blank(account.display_name))
        .bind(non_blank(account.photo_url))
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_account(&self, id: Uuid) -> anyhow::Result<Option<Account>> {
        let row = sqlx::query("SELECT * FROM accounts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(Self::row_to_account))
    }

    async fn find_account_by_email(&self, email: &str) -> anyhow::Result<Option<Account>> {
        let row = sqlx::query("SELECT * FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(Self::row_to_account))
    }

    async fn list_accounts(&self) -> anyhow::Result<Vec<Account>> {
        let rows = sqlx::query("SELECT * FROM accounts ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(Self::row_to_account).collect())
    }

    async fn set_account_role(&self, id: Uuid, role: Role) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE accounts SET role = ?, updated_at = ? WHERE id = ?")
            .bind(role.as_str())
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_assets(&self, kind: AssetKind) -> anyhow::Result<Vec<Asset>> {
        let sql = format!(
            "SELECT * FROM {} ORDER BY created_at DESC, id DESC",
            kind.table()
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(Self::row_to_asset).collect())
    }

    async fn get_asset(&self, kind: AssetKind, id: Uuid) -> anyhow::Result<Option<Asset>> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", kind.table());
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(Self::row_to_asset))
    }

    async fn add_asset(&self, kind: AssetKind, data: NewAsset) -> anyhow::Result<Uuid> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO {} (id, name, description, category, tags, image_url, shopify_link,
                             uploaded_by, uploaded_by_name, downloads, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
            kind.table()
        );
        sqlx::query(&sql)
            .bind(id.to_string())
            .bind(&data.name)
            .bind(&data.description)
            .bind(non_blank(data.category))
            .bind(serde_json::to_string(&data.tags)?)
            .bind(non_blank(data.image_url))
            .bind(non_blank(data.shopify_link))
            .bind(non_blank(data.uploaded_by))
            .bind(non_blank(data.uploaded_by_name))
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn update_asset(
        &self,
        kind: AssetKind,
        id: Uuid,
        patch: AssetPatch,
    ) -> anyhow::Result<bool> {
        let tags = match patch.tags {
            Some(tags) => Some(serde_json::to_string(&tags)?),
            None => None,
        };
        // COALESCE keeps the stored value wherever the patch is absent;
        // blank strings were normalized to absent above it.
        let sql = format!(
            "UPDATE {} SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                category = COALESCE(?, category),
                tags = COALESCE(?, tags),
                image_url = COALESCE(?, image_url),
                shopify_link = COALESCE(?, shopify_link),
                updated_at = ?
             WHERE id = ?",
            kind.table()
        );
        let result = sqlx::query(&sql)
            .bind(non_blank(patch.name))
            .bind(non_blank(patch.description))
            .bind(non_blank(patch.category))
            .bind(tags)
            .bind(non_blank(patch.image_url))
            .bind(non_blank(patch.shopify_link))
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_asset(&self, kind: AssetKind, id: Uuid) -> anyhow::Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?", kind.table());
        let result = sqlx::query(&sql)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn bump_asset_downloads(&self, kind: AssetKind, id: Uuid) -> anyhow::Result<bool> {
        let sql = format!(
            "UPDATE {} SET downloads = downloads + 1, updated_at = ? WHERE id = ?",
            kind.table()
        );
        let result = sqlx::query(&sql)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_ebooks(&self) -> anyhow::Result<Vec<Ebook>> {
        let rows = sqlx::query("SELECT * FROM ebooks ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(Self::row_to_ebook).collect())
    }

    async fn get_ebook(&self, id: Uuid) -> anyhow::Result<Option<Ebook>> {
        let row = sqlx::query("SELECT * FROM ebooks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(Self::row_to_ebook))
    }

    async fn add_ebook(&self, data: NewEbook) -> anyhow::Result<Uuid> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO ebooks (id, title, author, description, pages, available, category, isbn,
                                 thumbnail_url, file_url, downloads, uploaded_by, uploaded_by_name,
                                 uploaded_by_email, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.description)
        .bind(data.pages)
        .bind(data.available)
        .bind(non_blank(data.category))
        .bind(non_blank(data.isbn))
        .bind(non_blank(data.thumbnail_url))
        .bind(non_blank(data.file_url))
        .bind(non_blank(data.uploaded_by))
        .bind(non_blank(data.uploaded_by_name))
        .bind(non_blank(data.uploaded_by_email))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update_ebook(&self, id: Uuid, patch: EbookPatch) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE ebooks SET
                title = COALESCE(?, title),
                author = COALESCE(?, author),
                description = COALESCE(?, description),
                pages = COALESCE(?, pages),
                available = COALESCE(?, available),
                category = COALESCE(?, category),
                isbn = COALESCE(?, isbn),
                thumbnail_url = COALESCE(?, thumbnail_url),
                file_url = COALESCE(?, file_url),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(non_blank(patch.title))
        .bind(non_blank(patch.author))
        .bind(non_blank(patch.description))
        .bind(patch.pages)
        .bind(patch.available)
        .bind(non_blank(patch.category))
        .bind(non_blank(patch.isbn))
        .bind(non_blank(patch.thumbnail_url))
        .bind(non_blank(patch.file_url))
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_ebook(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM ebooks WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn bump_ebook_downloads(&self, id: Uuid) -> anyhow::Result<bool> {
        let result =
            sqlx::query("UPDATE ebooks SET downloads = downloads + 1, updated_at = ? WHERE id = ?")
                .bind(Utc::now())
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_photographers(&self) -> anyhow::Result<Vec<Photographer>> {
        let rows = sqlx::query("SELECT * FROM photographers ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(Self::row_to_photographer).collect())
    }

    async fn get_photographer(&self, id: Uuid) -> anyhow::Result<Option<Photographer>> {
        let row = sqlx::query("SELECT * FROM photographers WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(Self::row_to_photographer))
    }

    async fn add_photographer(&self, data: NewPhotographer) -> anyhow::Result<Uuid> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO photographers (id, name, location, description, style, tags, price,
                                        rating, reviews, verified, email, phone, image_url,
                                        created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&data.name)
        .bind(&data.location)
        .bind(&data.description)
        .bind(&data.style)
        .bind(serde_json::to_string(&data.tags)?)
        .bind(data.price)
        .bind(data.rating)
        .bind(data.reviews)
        .bind(data.verified)
        .bind(non_blank(data.email))
        .bind(non_blank(data.phone))
        .bind(non_blank(data.image_url))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update_photographer(
        &self,
        id: Uuid,
        patch: PhotographerPatch,
    ) -> anyhow::Result<bool> {
        let tags = match patch.tags {
            Some(tags) => Some(serde_json::to_string(&tags)?),
            None => None,
        };
        let result = sqlx::query(
            "UPDATE photographers SET
                name = COALESCE(?, name),
                location = COALESCE(?, location),
                description = COALESCE(?, description),
                style = COALESCE(?, style),
                tags = COALESCE(?, tags),
                price = COALESCE(?, price),
                rating = COALESCE(?, rating),
                reviews = COALESCE(?, reviews),
                verified = COALESCE(?, verified),
                email = COALESCE(?, email),
                phone = COALESCE(?, phone),
                image_url = COALESCE(?, image_url),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(non_blank(patch.name))
        .bind(non_blank(patch.location))
        .bind(non_blank(patch.description))
        .bind(non_blank(patch.style))
        .bind(tags)
        .bind(patch.price)
        .bind(patch.rating)
        .bind(patch.reviews)
        .bind(patch.verified)
        .bind(non_blank(patch.email))
        .bind(non_blank(patch.phone))
        .bind(non_blank(patch.image_url))
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_photographer(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM photographers WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_log(&self, log: NewSystemLog) -> anyhow::Result<Uuid> {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO system_logs (id, action, type, user_id, user_name, user_email,
                                      user_role, details, timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&log.action)
        .bind(&log.kind)
        .bind(log.user_id.to_string())
        .bind(&log.user_name)
        .bind(&log.user_email)
        .bind(log.user_role.as_str())
        .bind(serde_json::to_string(&log.details)?)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn recent_logs(&self, limit: i64) -> anyhow::Result<Vec<SystemLog>> {
        let rows = sqlx::query("SELECT * FROM system_logs ORDER BY timestamp DESC, id DESC LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(Self::row_to_log).collect())
    }
}
