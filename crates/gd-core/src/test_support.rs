//! In-memory `PortalRepo` used by the aggregator and recorder tests.
//! Lists keep newest-created first by pushing to the front, mirroring the
//! ordering contract of the real store.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    non_blank, Account, Asset, AssetKind, AssetPatch, Ebook, EbookPatch, NewAsset, NewEbook,
    NewPhotographer, NewSystemLog, Photographer, PhotographerPatch, Role, SystemLog,
};
use crate::traits::PortalRepo;

#[derive(Default)]
pub struct MemRepo {
    failing: bool,
    accounts: Mutex<Vec<Account>>,
    posters: Mutex<Vec<Asset>>,
    cap_designs: Mutex<Vec<Asset>>,
    ebooks: Mutex<Vec<Ebook>>,
    photographers: Mutex<Vec<Photographer>>,
    logs: Mutex<Vec<SystemLog>>,
}

impl MemRepo {
    /// A repo where every operation errors, for fail-closed paths.
    pub fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }

    pub async fn seed_account(&self, email: &str, role: Role) -> Uuid {
        let now = Utc::now();
        let account = Account {
            id: Uuid::now_v7(),
            email: email.to_string(),
            display_name: None,
            photo_url: None,
            password_hash: None,
            role,
            created_at: now,
            updated_at: now,
        };
        let id = account.id;
        self.upsert_account(account).await.unwrap();
        id
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.failing {
            anyhow::bail!("simulated store failure");
        }
        Ok(())
    }

    fn assets(&self, kind: AssetKind) -> &Mutex<Vec<Asset>> {
        match kind {
            AssetKind::Poster => &self.posters,
            AssetKind::CapDesign => &self.cap_designs,
        }
    }
}

#[async_trait]
impl PortalRepo for MemRepo {
    async fn upsert_account(&self, account: Account) -> anyhow::Result<()> {
        self.check()?;
        let mut accounts = self.accounts.lock().unwrap();
        accounts.retain(|a| a.id != account.id);
        accounts.insert(0, account);
        Ok(())
    }

    async fn get_account(&self, id: Uuid) -> anyhow::Result<Option<Account>> {
        self.check()?;
        Ok(self.accounts.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> anyhow::Result<Option<Account>> {
        self.check()?;
        Ok(self.accounts.lock().unwrap().iter().find(|a| a.email == email).cloned())
    }

    async fn list_accounts(&self) -> anyhow::Result<Vec<Account>> {
        self.check()?;
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn set_account_role(&self, id: Uuid, role: Role) -> anyhow::Result<bool> {
        self.check()?;
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.role = role;
                account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_assets(&self, kind: AssetKind) -> anyhow::Result<Vec<Asset>> {
        self.check()?;
        Ok(self.assets(kind).lock().unwrap().clone())
    }

    async fn get_asset(&self, kind: AssetKind, id: Uuid) -> anyhow::Result<Option<Asset>> {
        self.check()?;
        Ok(self.assets(kind).lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn add_asset(&self, kind: AssetKind, data: NewAsset) -> anyhow::Result<Uuid> {
        self.check()?;
        let now = Utc::now();
        let asset = Asset {
            id: Uuid::now_v7(),
            name: data.name,
            description: data.description,
            category: non_blank(data.category),
            tags: data.tags,
            image_url: non_blank(data.image_url),
            shopify_link: non_blank(data.shopify_link),
            uploaded_by: non_blank(data.uploaded_by),
            uploaded_by_name: non_blank(data.uploaded_by_name),
            downloads: 0,
            created_at: now,
            updated_at: now,
        };
        let id = asset.id;
        self.assets(kind).lock().unwrap().insert(0, asset);
        Ok(id)
    }

    async fn update_asset(
        &self,
        kind: AssetKind,
        id: Uuid,
        patch: AssetPatch,
    ) -> anyhow::Result<bool> {
        self.check()?;
        let mut assets = self.assets(kind).lock().unwrap();
        match assets.iter_mut().find(|a| a.id == id) {
            Some(asset) => {
                if let Some(name) = non_blank(patch.name) {
                    asset.name = name;
                }
                if let Some(description) = non_blank(patch.description) {
                    asset.description = description;
                }
                if let Some(category) = non_blank(patch.category) {
                    asset.category = Some(category);
                }
                if let Some(tags) = patch.tags {
                    asset.tags = tags;
                }
                if let Some(image_url) = non_blank(patch.image_url) {
                    asset.image_url = Some(image_url);
                }
                if let Some(link) = non_blank(patch.shopify_link) {
                    asset.shopify_link = Some(link);
                }
                asset.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_asset(&self, kind: AssetKind, id: Uuid) -> anyhow::Result<bool> {
        self.check()?;
        let mut assets = self.assets(kind).lock().unwrap();
        let before = assets.len();
        assets.retain(|a| a.id != id);
        Ok(assets.len() < before)
    }

    async fn bump_asset_downloads(&self, kind: AssetKind, id: Uuid) -> anyhow::Result<bool> {
        self.check()?;
        let mut assets = self.assets(kind).lock().unwrap();
        match assets.iter_mut().find(|a| a.id == id) {
            Some(asset) => {
                asset.downloads += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_ebooks(&self) -> anyhow::Result<Vec<Ebook>> {
        self.check()?;
        Ok(self.ebooks.lock().unwrap().clone())
    }

    async fn get_ebook(&self, id: Uuid) -> anyhow::Result<Option<Ebook>> {
        self.check()?;
        Ok(self.ebooks.lock().unwrap().iter().find(|e| e.id == id).cloned())
    }

    async fn add_ebook(&self, data: NewEbook) -> anyhow::Result<Uuid> {
        self.check()?;
        let now = Utc::now();
        let ebook = Ebook {
            id: Uuid::now_v7(),
            title: data.title,
            author: data.author,
            description: data.description,
            pages: data.pages,
            available: data.available,
            category: non_blank(data.category),
            isbn: non_blank(data.isbn),
            thumbnail_url: non_blank(data.thumbnail_url),
            file_url: non_blank(data.file_url),
            downloads: 0,
            uploaded_by: non_blank(data.uploaded_by),
            uploaded_by_name: non_blank(data.uploaded_by_name),
            uploaded_by_email: non_blank(data.uploaded_by_email),
            created_at: now,
            updated_at: now,
        };
        let id = ebook.id;
        self.ebooks.lock().unwrap().insert(0, ebook);
        Ok(id)
    }

    async fn update_ebook(&self, id: Uuid, patch: EbookPatch) -> anyhow::Result<bool> {
        self.check()?;
        let mut ebooks = self.ebooks.lock().unwrap();
        match ebooks.iter_mut().find(|e| e.id == id) {
            Some(ebook) => {
                if let Some(title) = non_blank(patch.title) {
                    ebook.title = title;
                }
                if let Some(author) = non_blank(patch.author) {
                    ebook.author = author;
                }
                if let Some(description) = non_blank(patch.description) {
                    ebook.description = description;
                }
                if let Some(pages) = patch.pages {
                    ebook.pages = pages;
                }
                if let Some(available) = patch.available {
                    ebook.available = available;
                }
                if let Some(category) = non_blank(patch.category) {
                    ebook.category = Some(category);
                }
                if let Some(isbn) = non_blank(patch.isbn) {
                    ebook.isbn = Some(isbn);
                }
                if let Some(thumbnail_url) = non_blank(patch.thumbnail_url) {
                    ebook.thumbnail_url = Some(thumbnail_url);
                }
                if let Some(file_url) = non_blank(patch.file_url) {
                    ebook.file_url = Some(file_url);
                }
                ebook.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_ebook(&self, id: Uuid) -> anyhow::Result<bool> {
        self.check()?;
        let mut ebooks = self.ebooks.lock().unwrap();
        let before = ebooks.len();
        ebooks.retain(|e| e.id != id);
        Ok(ebooks.len() < before)
    }

    async fn bump_ebook_downloads(&self, id: Uuid) -> anyhow::Result<bool> {
        self.check()?;
        let mut ebooks = self.ebooks.lock().unwrap();
        match ebooks.iter_mut().find(|e| e.id == id) {
            Some(ebook) => {
                ebook.downloads += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_photographers(&self) -> anyhow::Result<Vec<Photographer>> {
        self.check()?;
        Ok(self.photographers.lock().unwrap().clone())
    }

    async fn get_photographer(&self, id: Uuid) -> anyhow::Result<Option<Photographer>> {
        self.check()?;
        Ok(self.photographers.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn add_photographer(&self, data: NewPhotographer) -> anyhow::Result<Uuid> {
        self.check()?;
        let now = Utc::now();
        let photographer = Photographer {
            id: Uuid::now_v7(),
            name: data.name,
            location: data.location,
            description: data.description,
            style: data.style,
            tags: data.tags,
            price: data.price,
            rating: data.rating,
            reviews: data.reviews,
            verified: data.verified,
            email: non_blank(data.email),
            phone: non_blank(data.phone),
            image_url: non_blank(data.image_url),
            created_at: now,
            updated_at: now,
        };
        let id = photographer.id;
        self.photographers.lock().unwrap().insert(0, photographer);
        Ok(id)
    }

    async fn update_photographer(
        &self,
        id: Uuid,
        patch: PhotographerPatch,
    ) -> anyhow::Result<bool> {
        self.check()?;
        let mut photographers = self.photographers.lock().unwrap();
        match photographers.iter_mut().find(|p| p.id == id) {
            Some(photographer) => {
                if let Some(name) = non_blank(patch.name) {
                    photographer.name = name;
                }
                if let Some(location) = non_blank(patch.location) {
                    photographer.location = location;
                }
                if let Some(description) = non_blank(patch.description) {
                    photographer.description = description;
                }
                if let Some(style) = non_blank(patch.style) {
                    photographer.style = style;
                }
                if let Some(tags) = patch.tags {
                    photographer.tags = tags;
                }
                if let Some(price) = patch.price {
                    photographer.price = price;
                }
                if let Some(rating) = patch.rating {
                    photographer.rating = rating;
                }
                if let Some(reviews) = patch.reviews {
                    photographer.reviews = reviews;
                }
                if let Some(verified) = patch.verified {
                    photographer.verified = verified;
                }
                if let Some(email) = non_blank(patch.email) {
                    photographer.email = Some(email);
                }
                if let Some(phone) = non_blank(patch.phone) {
                    photographer.phone = Some(phone);
                }
                if let Some(image_url) = non_blank(patch.image_url) {
                    photographer.image_url = Some(image_url);
                }
                photographer.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_photographer(&self, id: Uuid) -> anyhow::Result<bool> {
        self.check()?;
        let mut photographers = self.photographers.lock().unwrap();
        let before = photographers.len();
        photographers.retain(|p| p.id != id);
        Ok(photographers.len() < before)
    }

    async fn add_log(&self, log: NewSystemLog) -> anyhow::Result<Uuid> {
        self.check()?;
        let record = SystemLog {
            id: Uuid::now_v7(),
            action: log.action,
            kind: log.kind,
            user_id: log.user_id,
            user_name: log.user_name,
            user_email: log.user_email,
            user_role: log.user_role,
            details: log.details,
            timestamp: Utc::now(),
        };
        let id = record.id;
        self.logs.lock().unwrap().insert(0, record);
        Ok(id)
    }

    async fn recent_logs(&self, limit: i64) -> anyhow::Result<Vec<SystemLog>> {
        self.check()?;
        Ok(self.logs.lock().unwrap().iter().take(limit as usize).cloned().collect())
    }
}
