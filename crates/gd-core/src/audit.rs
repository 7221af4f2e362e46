//! # Audit Recorder
//!
//! Every admin mutation appends one record to the system log. The write is
//! best-effort: a failed append must never block or roll back the mutation
//! it describes, so callers spawn [`record`] and move on.

use uuid::Uuid;

use crate::models::{NewSystemLog, Role};
use crate::traits::PortalRepo;

/// What an admin mutation wants remembered about itself.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub action: String,
    pub kind: String,
    pub actor_id: Uuid,
    pub actor_name: String,
    pub actor_email: String,
    /// When absent, the recorder resolves it with one extra account read;
    /// if that read fails the trail still gets written, tagged `user`.
    pub role: Option<Role>,
    pub details: serde_json::Value,
}

impl AuditEntry {
    pub fn new(action: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            kind: kind.into(),
            actor_id: Uuid::nil(),
            actor_name: String::new(),
            actor_email: String::new(),
            role: None,
            details: serde_json::Value::Null,
        }
    }

    pub fn actor(mut self, id: Uuid, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.actor_id = id;
        self.actor_name = name.into();
        self.actor_email = email.into();
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// Appends one audit record, resolving the actor's role if the caller did
/// not supply it. Write latency is one or two reads plus one write.
pub async fn record(repo: &dyn PortalRepo, entry: AuditEntry) -> anyhow::Result<Uuid> {
    let role = match entry.role {
        Some(role) => role,
        None => match repo.get_account(entry.actor_id).await {
            Ok(Some(account)) => account.role,
            // Self-describing trail beats a hard failure here.
            Ok(None) | Err(_) => Role::User,
        },
    };

    repo.add_log(NewSystemLog {
        action: entry.action,
        kind: entry.kind,
        user_id: entry.actor_id,
        user_name: entry.actor_name,
        user_email: entry.actor_email,
        user_role: role,
        details: entry.details,
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemRepo;

    #[tokio::test]
    async fn resolves_missing_role_from_the_account() {
        let repo = MemRepo::default();
        let admin = repo.seed_account("ops@example.com", Role::Admin).await;

        let entry = AuditEntry::new("Added Poster", "create")
            .actor(admin, "Ops", "ops@example.com")
            .details(serde_json::json!({ "name": "Cap A" }));
        record(&repo, entry).await.unwrap();

        let logs = repo.recent_logs(10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].user_role, Role::Admin);
        assert_eq!(logs[0].action, "Added Poster");
    }

    #[tokio::test]
    async fn unknown_actor_defaults_to_user_role() {
        let repo = MemRepo::default();
        let entry = AuditEntry::new("Deleted Ebook", "delete").actor(
            Uuid::now_v7(),
            "Ghost",
            "ghost@example.com",
        );
        record(&repo, entry).await.unwrap();

        let logs = repo.recent_logs(10).await.unwrap();
        assert_eq!(logs[0].user_role, Role::User);
    }

    #[tokio::test]
    async fn explicit_role_skips_the_lookup() {
        let repo = MemRepo::default();
        let entry = AuditEntry::new("Updated User Role", "update")
            .actor(Uuid::now_v7(), "Root", "root@example.com")
            .role(Role::SuperAdmin);
        record(&repo, entry).await.unwrap();

        let logs = repo.recent_logs(10).await.unwrap();
        assert_eq!(logs[0].user_role, Role::SuperAdmin);
    }

    #[tokio::test]
    async fn failed_append_surfaces_but_only_as_a_result() {
        let repo = MemRepo::failing();
        let entry = AuditEntry::new("Added Poster", "create").actor(
            Uuid::now_v7(),
            "Ops",
            "ops@example.com",
        );
        // The caller decides what to do with this; handlers spawn and log.
        assert!(record(&repo, entry).await.is_err());
    }
}
