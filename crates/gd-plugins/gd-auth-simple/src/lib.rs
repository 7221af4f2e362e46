//! # gd-auth-simple
//!
//! Argon2-based implementation of `Authenticator`.
//! Handles password hashing, the admin passkey gate, and the signed
//! short-lived tokens that carry gate and session state. Nothing here is
//! stored client-side beyond the tokens themselves; the passkey step never
//! becomes an unauthenticated browser flag.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use gd_core::models::Role;
use gd_core::traits::{Authenticator, SessionClaims};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Gate tokens outlive one screen transition, not a coffee break.
const GATE_TTL_SECS: i64 = 10 * 60;
const SESSION_TTL_SECS: i64 = 24 * 60 * 60;
const GATE_PURPOSE: &str = "admin-gate";

#[derive(Debug, Serialize, Deserialize)]
struct GateTokenClaims {
    purpose: String,
    role: String,
    exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionTokenClaims {
    sub: String,
    role: String,
    name: String,
    email: String,
    exp: i64,
}

pub struct SimpleAuthenticator {
    token_secret: String,
    admin_passkey: String,
    super_admin_passkey: String,
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

impl SimpleAuthenticator {
    /// Secrets come from configuration; the two passkeys select the two
    /// privileged roles.
    pub fn new(token_secret: &str, admin_passkey: &str, super_admin_passkey: &str) -> Self {
        Self {
            token_secret: token_secret.to_string(),
            admin_passkey: admin_passkey.to_string(),
            super_admin_passkey: super_admin_passkey.to_string(),
        }
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.token_secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.token_secret.as_bytes())
    }

    fn issue_gate_token_with_ttl(&self, role: Role, ttl_secs: i64) -> anyhow::Result<String> {
        let claims = GateTokenClaims {
            purpose: GATE_PURPOSE.to_string(),
            role: role.as_str().to_string(),
            exp: unix_now() + ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding_key())
            .map_err(|e| anyhow::anyhow!("gate token signing failed: {e}"))
    }
}

impl Authenticator for SimpleAuthenticator {
    fn hash_password(&self, password: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))
    }

    /// Verifies a password against a stored Argon2 hash.
    fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// The secret's exact value selects the target role; anything else is
    /// rejected and the caller stays at the passkey step.
    fn passkey_role(&self, passkey: &str) -> Option<Role> {
        if passkey == self.super_admin_passkey {
            Some(Role::SuperAdmin)
        } else if passkey == self.admin_passkey {
            Some(Role::Admin)
        } else {
            None
        }
    }

    fn issue_gate_token(&self, role: Role) -> anyhow::Result<String> {
        self.issue_gate_token_with_ttl(role, GATE_TTL_SECS)
    }

    fn check_gate_token(&self, token: &str) -> Option<Role> {
        let data = decode::<GateTokenClaims>(
            token,
            &self.decoding_key(),
            &Validation::new(Algorithm::HS256),
        )
        .ok()?;
        if data.claims.purpose != GATE_PURPOSE {
            return None;
        }
        Some(Role::from_db(&data.claims.role))
    }

    fn issue_session(&self, claims: &SessionClaims) -> anyhow::Result<String> {
        let token_claims = SessionTokenClaims {
            sub: claims.account_id.to_string(),
            role: claims.role.as_str().to_string(),
            name: claims.name.clone(),
            email: claims.email.clone(),
            exp: unix_now() + SESSION_TTL_SECS,
        };
        encode(&Header::default(), &token_claims, &self.encoding_key())
            .map_err(|e| anyhow::anyhow!("session token signing failed: {e}"))
    }

    fn check_session(&self, token: &str) -> Option<SessionClaims> {
        let data = decode::<SessionTokenClaims>(
            token,
            &self.decoding_key(),
            &Validation::new(Algorithm::HS256),
        )
        .ok()?;
        // A session token is not a gate token; reject crossover use.
        if data.claims.sub.is_empty() {
            return None;
        }
        Some(SessionClaims {
            account_id: Uuid::parse_str(&data.claims.sub).ok()?,
            role: Role::from_db(&data.claims.role),
            name: data.claims.name,
            email: data.claims.email,
        })
    }
}
