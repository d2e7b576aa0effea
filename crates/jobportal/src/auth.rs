//! Bearer tokens that resolve to a [`Principal`].
//!
//! Tokens are opaque UUID v4 strings persisted in `access_tokens` with the
//! principal they stand for and an expiry.

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::db::{party_repo, token_repo, token_repo::TokenRow, Database};
use crate::error::AuthError;
use crate::lifecycle::{Clock, SystemClock};
use crate::model::Principal;

pub struct TokenStore {
    db: Database,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenStore {
    pub fn new(db: Database, ttl: Duration) -> Self {
        Self {
            db,
            ttl,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Issues a fresh token for an existing principal.
    pub fn issue(&self, principal: &Principal) -> Result<String, AuthError> {
        let now = self.clock.now();
        let row = TokenRow {
            token: Uuid::new_v4().to_string(),
            principal_kind: principal.kind(),
            principal_id: principal.id().to_string(),
            expires_at: now + self.ttl,
            created_at: now,
        };

        self.db.with_conn(|conn| {
            if !party_repo::exists(conn, principal.kind(), principal.id())? {
                return Err(AuthError::UnknownPrincipal {
                    kind: principal.kind().to_string(),
                    id: principal.id().to_string(),
                });
            }
            token_repo::insert(conn, &row).map_err(AuthError::from)
        })?;

        log::debug!("Issued token for {}", principal);
        Ok(row.token)
    }

    /// Resolves a presented token to the principal it was issued for.
    pub fn resolve(&self, token: &str) -> Result<Principal, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingCredential);
        }
        if Uuid::parse_str(token).is_err() {
            return Err(AuthError::InvalidCredential);
        }

        let now = self.clock.now();
        self.db.with_conn(|conn| {
            let row = token_repo::find(conn, token)?.ok_or(AuthError::InvalidCredential)?;
            if row.expires_at <= now {
                return Err(AuthError::Expired);
            }
            if !party_repo::exists(conn, row.principal_kind, &row.principal_id)? {
                return Err(AuthError::UnknownPrincipal {
                    kind: row.principal_kind.to_string(),
                    id: row.principal_id,
                });
            }
            Ok(Principal::new(row.principal_kind, row.principal_id))
        })
    }

    /// Deletes expired tokens. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize, AuthError> {
        let now = self.clock.now();
        let removed = self
            .db
            .with_conn(|conn| token_repo::purge_expired(conn, now).map_err(AuthError::from))?;
        if removed > 0 {
            log::info!("Purged {} expired access tokens", removed);
        }
        Ok(removed)
    }
}
