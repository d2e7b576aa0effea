//! Access token repository: bearer credentials for principals.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::DatabaseError;
use crate::model::PrincipalKind;

/// A raw access token row.
#[derive(Debug, Clone)]
pub struct TokenRow {
    pub token: String,
    pub principal_kind: PrincipalKind,
    pub principal_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TokenRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            token: row.get("token")?,
            principal_kind: row.get("principal_kind")?,
            principal_id: row.get("principal_id")?,
            expires_at: row.get("expires_at")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub fn insert(conn: &Connection, token: &TokenRow) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO access_tokens (token, principal_kind, principal_id, expires_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            token.token,
            token.principal_kind,
            token.principal_id,
            token.expires_at,
            token.created_at,
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, token: &str) -> Result<Option<TokenRow>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT * FROM access_tokens WHERE token = ?1",
            params![token],
            TokenRow::from_row,
        )
        .optional()?;
    Ok(row)
}

/// Removes tokens whose expiry is at or before `now`. Returns how many were removed.
pub fn purge_expired(conn: &Connection, now: DateTime<Utc>) -> Result<usize, DatabaseError> {
    let rows = conn.execute(
        "DELETE FROM access_tokens WHERE expires_at <= ?1",
        params![now],
    )?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use chrono::{Duration, TimeZone};

    fn row(token: &str, expires_at: DateTime<Utc>) -> TokenRow {
        TokenRow {
            token: token.to_string(),
            principal_kind: PrincipalKind::Company,
            principal_id: "c1".to_string(),
            expires_at,
            created_at: expires_at - Duration::hours(1),
        }
    }

    #[test]
    fn test_insert_find_and_purge() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        db.with_conn(|conn| {
            insert(conn, &row("old", now - Duration::minutes(5)))?;
            insert(conn, &row("fresh", now + Duration::minutes(5)))?;

            let found = find(conn, "fresh")?.unwrap();
            assert_eq!(found.principal_kind, PrincipalKind::Company);
            assert_eq!(found.expires_at, now + Duration::minutes(5));

            assert_eq!(purge_expired(conn, now)?, 1);
            assert!(find(conn, "old")?.is_none());
            assert!(find(conn, "fresh")?.is_some());
            Ok::<_, DatabaseError>(())
        })
        .unwrap();
    }

    #[test]
    fn test_purge_includes_token_expiring_now() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        db.with_conn(|conn| {
            insert(conn, &row("edge", now))?;
            assert_eq!(purge_expired(conn, now)?, 1);
            assert!(find(conn, "edge")?.is_none());
            Ok::<_, DatabaseError>(())
        })
        .unwrap();
    }
}
