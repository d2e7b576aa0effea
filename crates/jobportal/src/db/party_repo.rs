//! Party repository: companies, candidates and admins.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::DatabaseError;
use crate::model::{PartySummary, PrincipalKind};

fn table(kind: PrincipalKind) -> &'static str {
    match kind {
        PrincipalKind::Company => "companies",
        PrincipalKind::User => "users",
        PrincipalKind::Admin => "admins",
    }
}

fn from_row(row: &Row<'_>) -> Result<PartySummary, rusqlite::Error> {
    Ok(PartySummary {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
    })
}

/// Inserts a new party of the given kind.
pub fn insert(
    conn: &Connection,
    kind: PrincipalKind,
    party: &PartySummary,
    created_at: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "INSERT INTO {} (id, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
            table(kind)
        ),
        params![party.id, party.name, party.email, created_at],
    )?;
    Ok(())
}

/// Finds a party by kind and id.
pub fn find(
    conn: &Connection,
    kind: PrincipalKind,
    id: &str,
) -> Result<Option<PartySummary>, DatabaseError> {
    let party = conn
        .query_row(
            &format!("SELECT id, name, email FROM {} WHERE id = ?1", table(kind)),
            params![id],
            from_row,
        )
        .optional()?;
    Ok(party)
}

pub fn exists(conn: &Connection, kind: PrincipalKind, id: &str) -> Result<bool, DatabaseError> {
    Ok(find(conn, kind, id)?.is_some())
}
