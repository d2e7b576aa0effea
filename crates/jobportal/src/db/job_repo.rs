//! Job repository: CRUD operations for the `jobs` table.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::DatabaseError;
use crate::model::Job;

fn from_row(row: &Row<'_>) -> Result<Job, rusqlite::Error> {
    Ok(Job {
        id: row.get("id")?,
        company_id: row.get("company_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        location: row.get("location")?,
        created_at: row.get("created_at")?,
    })
}

/// Inserts a new job row.
pub fn insert(conn: &Connection, job: &Job) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO jobs (id, company_id, title, description, location, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            job.id,
            job.company_id,
            job.title,
            job.description,
            job.location,
            job.created_at,
        ],
    )?;
    Ok(())
}

/// Finds a job by its ID.
pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Job>, DatabaseError> {
    let job = conn
        .query_row("SELECT * FROM jobs WHERE id = ?1", params![id], from_row)
        .optional()?;
    Ok(job)
}

/// Lists all jobs, newest first.
pub fn list(conn: &Connection) -> Result<Vec<Job>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT * FROM jobs ORDER BY created_at DESC, id")?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Deletes a job. Its applications and their interviews go with it.
/// Returns the number of applications removed, or `None` if no such job.
pub fn delete(conn: &Connection, id: &str) -> Result<Option<u64>, DatabaseError> {
    let applications: u64 = conn.query_row(
        "SELECT COUNT(*) FROM job_applications WHERE job_id = ?1",
        params![id],
        |r| r.get(0),
    )?;
    let deleted = conn.execute("DELETE FROM jobs WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Ok(None);
    }
    Ok(Some(applications))
}
