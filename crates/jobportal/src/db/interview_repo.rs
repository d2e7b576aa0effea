//! Interview repository: CRUD operations for the `interviews` table.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::DatabaseError;
use crate::model::{Interview, InterviewDetail, PartySummary, Schedule};

const COLUMNS: &str = "i.id, i.job_id, i.company_id, i.user_id, i.application_id,
    i.scheduled_date, i.start_time, i.end_time, i.location, i.meeting_link,
    i.meeting_address, i.interview_type, i.notes, i.status, i.user_confirmed,
    i.company_feedback, i.user_feedback, i.created_at, i.updated_at, i.version";

const DETAIL_JOINS: &str = "FROM interviews i
    JOIN jobs j ON j.id = i.job_id
    JOIN companies c ON c.id = i.company_id
    JOIN users u ON u.id = i.user_id";

fn from_row(row: &Row<'_>) -> Result<Interview, rusqlite::Error> {
    Ok(Interview {
        id: row.get("id")?,
        job_id: row.get("job_id")?,
        company_id: row.get("company_id")?,
        user_id: row.get("user_id")?,
        application_id: row.get("application_id")?,
        schedule: Schedule {
            scheduled_date: row.get("scheduled_date")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            location: row.get("location")?,
            meeting_link: row.get("meeting_link")?,
            meeting_address: row.get("meeting_address")?,
            interview_type: row.get("interview_type")?,
            notes: row.get("notes")?,
        },
        status: row.get("status")?,
        user_confirmed: row.get("user_confirmed")?,
        company_feedback: row.get("company_feedback")?,
        user_feedback: row.get("user_feedback")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        version: row.get("version")?,
    })
}

fn detail_from_row(row: &Row<'_>) -> Result<InterviewDetail, rusqlite::Error> {
    Ok(InterviewDetail {
        interview: from_row(row)?,
        job_title: row.get("job_title")?,
        company: PartySummary {
            id: row.get("company_id")?,
            name: row.get("company_name")?,
            email: row.get("company_email")?,
        },
        candidate: PartySummary {
            id: row.get("user_id")?,
            name: row.get("user_name")?,
            email: row.get("user_email")?,
        },
    })
}

/// Inserts a new interview row.
pub fn insert(conn: &Connection, interview: &Interview) -> Result<(), DatabaseError> {
    let s = &interview.schedule;
    conn.execute(
        "INSERT INTO interviews (id, job_id, company_id, user_id, application_id,
         scheduled_date, start_time, end_time, location, meeting_link, meeting_address,
         interview_type, notes, status, user_confirmed, company_feedback, user_feedback,
         created_at, updated_at, version)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
         ?18, ?19, ?20)",
        params![
            interview.id,
            interview.job_id,
            interview.company_id,
            interview.user_id,
            interview.application_id,
            s.scheduled_date,
            s.start_time,
            s.end_time,
            s.location,
            s.meeting_link,
            s.meeting_address,
            s.interview_type,
            s.notes,
            interview.status,
            interview.user_confirmed,
            interview.company_feedback,
            interview.user_feedback,
            interview.created_at,
            interview.updated_at,
            interview.version,
        ],
    )?;
    Ok(())
}

/// Finds an interview by its ID.
pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Interview>, DatabaseError> {
    let interview = conn
        .query_row(
            &format!("SELECT {} FROM interviews i WHERE i.id = ?1", COLUMNS),
            params![id],
            from_row,
        )
        .optional()?;
    Ok(interview)
}

/// Writes every mutable field back if the row still has the version the
/// caller loaded (`interview.version`). Bumps the stored version.
/// Returns `false` when another writer got there first.
pub fn update(conn: &Connection, interview: &Interview) -> Result<bool, DatabaseError> {
    let s = &interview.schedule;
    let updated = conn.execute(
        "UPDATE interviews SET scheduled_date=?3, start_time=?4, end_time=?5, location=?6,
         meeting_link=?7, meeting_address=?8, interview_type=?9, notes=?10, status=?11,
         user_confirmed=?12, company_feedback=?13, user_feedback=?14, updated_at=?15,
         version = version + 1
         WHERE id=?1 AND version=?2",
        params![
            interview.id,
            interview.version,
            s.scheduled_date,
            s.start_time,
            s.end_time,
            s.location,
            s.meeting_link,
            s.meeting_address,
            s.interview_type,
            s.notes,
            interview.status,
            interview.user_confirmed,
            interview.company_feedback,
            interview.user_feedback,
            interview.updated_at,
        ],
    )?;
    Ok(updated == 1)
}

/// Loads an interview with job title, company and candidate populated.
pub fn find_detail(conn: &Connection, id: &str) -> Result<Option<InterviewDetail>, DatabaseError> {
    let detail = conn
        .query_row(
            &format!(
                "SELECT {}, j.title AS job_title, c.name AS company_name, c.email AS company_email,
                 u.name AS user_name, u.email AS user_email {} WHERE i.id = ?1",
                COLUMNS, DETAIL_JOINS
            ),
            params![id],
            detail_from_row,
        )
        .optional()?;
    Ok(detail)
}

/// Which side of the interviews to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner<'a> {
    Company(&'a str),
    User(&'a str),
}

/// Lists populated interviews for one company or one candidate, soonest first.
pub fn list_details(
    conn: &Connection,
    owner: Owner<'_>,
) -> Result<Vec<InterviewDetail>, DatabaseError> {
    let (column, id) = match owner {
        Owner::Company(id) => ("i.company_id", id),
        Owner::User(id) => ("i.user_id", id),
    };
    let sql = format!(
        "SELECT {}, j.title AS job_title, c.name AS company_name, c.email AS company_email,
         u.name AS user_name, u.email AS user_email {} WHERE {} = ?1
         ORDER BY i.scheduled_date, i.start_time, i.id",
        COLUMNS, DETAIL_JOINS, column
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![id], detail_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
