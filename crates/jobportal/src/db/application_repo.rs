//! Application repository: CRUD operations for the `job_applications` table.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::DatabaseError;
use crate::model::{ApplicationStatus, JobApplication};

const COLUMNS: &str = "id, job_id, company_id, user_id, status, date, version";

fn from_row(row: &Row<'_>) -> Result<JobApplication, rusqlite::Error> {
    Ok(JobApplication {
        id: row.get("id")?,
        job_id: row.get("job_id")?,
        company_id: row.get("company_id")?,
        user_id: row.get("user_id")?,
        status: row.get("status")?,
        date: row.get("date")?,
        version: row.get("version")?,
    })
}

/// Inserts a new application row.
pub fn insert(conn: &Connection, app: &JobApplication) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO job_applications (id, job_id, company_id, user_id, status, date, version)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            app.id,
            app.job_id,
            app.company_id,
            app.user_id,
            app.status,
            app.date,
            app.version,
        ],
    )?;
    Ok(())
}

/// Finds an application by its ID.
pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<JobApplication>, DatabaseError> {
    let app = conn
        .query_row(
            &format!("SELECT {} FROM job_applications WHERE id = ?1", COLUMNS),
            params![id],
            from_row,
        )
        .optional()?;
    Ok(app)
}

/// Finds the application a candidate filed for a job, if any.
pub fn find_by_user_and_job(
    conn: &Connection,
    user_id: &str,
    job_id: &str,
) -> Result<Option<JobApplication>, DatabaseError> {
    let app = conn
        .query_row(
            &format!(
                "SELECT {} FROM job_applications WHERE user_id = ?1 AND job_id = ?2",
                COLUMNS
            ),
            params![user_id, job_id],
            from_row,
        )
        .optional()?;
    Ok(app)
}

/// Filter for application listings. `None` fields do not constrain.
#[derive(Debug, Default, Clone)]
pub struct ApplicationFilter {
    pub company_id: Option<String>,
    pub user_id: Option<String>,
    pub status: Option<ApplicationStatus>,
}

/// Lists applications matching the filter, newest first.
pub fn query(
    conn: &Connection,
    filter: &ApplicationFilter,
) -> Result<Vec<JobApplication>, DatabaseError> {
    let mut conditions = Vec::new();
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(ref company_id) = filter.company_id {
        conditions.push(format!("company_id = ?{}", param_values.len() + 1));
        param_values.push(Box::new(company_id.clone()));
    }
    if let Some(ref user_id) = filter.user_id {
        conditions.push(format!("user_id = ?{}", param_values.len() + 1));
        param_values.push(Box::new(user_id.clone()));
    }
    if let Some(status) = filter.status {
        conditions.push(format!("status = ?{}", param_values.len() + 1));
        param_values.push(Box::new(status));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT {} FROM job_applications {} ORDER BY date DESC, id",
        COLUMNS, where_clause
    );
    let params_ref: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_ref.as_slice(), from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Sets the status if the row still has `expected_version`.
/// Returns `false` when another writer got there first.
pub fn update_status(
    conn: &Connection,
    id: &str,
    expected_version: i64,
    status: ApplicationStatus,
) -> Result<bool, DatabaseError> {
    let updated = conn.execute(
        "UPDATE job_applications SET status = ?3, version = version + 1
         WHERE id = ?1 AND version = ?2",
        params![id, expected_version, status],
    )?;
    Ok(updated == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{job_repo, party_repo, Database};
    use crate::model::{Job, PartySummary, PrincipalKind};
    use chrono::Utc;

    fn seed(conn: &Connection) {
        let party = |id: &str| PartySummary {
            id: id.to_string(),
            name: id.to_uppercase(),
            email: format!("{}@x.test", id),
        };
        party_repo::insert(conn, PrincipalKind::Company, &party("c1"), Utc::now()).unwrap();
        party_repo::insert(conn, PrincipalKind::User, &party("u1"), Utc::now()).unwrap();
        party_repo::insert(conn, PrincipalKind::User, &party("u2"), Utc::now()).unwrap();
        job_repo::insert(
            conn,
            &Job {
                id: "j1".to_string(),
                company_id: "c1".to_string(),
                title: "Engineer".to_string(),
                description: None,
                location: None,
                created_at: Utc::now(),
            },
        )
        .unwrap();
    }

    fn application(id: &str, user_id: &str) -> JobApplication {
        JobApplication {
            id: id.to_string(),
            job_id: "j1".to_string(),
            company_id: "c1".to_string(),
            user_id: user_id.to_string(),
            status: ApplicationStatus::Pending,
            date: Utc::now(),
            version: 1,
        }
    }

    #[test]
    fn test_insert_and_find() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            seed(conn);
            insert(conn, &application("a1", "u1"))?;
            let found = find_by_id(conn, "a1")?.unwrap();
            assert_eq!(found.status, ApplicationStatus::Pending);
            assert_eq!(found.version, 1);
            assert!(find_by_user_and_job(conn, "u1", "j1")?.is_some());
            assert!(find_by_user_and_job(conn, "u2", "j1")?.is_none());
            Ok::<_, DatabaseError>(())
        })
        .unwrap();
    }

    #[test]
    fn test_one_application_per_user_and_job() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .with_conn(|conn| {
                seed(conn);
                insert(conn, &application("a1", "u1"))?;
                insert(conn, &application("a2", "u1"))
            })
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_update_status_checks_version() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            seed(conn);
            insert(conn, &application("a1", "u1"))?;

            assert!(update_status(conn, "a1", 1, ApplicationStatus::Viewed)?);
            assert!(!update_status(conn, "a1", 1, ApplicationStatus::Hired)?);

            let found = find_by_id(conn, "a1")?.unwrap();
            assert_eq!(found.status, ApplicationStatus::Viewed);
            assert_eq!(found.version, 2);
            Ok::<_, DatabaseError>(())
        })
        .unwrap();
    }

    #[test]
    fn test_query_filters() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            seed(conn);
            insert(conn, &application("a1", "u1"))?;
            insert(conn, &application("a2", "u2"))?;
            update_status(conn, "a2", 1, ApplicationStatus::Shortlisted)?;

            let all = query(conn, &ApplicationFilter::default())?;
            assert_eq!(all.len(), 2);

            let by_user = query(
                conn,
                &ApplicationFilter {
                    user_id: Some("u1".to_string()),
                    ..Default::default()
                },
            )?;
            assert_eq!(by_user.len(), 1);
            assert_eq!(by_user[0].id, "a1");

            let shortlisted = query(
                conn,
                &ApplicationFilter {
                    company_id: Some("c1".to_string()),
                    status: Some(ApplicationStatus::Shortlisted),
                    ..Default::default()
                },
            )?;
            assert_eq!(shortlisted.len(), 1);
            assert_eq!(shortlisted[0].id, "a2");
            Ok::<_, DatabaseError>(())
        })
        .unwrap();
    }

    #[test]
    fn test_deleting_job_cascades() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            seed(conn);
            insert(conn, &application("a1", "u1"))?;
            assert_eq!(job_repo::delete(conn, "j1")?, Some(1));
            assert!(find_by_id(conn, "a1")?.is_none());
            Ok::<_, DatabaseError>(())
        })
        .unwrap();
    }
}
