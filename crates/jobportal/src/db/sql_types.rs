//! SQLite text mappings for the workflow enums.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::error::LifecycleError;
use crate::model::{
    ApplicationStatus, InterviewLocation, InterviewStatus, InterviewType, PrincipalKind,
};

macro_rules! text_enum_sql {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ToSql for $ty {
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    Ok(ToSqlOutput::from(self.as_str()))
                }
            }

            impl FromSql for $ty {
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    value
                        .as_str()?
                        .parse()
                        .map_err(|e: LifecycleError| FromSqlError::Other(Box::new(e)))
                }
            }
        )+
    };
}

text_enum_sql!(
    ApplicationStatus,
    InterviewStatus,
    InterviewLocation,
    InterviewType,
    PrincipalKind,
);
