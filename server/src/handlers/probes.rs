use axum::extract::State;

use jobportal::DatabaseError;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn livez() -> ApiResponse {
    tracing::debug!("service is live");
    ApiResponse::ok()
}

pub async fn healthz(State(state): State<AppState>) -> Result<ApiResponse, ApiError> {
    state
        .run(|lifecycle| {
            lifecycle.database().with_conn(|conn| {
                conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0))
                    .map_err(DatabaseError::from)
            })?;
            Ok(())
        })
        .await?;
    tracing::debug!("service is healthy");
    Ok(ApiResponse::ok())
}
