//! Dashboard reports

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use chrono::{Days, NaiveDate, Utc};

use crate::core::ServerState;
use crate::db::repository::report;
use crate::utils::{ApiResponse, AppError, AppResult};
use shared::models::{DailyIntake, DailyReportQuery, ReportSummary};

/// Days covered by the daily report when `from` is omitted
const DEFAULT_RANGE_DAYS: u64 = 30;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/reports/summary", get(summary))
        .route("/api/reports/daily", get(daily))
}

/// GET /api/reports/summary
pub async fn summary(State(state): State<ServerState>) -> AppResult<ApiResponse<ReportSummary>> {
    let s = report::summary(&state.pool).await?;
    Ok(ApiResponse::success(s))
}

/// GET /api/reports/daily?from=YYYY-MM-DD&to=YYYY-MM-DD (both inclusive, UTC)
pub async fn daily(
    State(state): State<ServerState>,
    Query(query): Query<DailyReportQuery>,
) -> AppResult<ApiResponse<Vec<DailyIntake>>> {
    let (from, to) = date_range(&query, Utc::now().date_naive())?;
    let to_exclusive = to
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::validation("`to` is out of range"))?;
    let rows = report::daily_intake(
        &state.pool,
        shared::util::date_start_millis(from),
        shared::util::date_start_millis(to_exclusive),
    )
    .await?;
    Ok(ApiResponse::success(rows))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!("`{field}` must be a YYYY-MM-DD date")).with_detail("field", field)
    })
}

fn date_range(query: &DailyReportQuery, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), AppError> {
    let to = match query.to.as_deref() {
        Some(v) => parse_date("to", v)?,
        None => today,
    };
    let from = match query.from.as_deref() {
        Some(v) => parse_date("from", v)?,
        None => to
            .checked_sub_days(Days::new(DEFAULT_RANGE_DAYS - 1))
            .unwrap_or(to),
    };
    if from > to {
        return Err(AppError::validation("`from` must not be after `to`"));
    }
    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(from: Option<&str>, to: Option<&str>) -> DailyReportQuery {
        DailyReportQuery {
            from: from.map(String::from),
            to: to.map(String::from),
        }
    }

    #[test]
    fn test_date_range_defaults_to_last_30_days() {
        let today = NaiveDate::from_ymd_opt(2024, 9, 30).unwrap();
        let (from, to) = date_range(&query(None, None), today).unwrap();
        assert_eq!(to, today);
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
    }

    #[test]
    fn test_date_range_rejects_bad_input() {
        let today = NaiveDate::from_ymd_opt(2024, 9, 30).unwrap();
        assert!(date_range(&query(Some("14.09.2024"), None), today).is_err());
        assert!(date_range(&query(Some("2024-09-20"), Some("2024-09-10")), today).is_err());
        assert!(date_range(&query(Some("2024-09-10"), Some("2024-09-10")), today).is_ok());
    }
}
