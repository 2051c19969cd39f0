use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sqlx::types::Json as Jsonb;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppJson, AppResult};
use crate::models::health_record::{
    HealthRecord, RangeQuery, SummaryQuery, UpsertHealthRecordRequest,
};
use crate::services::period::{normalize_day, parse_timestamp, resolve_window, Period};
use crate::services::summary::{summarize, Summary};
use crate::AppState;

fn validate_submission(body: &UpsertHealthRecordRequest) -> AppResult<()> {
    if let Some(water) = body.water_intake {
        if water < 0.0 {
            return Err(AppError::Validation("water_intake must be non-negative".into()));
        }
    }
    if let Some(visits) = body.bathroom_visits {
        if visits < 0 {
            return Err(AppError::Validation(
                "bathroom_visits must be non-negative".into(),
            ));
        }
    }
    if let Some(stress) = body.stress_level {
        if !(1..=10).contains(&stress) {
            return Err(AppError::Validation(
                "stress_level must be between 1 and 10".into(),
            ));
        }
    }
    if let Some(bp) = &body.blood_pressure {
        if bp.systolic <= 0 || bp.diastolic <= 0 {
            return Err(AppError::Validation(
                "blood_pressure values must be positive".into(),
            ));
        }
    }
    if let Some(weight) = body.weight {
        if weight < 0.0 {
            return Err(AppError::Validation("weight must be non-negative".into()));
        }
    }
    Ok(())
}

/// Create or merge the record for the submission's calendar day.
///
/// Required scalars overwrite whenever the submission carries them, zero and
/// false included. Optional fields only overwrite with a non-empty value, so
/// a sparse resubmission never clears previously stored data.
pub async fn upsert_health_record(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<UpsertHealthRecordRequest>,
) -> AppResult<(StatusCode, Json<HealthRecord>)> {
    validate_submission(&body)?;

    let ts = match body.date.as_deref() {
        Some(raw) => parse_timestamp(raw).map_err(AppError::Validation)?,
        None => Utc::now(),
    };
    let day = normalize_day(ts);

    let existing = sqlx::query_as::<_, HealthRecord>(
        "SELECT * FROM health_records WHERE user_id = $1 AND record_date = $2",
    )
    .bind(auth_user.id)
    .bind(day)
    .fetch_optional(&state.db)
    .await?;

    let record = if let Some(mut existing) = existing {
        // Merge into the existing day, then write the merged record back.
        body.merge_into(&mut existing);
        sqlx::query_as::<_, HealthRecord>(
            r#"
            UPDATE health_records SET
                water_intake = $2,
                bathroom_visits = $3,
                stress_level = $4,
                urine_color = $5,
                dialysis = $6,
                blood_pressure = $7,
                weight = $8,
                medications = $9,
                notes = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(existing.id)
        .bind(existing.water_intake)
        .bind(existing.bathroom_visits)
        .bind(existing.stress_level)
        .bind(existing.urine_color)
        .bind(existing.dialysis)
        .bind(existing.blood_pressure)
        .bind(existing.weight)
        .bind(existing.medications)
        .bind(existing.notes)
        .fetch_one(&state.db)
        .await?
    } else {
        let water_intake = body
            .water_intake
            .ok_or_else(|| AppError::Validation("water_intake is required".into()))?;
        let urine_color = body
            .urine_color
            .ok_or_else(|| AppError::Validation("urine_color is required".into()))?;

        // A concurrent first submission for the same day may win the insert;
        // ON CONFLICT turns this create into the merge update instead of
        // failing on the (user_id, record_date) unique constraint. The merge
        // reads the raw Option binds, so a field this submission omitted
        // keeps the winner's value rather than the create-path default.
        sqlx::query_as::<_, HealthRecord>(
            r#"
            INSERT INTO health_records
                (id, user_id, record_date, water_intake, bathroom_visits, stress_level,
                 urine_color, dialysis, blood_pressure, weight, medications, notes)
            VALUES ($1, $2, $3, $4, COALESCE($5, 0), COALESCE($6, 1), $7,
                    COALESCE($8, FALSE), $9, $10, $11, $12)
            ON CONFLICT (user_id, record_date) DO UPDATE SET
                water_intake = $4,
                bathroom_visits = COALESCE($5, health_records.bathroom_visits),
                stress_level = COALESCE($6, health_records.stress_level),
                urine_color = $7,
                dialysis = COALESCE($8, health_records.dialysis),
                blood_pressure = COALESCE($9, health_records.blood_pressure),
                weight = COALESCE($13, health_records.weight),
                medications = COALESCE($14, health_records.medications),
                notes = COALESCE($15, health_records.notes),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(auth_user.id)
        .bind(day)
        .bind(water_intake)
        .bind(body.bathroom_visits)
        .bind(body.stress_level)
        .bind(urine_color)
        .bind(body.dialysis)
        .bind(body.blood_pressure.as_ref().map(Jsonb))
        .bind(body.weight)
        .bind(body.medications.as_ref().map(Jsonb))
        .bind(body.notes.as_deref())
        .bind(body.weight_for_merge())
        .bind(body.medications_for_merge())
        .bind(body.notes_for_merge())
        .fetch_one(&state.db)
        .await?
    };

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_daily_record(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> AppResult<Json<HealthRecord>> {
    let day = normalize_day(parse_timestamp(&date).map_err(AppError::Validation)?);

    let record = sqlx::query_as::<_, HealthRecord>(
        "SELECT * FROM health_records WHERE user_id = $1 AND record_date = $2",
    )
    .bind(auth_user.id)
    .bind(day)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("no data for this day".into()))?;

    Ok(Json(record))
}

pub async fn get_range(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<HealthRecord>>> {
    let start = normalize_day(parse_timestamp(&query.start_date).map_err(AppError::Validation)?);
    let end = normalize_day(parse_timestamp(&query.end_date).map_err(AppError::Validation)?);

    let records = sqlx::query_as::<_, HealthRecord>(
        r#"
        SELECT * FROM health_records
        WHERE user_id = $1 AND record_date BETWEEN $2 AND $3
        ORDER BY record_date ASC
        "#,
    )
    .bind(auth_user.id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(records))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<Summary>> {
    let (start, end) = resolve_window(Period::parse(query.period.as_deref()), Utc::now());

    let records = sqlx::query_as::<_, HealthRecord>(
        r#"
        SELECT * FROM health_records
        WHERE user_id = $1 AND record_date BETWEEN $2 AND $3
        ORDER BY record_date ASC
        "#,
    )
    .bind(auth_user.id)
    .bind(start.date_naive())
    .bind(end.date_naive())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(summarize(&records, query.period, start, end)))
}
