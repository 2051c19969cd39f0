use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One observation bucket per user per calendar day. `record_date` is the
/// bucketing key; `UNIQUE (user_id, record_date)` backs the upsert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HealthRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub record_date: NaiveDate,
    pub water_intake: f64,
    pub bathroom_visits: i32,
    pub stress_level: i32,
    pub urine_color: UrineColor,
    pub dialysis: bool,
    pub blood_pressure: Option<Json<BloodPressure>>,
    pub weight: Option<f64>,
    pub medications: Option<Json<Vec<Medication>>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "urine_color", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum UrineColor {
    LightYellow,
    Yellow,
    DarkYellow,
    Reddish,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BloodPressure {
    pub systolic: i32,
    pub diastolic: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub name: String,
    pub dosage: Option<String>,
    #[serde(default)]
    pub taken: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpsertHealthRecordRequest {
    /// Timestamp for the observation; defaults to now. Truncated to the
    /// calendar day before storage. Accepts RFC 3339 or bare YYYY-MM-DD.
    pub date: Option<String>,
    pub water_intake: Option<f64>,
    pub bathroom_visits: Option<i32>,
    pub stress_level: Option<i32>,
    pub urine_color: Option<UrineColor>,
    pub dialysis: Option<bool>,
    pub blood_pressure: Option<BloodPressure>,
    pub weight: Option<f64>,
    pub medications: Option<Vec<Medication>>,
    pub notes: Option<String>,
}

impl UpsertHealthRecordRequest {
    /// Merge this submission into an existing day's record. Required scalars
    /// overwrite whenever the submission carries them, zero and false
    /// included; optional fields only overwrite with a non-empty value, so a
    /// sparse resubmission never clears previously stored data.
    pub fn merge_into(&self, record: &mut HealthRecord) {
        if let Some(v) = self.water_intake {
            record.water_intake = v;
        }
        if let Some(v) = self.bathroom_visits {
            record.bathroom_visits = v;
        }
        if let Some(v) = self.stress_level {
            record.stress_level = v;
        }
        if let Some(v) = self.urine_color {
            record.urine_color = v;
        }
        if let Some(v) = self.dialysis {
            record.dialysis = v;
        }
        if let Some(bp) = self.blood_pressure {
            record.blood_pressure = Some(Json(bp));
        }
        if let Some(w) = self.weight_for_merge() {
            record.weight = Some(w);
        }
        if let Some(m) = self.medications.as_ref().filter(|m| !m.is_empty()) {
            record.medications = Some(Json(m.clone()));
        }
        if let Some(n) = self.notes_for_merge() {
            record.notes = Some(n.to_string());
        }
    }

    /// Optional-field merge filters: an explicit empty/falsy value must not
    /// clear a previously stored one, so drop those before binding.
    pub fn weight_for_merge(&self) -> Option<f64> {
        self.weight.filter(|w| *w != 0.0)
    }

    pub fn notes_for_merge(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.is_empty())
    }

    pub fn medications_for_merge(&self) -> Option<Json<&Vec<Medication>>> {
        self.medications
            .as_ref()
            .filter(|m| !m.is_empty())
            .map(Json)
    }
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub period: Option<String>,
}
