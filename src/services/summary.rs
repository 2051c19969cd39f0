//! Descriptive statistics over a window of health records.
//!
//! The reduction is deliberately dumb: unweighted arithmetic means, simple
//! counts, no rounding. An empty window produces the all-zero summary rather
//! than an error so the API can always answer a summary request.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::health_record::{HealthRecord, UrineColor};

#[derive(Debug, Serialize, PartialEq)]
pub struct Summary {
    pub water_intake_avg: f64,
    pub bathroom_visits_avg: f64,
    pub stress_level_avg: f64,
    pub urine_color_distribution: UrineColorDistribution,
    pub dialysis_count: i64,
    pub blood_pressure_avg: BloodPressureAvg,
    pub records_count: usize,
    pub period: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Zero-filled counts for all four labels, always serialized in full.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct UrineColorDistribution {
    #[serde(rename = "light-yellow")]
    pub light_yellow: i64,
    pub yellow: i64,
    #[serde(rename = "dark-yellow")]
    pub dark_yellow: i64,
    pub reddish: i64,
}

impl UrineColorDistribution {
    fn bump(&mut self, color: UrineColor) {
        match color {
            UrineColor::LightYellow => self.light_yellow += 1,
            UrineColor::Yellow => self.yellow += 1,
            UrineColor::DarkYellow => self.dark_yellow += 1,
            UrineColor::Reddish => self.reddish += 1,
        }
    }
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct BloodPressureAvg {
    pub systolic: f64,
    pub diastolic: f64,
}

pub fn summarize(
    records: &[HealthRecord],
    period: Option<String>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> Summary {
    let mut summary = Summary {
        water_intake_avg: 0.0,
        bathroom_visits_avg: 0.0,
        stress_level_avg: 0.0,
        urine_color_distribution: UrineColorDistribution::default(),
        dialysis_count: 0,
        blood_pressure_avg: BloodPressureAvg::default(),
        records_count: records.len(),
        period,
        start_date,
        end_date,
    };

    if records.is_empty() {
        return summary;
    }

    let n = records.len() as f64;
    summary.water_intake_avg = records.iter().map(|r| r.water_intake).sum::<f64>() / n;
    summary.bathroom_visits_avg =
        records.iter().map(|r| r.bathroom_visits as f64).sum::<f64>() / n;
    summary.stress_level_avg = records.iter().map(|r| r.stress_level as f64).sum::<f64>() / n;

    for record in records {
        summary.urine_color_distribution.bump(record.urine_color);
    }

    summary.dialysis_count = records.iter().filter(|r| r.dialysis).count() as i64;

    // Blood pressure averages over its own denominator: only records that
    // carry a complete pair count.
    let readings: Vec<_> = records
        .iter()
        .filter_map(|r| r.blood_pressure.as_deref().copied())
        .collect();
    if !readings.is_empty() {
        let bp_n = readings.len() as f64;
        summary.blood_pressure_avg = BloodPressureAvg {
            systolic: readings.iter().map(|bp| bp.systolic as f64).sum::<f64>() / bp_n,
            diastolic: readings.iter().map(|bp| bp.diastolic as f64).sum::<f64>() / bp_n,
        };
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::health_record::{BloodPressure, Medication};
    use chrono::{NaiveDate, TimeZone};
    use sqlx::types::Json;
    use uuid::Uuid;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 30, 23, 59, 59).unwrap(),
        )
    }

    fn record(day: u32, water: f64, stress: i32, color: UrineColor) -> HealthRecord {
        let now = Utc.with_ymd_and_hms(2026, 8, day, 9, 0, 0).unwrap();
        HealthRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            record_date: NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
            water_intake: water,
            bathroom_visits: 4,
            stress_level: stress,
            urine_color: color,
            dialysis: false,
            blood_pressure: None,
            weight: None,
            medications: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_window_yields_all_zero_summary() {
        let (start, end) = window();
        let summary = summarize(&[], Some("monthly".into()), start, end);

        assert_eq!(summary.records_count, 0);
        assert_eq!(summary.water_intake_avg, 0.0);
        assert_eq!(summary.bathroom_visits_avg, 0.0);
        assert_eq!(summary.stress_level_avg, 0.0);
        assert_eq!(summary.dialysis_count, 0);
        assert_eq!(summary.urine_color_distribution, UrineColorDistribution::default());
        assert_eq!(summary.blood_pressure_avg, BloodPressureAvg::default());
        assert_eq!(summary.period.as_deref(), Some("monthly"));
        assert_eq!(summary.start_date, start);
        assert_eq!(summary.end_date, end);
    }

    #[test]
    fn averages_are_unweighted_means() {
        let (start, end) = window();
        let records = vec![
            record(1, 1.5, 3, UrineColor::Yellow),
            record(2, 2.5, 7, UrineColor::Yellow),
        ];
        let summary = summarize(&records, Some("weekly".into()), start, end);

        assert_eq!(summary.records_count, 2);
        assert_eq!(summary.water_intake_avg, 2.0);
        assert_eq!(summary.stress_level_avg, 5.0);
        assert_eq!(summary.bathroom_visits_avg, 4.0);
    }

    #[test]
    fn distribution_is_zero_filled_and_counts_per_label() {
        let (start, end) = window();
        let records = vec![
            record(1, 2.0, 5, UrineColor::LightYellow),
            record(2, 2.0, 5, UrineColor::DarkYellow),
            record(3, 2.0, 5, UrineColor::DarkYellow),
        ];
        let summary = summarize(&records, None, start, end);

        assert_eq!(summary.urine_color_distribution.light_yellow, 1);
        assert_eq!(summary.urine_color_distribution.yellow, 0);
        assert_eq!(summary.urine_color_distribution.dark_yellow, 2);
        assert_eq!(summary.urine_color_distribution.reddish, 0);
    }

    #[test]
    fn blood_pressure_averages_only_over_records_with_readings() {
        let (start, end) = window();
        let mut records = vec![
            record(1, 2.0, 5, UrineColor::Yellow),
            record(2, 2.0, 5, UrineColor::Yellow),
            record(3, 2.0, 5, UrineColor::Yellow),
        ];
        records[0].blood_pressure = Some(Json(BloodPressure {
            systolic: 120,
            diastolic: 80,
        }));
        records[2].blood_pressure = Some(Json(BloodPressure {
            systolic: 140,
            diastolic: 90,
        }));

        let summary = summarize(&records, None, start, end);
        assert_eq!(summary.blood_pressure_avg.systolic, 130.0);
        assert_eq!(summary.blood_pressure_avg.diastolic, 85.0);
    }

    #[test]
    fn dialysis_count_and_medications_do_not_disturb_averages() {
        let (start, end) = window();
        let mut records = vec![
            record(1, 1.0, 2, UrineColor::Yellow),
            record(2, 3.0, 8, UrineColor::Reddish),
        ];
        records[0].dialysis = true;
        records[1].medications = Some(Json(vec![Medication {
            name: "Sevelamer".into(),
            dosage: Some("800mg".into()),
            taken: true,
        }]));

        let summary = summarize(&records, Some("daily".into()), start, end);
        assert_eq!(summary.dialysis_count, 1);
        assert_eq!(summary.water_intake_avg, 2.0);
    }
}
