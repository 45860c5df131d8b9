//! Domain DTOs for the clinic API.
//!
//! Records mirror backend documents: the document id travels as `_id` and
//! field names are camelCase on the wire.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
}

/// Partial update; omitted fields stay unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Waiting,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Still expected to be seen today.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Scheduled | AppointmentStatus::Waiting | AppointmentStatus::InProgress
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    /// `_id` of the patient.
    pub patient: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    #[serde(deserialize_with = "calendar_date::deserialize")]
    pub date: NaiveDate,
    /// `HH:MM`, 24-hour.
    pub time: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointment {
    pub patient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    #[serde(deserialize_with = "calendar_date::deserialize")]
    pub date: NaiveDate,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    #[serde(
        default,
        deserialize_with = "calendar_date::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Dates arrive either as `YYYY-MM-DD` or as the ISO datetime a Mongoose
/// `Date` field serializes to (`2026-10-18T00:00:00.000Z`). Datetimes are
/// taken at their UTC calendar date. Serialization stays `YYYY-MM-DD`.
mod calendar_date {
    use super::*;

    pub fn parse(raw: &str) -> Result<NaiveDate, String> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc).date_naive())
            .map_err(|e| format!("invalid date `{raw}`: {e}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_reads_backend_document() {
        let patient: Patient = serde_json::from_str(
            r#"{"_id":"1","name":"Test","age":42,"medicalHistory":"asthma","__v":0}"#,
        )
        .unwrap();
        assert_eq!(patient.id, "1");
        assert_eq!(patient.age, Some(42));
        assert_eq!(patient.medical_history.as_deref(), Some("asthma"));
        assert!(patient.phone.is_none());
    }

    #[test]
    fn minimal_patient_needs_only_id_and_name() {
        let patient: Patient = serde_json::from_str(r#"{"_id":"1","name":"Test"}"#).unwrap();
        assert_eq!(patient.name, "Test");
    }

    #[test]
    fn status_uses_kebab_case() {
        let json = serde_json::to_string(&AppointmentStatus::InProgress).unwrap();
        assert_eq!(json, r#""in-progress""#);
        let back: AppointmentStatus = serde_json::from_str(r#""cancelled""#).unwrap();
        assert_eq!(back, AppointmentStatus::Cancelled);
    }

    #[test]
    fn appointment_status_defaults_to_scheduled() {
        let appt: Appointment = serde_json::from_str(
            r#"{"_id":"a1","patient":"1","date":"2026-10-18","time":"09:30"}"#,
        )
        .unwrap();
        assert_eq!(appt.status, AppointmentStatus::Scheduled);
        assert_eq!(appt.date, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }

    #[test]
    fn appointment_reads_mongoose_datetime() {
        let appt: Appointment = serde_json::from_str(
            r#"{"_id":"65a1","patient":"1","date":"2026-10-18T00:00:00.000Z","time":"09:30","status":"waiting","createdAt":"2026-10-01T08:12:44.120Z","__v":0}"#,
        )
        .unwrap();
        assert_eq!(appt.date, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(appt.status, AppointmentStatus::Waiting);

        let json = serde_json::to_value(&appt).unwrap();
        assert_eq!(json["date"], "2026-10-18");
    }

    #[test]
    fn offset_datetime_uses_utc_calendar_date() {
        let update: UpdateAppointment =
            serde_json::from_str(r#"{"date":"2026-10-18T23:30:00-02:00"}"#).unwrap();
        assert_eq!(update.date, NaiveDate::from_ymd_opt(2026, 10, 19));
    }

    #[test]
    fn garbage_date_is_rejected() {
        let result: Result<Appointment, _> = serde_json::from_str(
            r#"{"_id":"a1","patient":"1","date":"next tuesday","time":"09:30"}"#,
        );
        assert!(result.unwrap_err().to_string().contains("next tuesday"));
    }

    #[test]
    fn update_without_date_leaves_it_unset() {
        let update: UpdateAppointment = serde_json::from_str(r#"{"status":"completed"}"#).unwrap();
        assert!(update.date.is_none());
    }

    #[test]
    fn update_omits_absent_fields() {
        let update = UpdateAppointment {
            status: Some(AppointmentStatus::Waiting),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"status": "waiting"}));
    }

    #[test]
    fn create_patient_uses_camel_case() {
        let input = CreatePatient {
            name: "Ada".to_string(),
            medical_history: Some("none".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Ada", "medicalHistory": "none"}));
    }
}
