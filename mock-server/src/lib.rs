//! In-memory stand-in for the clinic backend.
//!
//! Serves `/api/health` openly and patient/appointment CRUD behind a bearer
//! token. Errors use the backend's `{"message": "..."}` envelope.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Token accepted when none is configured.
pub const DEFAULT_TOKEN: &str = "dev-token";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "_id")]
    pub id: String,
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

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatient {
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatient {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    pub patient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    pub date: String,
    pub time: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointment {
    pub patient: String,
    pub patient_name: Option<String>,
    pub doctor: Option<String>,
    pub date: String,
    pub time: String,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointment {
    pub doctor: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<String>,
    pub reason: Option<String>,
}

const STATUSES: [&str; 5] = ["scheduled", "waiting", "in-progress", "completed", "cancelled"];

#[derive(Clone)]
pub struct AppState {
    patients: Arc<RwLock<HashMap<String, Patient>>>,
    appointments: Arc<RwLock<HashMap<String, Appointment>>>,
    token: Arc<str>,
}

impl AppState {
    fn new(token: &str) -> Self {
        Self {
            patients: Arc::default(),
            appointments: Arc::default(),
            token: Arc::from(token),
        }
    }
}

/// Error envelope returned to clients.
struct Failure(StatusCode, &'static str);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "message": self.1 }))).into_response()
    }
}

pub fn app(token: &str) -> Router {
    let state = AppState::new(token);
    let protected = Router::new()
        .route("/patients", get(list_patients).post(create_patient))
        .route(
            "/patients/{id}",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route(
            "/appointments/{id}",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    let api = Router::new().route("/health", get(health)).merge(protected);
    Router::new().nest("/api", api).with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match presented {
        Some(token) if token == &*state.token => next.run(request).await,
        Some(_) => Failure(StatusCode::UNAUTHORIZED, "Not authorized, token failed").into_response(),
        None => Failure(StatusCode::UNAUTHORIZED, "Not authorized, no token").into_response(),
    }
}

async fn health() -> &'static str {
    "OK"
}

// --- patients ---

async fn list_patients(State(state): State<AppState>) -> Json<Vec<Patient>> {
    let patients = state.patients.read().await;
    let mut list: Vec<Patient> = patients.values().cloned().collect();
    list.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    Json(list)
}

async fn create_patient(
    State(state): State<AppState>,
    Json(input): Json<CreatePatient>,
) -> Result<(StatusCode, Json<Patient>), Failure> {
    if input.name.trim().is_empty() {
        return Err(Failure(StatusCode::BAD_REQUEST, "Patient name is required"));
    }
    let patient = Patient {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        age: input.age,
        gender: input.gender,
        phone: input.phone,
        email: input.email,
        address: input.address,
        medical_history: input.medical_history,
    };
    tracing::info!(id = %patient.id, "patient created");
    state
        .patients
        .write()
        .await
        .insert(patient.id.clone(), patient.clone());
    Ok((StatusCode::CREATED, Json(patient)))
}

async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, Failure> {
    let patients = state.patients.read().await;
    patients
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Patient not found"))
}

async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePatient>,
) -> Result<Json<Patient>, Failure> {
    let mut patients = state.patients.write().await;
    let patient = patients
        .get_mut(&id)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Patient not found"))?;
    if let Some(name) = input.name {
        patient.name = name;
    }
    if input.age.is_some() {
        patient.age = input.age;
    }
    if input.phone.is_some() {
        patient.phone = input.phone;
    }
    if input.email.is_some() {
        patient.email = input.email;
    }
    if input.address.is_some() {
        patient.address = input.address;
    }
    if input.medical_history.is_some() {
        patient.medical_history = input.medical_history;
    }
    Ok(Json(patient.clone()))
}

async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, Failure> {
    let mut patients = state.patients.write().await;
    patients
        .remove(&id)
        .map(|_| Json(json!({ "message": "Patient removed" })))
        .ok_or(Failure(StatusCode::NOT_FOUND, "Patient not found"))
}

// --- appointments ---

async fn list_appointments(State(state): State<AppState>) -> Json<Vec<Appointment>> {
    let appointments = state.appointments.read().await;
    let mut list: Vec<Appointment> = appointments.values().cloned().collect();
    list.sort_by(|a, b| (&a.date, &a.time, &a.id).cmp(&(&b.date, &b.time, &b.id)));
    Json(list)
}

async fn create_appointment(
    State(state): State<AppState>,
    Json(input): Json<CreateAppointment>,
) -> Result<(StatusCode, Json<Appointment>), Failure> {
    if !state.patients.read().await.contains_key(&input.patient) {
        return Err(Failure(StatusCode::BAD_REQUEST, "Unknown patient"));
    }
    let appointment = Appointment {
        id: Uuid::new_v4().to_string(),
        patient: input.patient,
        patient_name: input.patient_name,
        doctor: input.doctor,
        date: input.date,
        time: input.time,
        status: "scheduled".to_string(),
        reason: input.reason,
    };
    tracing::info!(id = %appointment.id, "appointment booked");
    state
        .appointments
        .write()
        .await
        .insert(appointment.id.clone(), appointment.clone());
    Ok((StatusCode::CREATED, Json(appointment)))
}

async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, Failure> {
    let appointments = state.appointments.read().await;
    appointments
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Appointment not found"))
}

async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateAppointment>,
) -> Result<Json<Appointment>, Failure> {
    if let Some(status) = &input.status {
        if !STATUSES.contains(&status.as_str()) {
            return Err(Failure(StatusCode::BAD_REQUEST, "Invalid status"));
        }
    }
    let mut appointments = state.appointments.write().await;
    let appointment = appointments
        .get_mut(&id)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Appointment not found"))?;
    if input.doctor.is_some() {
        appointment.doctor = input.doctor;
    }
    if let Some(date) = input.date {
        appointment.date = date;
    }
    if let Some(time) = input.time {
        appointment.time = time;
    }
    if let Some(status) = input.status {
        appointment.status = status;
    }
    if input.reason.is_some() {
        appointment.reason = input.reason;
    }
    Ok(Json(appointment.clone()))
}

async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, Failure> {
    let mut appointments = state.appointments.write().await;
    appointments
        .remove(&id)
        .map(|_| Json(json!({ "message": "Appointment removed" })))
        .ok_or(Failure(StatusCode::NOT_FOUND, "Appointment not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_serializes_with_document_id() {
        let patient = Patient {
            id: "1".to_string(),
            name: "Test".to_string(),
            age: None,
            gender: None,
            phone: None,
            email: None,
            address: None,
            medical_history: Some("asthma".to_string()),
        };
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json, json!({"_id": "1", "name": "Test", "medicalHistory": "asthma"}));
    }

    #[test]
    fn create_patient_requires_name() {
        let result: Result<CreatePatient, _> = serde_json::from_str(r#"{"age":30}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_appointment_all_fields_optional() {
        let input: UpdateAppointment = serde_json::from_str("{}").unwrap();
        assert!(input.status.is_none());
        assert!(input.date.is_none());
    }

    #[test]
    fn known_statuses_match_client_vocabulary() {
        assert!(STATUSES.contains(&"in-progress"));
        assert!(!STATUSES.contains(&"in_progress"));
    }
}
