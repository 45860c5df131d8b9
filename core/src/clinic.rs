//! Typed clinic API over the resilient client.
//!
//! Each call names a logical path and lets `ResilientClient` pick the
//! endpoint. Everything except `health` requires credentials.

use crate::client::{RequestOptions, ResilientClient, ResponseBody};
use crate::error::ApiError;
use crate::http::{HttpMethod, Transport};
use crate::types::{
    Appointment, AppointmentStatus, CreateAppointment, CreatePatient, Patient, UpdateAppointment,
    UpdatePatient,
};

#[derive(Debug)]
pub struct ClinicApi<T> {
    client: ResilientClient<T>,
}

impl<T: Transport> ClinicApi<T> {
    pub fn new(client: ResilientClient<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResilientClient<T> {
        &self.client
    }

    /// Backend liveness probe. Returns the raw text the server sent.
    pub fn health(&self) -> Result<String, ApiError> {
        let body = self.client.request("/health", &RequestOptions::get(), false)?;
        Ok(match body {
            ResponseBody::Text(text) => text,
            ResponseBody::Json(value) => value.to_string(),
        })
    }

    pub fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.client.request_json("/patients", &RequestOptions::get(), true)
    }

    pub fn get_patient(&self, id: &str) -> Result<Patient, ApiError> {
        self.client
            .request_json(&format!("/patients/{id}"), &RequestOptions::get(), true)
    }

    pub fn create_patient(&self, input: &CreatePatient) -> Result<Patient, ApiError> {
        let options = RequestOptions::json(HttpMethod::Post, input)?;
        self.client.request_json("/patients", &options, true)
    }

    pub fn update_patient(&self, id: &str, input: &UpdatePatient) -> Result<Patient, ApiError> {
        let options = RequestOptions::json(HttpMethod::Put, input)?;
        self.client.request_json(&format!("/patients/{id}"), &options, true)
    }

    pub fn delete_patient(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .request(&format!("/patients/{id}"), &RequestOptions::delete(), true)?;
        Ok(())
    }

    pub fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.client
            .request_json("/appointments", &RequestOptions::get(), true)
    }

    pub fn create_appointment(&self, input: &CreateAppointment) -> Result<Appointment, ApiError> {
        let options = RequestOptions::json(HttpMethod::Post, input)?;
        self.client.request_json("/appointments", &options, true)
    }

    pub fn update_appointment(
        &self,
        id: &str,
        input: &UpdateAppointment,
    ) -> Result<Appointment, ApiError> {
        let options = RequestOptions::json(HttpMethod::Put, input)?;
        self.client
            .request_json(&format!("/appointments/{id}"), &options, true)
    }

    /// Move an appointment through the queue (check-in, call in, finish).
    pub fn set_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, ApiError> {
        self.update_appointment(
            id,
            &UpdateAppointment {
                status: Some(status),
                ..Default::default()
            },
        )
    }

    pub fn delete_appointment(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .request(&format!("/appointments/{id}"), &RequestOptions::delete(), true)?;
        Ok(())
    }
}
