//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port and drives the client over real
//! HTTP with `UreqTransport`. The mock only serves routes under `/api`, so
//! the stripped-prefix candidate answers 404 and a port nothing listens on
//! stands in for an unreachable deployment.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::NaiveDate;
use clinic_core::credentials::USER_INFO_KEY;
use clinic_core::queue::build_queue;
use clinic_core::{
    ApiError, AppointmentStatus, BuildMode, ClientConfig, ClinicApi, CreateAppointment,
    CreatePatient, CredentialStore, FileStore, MemoryStore, RequestOptions, ResilientClient,
    ResponseBody, UpdatePatient, UreqTransport,
};
use mock_server::DEFAULT_TOKEN;

fn start_server(token: &'static str) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, token).await
        })
        .unwrap();
    });

    addr
}

fn dead_url() -> String {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    format!("http://127.0.0.1:{port}/api")
}

fn logged_in(token: &str) -> CredentialStore {
    let tab = MemoryStore::new();
    tab.put(USER_INFO_KEY, format!(r#"{{"token":"{token}","name":"Reception"}}"#));
    CredentialStore::new(tab, MemoryStore::new())
}

fn config(addr: SocketAddr, mode: BuildMode) -> ClientConfig {
    ClientConfig::default()
        .with_build_mode(mode)
        .with_primary_url(dead_url())
        .with_api_url(format!("http://{addr}/api"))
        .with_attempt_timeout(Some(Duration::from_secs(5)))
}

#[test]
fn dev_mode_lists_patients_from_configured_api() {
    let addr = start_server(DEFAULT_TOKEN);
    let api = ClinicApi::new(ResilientClient::from_config(
        &config(addr, BuildMode::Development),
        logged_in(DEFAULT_TOKEN),
    ));

    api.create_patient(&CreatePatient {
        name: "Test".to_string(),
        ..Default::default()
    })
    .unwrap();

    let body = api
        .client()
        .request("/patients", &RequestOptions::get(), true)
        .unwrap();
    let ResponseBody::Json(value) = body else {
        panic!("expected JSON, got {body:?}");
    };
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Test");
    assert!(rows[0]["_id"].is_string());
}

#[test]
fn production_mode_skips_unreachable_deployment() {
    let addr = start_server(DEFAULT_TOKEN);
    let api = ClinicApi::new(ResilientClient::from_config(
        &config(addr, BuildMode::Production),
        logged_in(DEFAULT_TOKEN),
    ));

    assert!(api.list_patients().unwrap().is_empty());
    assert_eq!(api.health().unwrap(), "OK");
}

#[test]
fn total_failure_reports_last_candidate() {
    let addr = start_server(DEFAULT_TOKEN);
    let api = ClinicApi::new(ResilientClient::from_config(
        &config(addr, BuildMode::Production),
        logged_in(DEFAULT_TOKEN),
    ));

    // Dead deployment, then 404 from the API, then 404 from the bare host.
    let err = api.get_patient("missing").unwrap_err();
    assert!(err.is_not_found(), "{err}");
    assert!(err.to_string().contains("404"), "{err}");
}

#[test]
fn missing_credentials_are_rejected_by_server() {
    let addr = start_server(DEFAULT_TOKEN);
    let api_url = format!("http://{addr}/api");
    let config = ClientConfig::default()
        .with_build_mode(BuildMode::Development)
        .with_primary_url(&api_url)
        .with_api_url(&api_url);
    let api = ClinicApi::new(ResilientClient::from_config(&config, CredentialStore::empty()));

    let err = api.list_patients().unwrap_err();
    assert!(err.is_unauthorized(), "{err}");
    assert!(matches!(&err, ApiError::Http { body, .. } if body.contains("no token")));
}

#[test]
fn persistent_credentials_authenticate() {
    let addr = start_server("disk-token");
    let dir = tempfile::tempdir().unwrap();
    let file = FileStore::new(dir.path().join("storage.json"));
    file.put(USER_INFO_KEY, r#"{"token":"disk-token"}"#).unwrap();

    let api = ClinicApi::new(ResilientClient::from_config(
        &config(addr, BuildMode::Development),
        CredentialStore::new(MemoryStore::new(), file),
    ));
    assert!(api.list_appointments().unwrap().is_empty());
}

#[test]
fn front_desk_workflow() {
    let addr = start_server(DEFAULT_TOKEN);
    let api = ClinicApi::new(ResilientClient::from_config(
        &config(addr, BuildMode::Development),
        logged_in(DEFAULT_TOKEN),
    ));
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

    let grace = api
        .create_patient(&CreatePatient {
            name: "Grace".to_string(),
            age: Some(85),
            ..Default::default()
        })
        .unwrap();
    let alan = api
        .create_patient(&CreatePatient {
            name: "Alan".to_string(),
            ..Default::default()
        })
        .unwrap();

    let updated = api
        .update_patient(
            &grace.id,
            &UpdatePatient {
                phone: Some("555-0100".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    assert_eq!(updated.age, Some(85));
    assert_eq!(api.get_patient(&grace.id).unwrap(), updated);

    let book = |patient: &str, time: &str| {
        api.create_appointment(&CreateAppointment {
            patient: patient.to_string(),
            patient_name: None,
            doctor: Some("Dr. Hopper".to_string()),
            date: today,
            time: time.to_string(),
            reason: None,
        })
        .unwrap()
    };
    let late = book(grace.id.as_str(), "11:00");
    let early = book(alan.id.as_str(), "09:00");
    assert_eq!(early.status, AppointmentStatus::Scheduled);

    api.set_appointment_status(&late.id, AppointmentStatus::InProgress)
        .unwrap();

    let appointments = api.list_appointments().unwrap();
    let queue = build_queue(&appointments, today);
    let order: Vec<_> = queue.iter().map(|e| e.appointment.id.clone()).collect();
    assert_eq!(order, [late.id.clone(), early.id.clone()]);

    api.set_appointment_status(&late.id, AppointmentStatus::Completed)
        .unwrap();
    api.delete_appointment(&early.id).unwrap();
    let appointments = api.list_appointments().unwrap();
    assert!(build_queue(&appointments, today).is_empty());

    api.delete_patient(&alan.id).unwrap();
    // Development order ends on the dead deployment, so its error surfaces.
    let err = api.get_patient(&alan.id).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err}");
}
