//! Client core for the clinic management API.
//!
//! # Overview
//! A logical request such as `GET /patients` is resolved into three candidate
//! endpoints (production deployment, configured API base, and that base
//! without its `/api` prefix) and sent to each in turn until one answers with
//! a 2xx status. Authenticated requests carry a bearer token read from the
//! stored user info.
//!
//! # Design
//! - `EndpointResolver` is pure: configuration in, ordered URLs out.
//! - `CredentialStore` reads a tab-scoped source before a persistent one and
//!   never fails; missing credentials just mean no `Authorization` header.
//! - `ResilientClient` owns no mutable state. I/O happens behind the
//!   `Transport` trait, so the fallback loop is tested with a scripted fake
//!   and exercised end to end against the mock server.
//! - `ClinicApi` and `queue` are the typed consumers used by the views.

pub mod client;
pub mod clinic;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod queue;
pub mod resolver;
pub mod transport;
pub mod types;

pub use client::{RequestOptions, ResilientClient, ResponseBody};
pub use clinic::ClinicApi;
pub use config::{BuildMode, ClientConfig};
pub use credentials::{CredentialSource, CredentialStore, FileStore, MemoryStore};
pub use error::{ApiError, ConfigError, CredentialError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use resolver::EndpointResolver;
pub use transport::UreqTransport;
pub use types::{
    Appointment, AppointmentStatus, CreateAppointment, CreatePatient, Patient, UpdateAppointment,
    UpdatePatient,
};
