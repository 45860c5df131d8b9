//! Daily patient queue and status tallies built from fetched appointments.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};

use crate::types::{Appointment, AppointmentStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry<'a> {
    /// 1-based position in the queue.
    pub position: usize,
    pub appointment: &'a Appointment,
}

/// Active appointments on `date`: whoever is being seen first, then by
/// scheduled time, ties broken by id. Times that do not parse as `H:MM`
/// go last.
pub fn build_queue(appointments: &[Appointment], date: NaiveDate) -> Vec<QueueEntry<'_>> {
    let mut todays: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.date == date && a.status.is_active())
        .collect();

    todays.sort_by(|a, b| {
        waiting_rank(a)
            .cmp(&waiting_rank(b))
            .then_with(|| slot(a).cmp(&slot(b)))
            .then_with(|| a.time.cmp(&b.time))
            .then_with(|| a.id.cmp(&b.id))
    });

    todays
        .into_iter()
        .enumerate()
        .map(|(i, appointment)| QueueEntry {
            position: i + 1,
            appointment,
        })
        .collect()
}

fn waiting_rank(appointment: &Appointment) -> u8 {
    match appointment.status {
        AppointmentStatus::InProgress => 0,
        _ => 1,
    }
}

fn slot(appointment: &Appointment) -> (bool, Option<NaiveTime>) {
    let raw = appointment.time.trim();
    let time = NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok();
    (time.is_none(), time)
}

pub fn status_counts(appointments: &[Appointment]) -> HashMap<AppointmentStatus, usize> {
    let mut counts = HashMap::new();
    for appointment in appointments {
        *counts.entry(appointment.status).or_insert(0) += 1;
    }
    counts
}
