//! # Appointment API Module
//!
//! Booking and rescheduling on the client side, consultations and the daily
//! agenda on the vet side. The list helpers take an already loaded slice and
//! a `today` date so every screen filters the same way.

use crate::{
    consts,
    error::{AppError, AppResult},
    models::{
        self,
        appointment::{Appointment, AppointmentStatus},
    },
    repo,
};
use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use std::fmt;

pub async fn appointments_of_client(
    cliente_id: i64,
    repo: &repo::ImplAppRepo,
) -> AppResult<Vec<Appointment>> {
    Ok(repo
        .list_appointments()
        .await?
        .into_iter()
        .filter(|appointment| appointment.cliente_id == cliente_id)
        .collect())
}

pub async fn appointments_of_vet(
    veterinario_id: i64,
    repo: &repo::ImplAppRepo,
) -> AppResult<Vec<Appointment>> {
    Ok(repo
        .list_appointments()
        .await?
        .into_iter()
        .filter(|appointment| appointment.veterinario_id == veterinario_id)
        .collect())
}

/// Books an appointment requested by a client.
///
/// Client bookings always start as pendiente, whatever the form carried.
///
/// # Arguments
/// * `new_appointment` - Booking form data
/// * `repo` - Repository instance for database operations
///
/// # Returns
/// * `AppResult<i64>` - Id of the created appointment
///
/// # Errors
/// Returns [`AppError::Validation`] for a blank servicio or when horaFin is
/// not after horaInicio.
#[tracing::instrument(skip_all)]
pub async fn book(
    new_appointment: &models::appointment::NewAppointment,
    repo: &repo::ImplAppRepo,
) -> AppResult<i64> {
    new_appointment.validate()?;

    let appointment_id = repo
        .insert_appointment(&models::appointment::NewAppointment {
            estado: Some(AppointmentStatus::Pendiente),
            ..new_appointment.clone()
        })
        .await?;
    debug!(
        "appointment {appointment_id} booked for pet {}",
        new_appointment.mascota_id
    );

    Ok(appointment_id)
}

pub async fn reschedule(
    appointment_id: i64,
    changes: &models::appointment::ScheduleChanges,
    repo: &repo::ImplAppRepo,
) -> AppResult<Appointment> {
    repo.update_appointment_as_client(appointment_id, changes)
        .await
}

/// # Errors
/// [`AppError::IllegalTransition`] when the appointment is already completada.
pub async fn cancel(appointment_id: i64, repo: &repo::ImplAppRepo) -> AppResult<Appointment> {
    let appointment = repo.cancel_appointment(appointment_id).await?;
    info!("appointment {appointment_id} cancelled");
    Ok(appointment)
}

/// Closes an appointment with the vet's findings.
///
/// A pendiente appointment is confirmed first, so the stored estado walks
/// pendiente -> confirmada -> completada. When `pesoActual` differs from the
/// pet record, the pet weight is updated too. All of it is one write: a
/// rejected consultation leaves appointment and pet as they were.
///
/// # Arguments
/// * `appointment_id` - Appointment being attended
/// * `outcome` - Consultation form data; its `estado` is ignored
/// * `repo` - Repository instance for database operations
///
/// # Errors
/// Returns an error if:
/// - diagnostico or tratamiento are blank, or pesoActual is not a positive
///   weight ([`AppError::Validation`])
/// - the appointment does not exist ([`AppError::NotFound`])
/// - the appointment is cancelada ([`AppError::IllegalTransition`])
#[tracing::instrument(skip(outcome, repo))]
pub async fn record_consultation(
    appointment_id: i64,
    outcome: &models::appointment::ConsultationOutcome,
    repo: &repo::ImplAppRepo,
) -> AppResult<Appointment> {
    outcome.validate()?;

    let appointment = repo.complete_consultation(appointment_id, outcome).await?;

    info!("appointment {appointment_id} completed");
    Ok(appointment)
}

/// Open appointments from `today` on, soonest first.
pub fn upcoming(appointments: &[Appointment], today: NaiveDate) -> Vec<&Appointment> {
    let mut upcoming: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.fecha >= today && !a.estado.is_closed())
        .collect();
    upcoming.sort_by_key(|a| (a.fecha, a.hora_inicio));
    upcoming
}

/// Past or closed appointments, newest first. Together with [`upcoming`]
/// this covers every appointment exactly once.
pub fn history(appointments: &[Appointment], today: NaiveDate) -> Vec<&Appointment> {
    let mut history: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.fecha < today || a.estado.is_closed())
        .collect();
    history.sort_by(|a, b| (b.fecha, b.hora_inicio).cmp(&(a.fecha, a.hora_inicio)));
    history
}

/// Filters of the client history screen. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    pub estado: Option<AppointmentStatus>,
    pub desde: Option<NaiveDate>,
    pub hasta: Option<NaiveDate>,
}

impl HistoryFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.estado.is_none_or(|estado| appointment.estado == estado)
            && self.desde.is_none_or(|desde| appointment.fecha >= desde)
            && self.hasta.is_none_or(|hasta| appointment.fecha <= hasta)
    }
}

pub fn filter_history<'a>(
    appointments: &'a [Appointment],
    filter: &HistoryFilter,
) -> Vec<&'a Appointment> {
    let mut filtered: Vec<&Appointment> =
        appointments.iter().filter(|a| filter.matches(a)).collect();
    filtered.sort_by(|a, b| b.fecha.cmp(&a.fecha));
    filtered
}

/// Agenda of one vet for one day, by start hour.
pub fn daily_schedule(
    appointments: &[Appointment],
    veterinario_id: i64,
    fecha: NaiveDate,
) -> Vec<&Appointment> {
    let mut schedule: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.veterinario_id == veterinario_id && a.fecha == fecha)
        .collect();
    schedule.sort_by_key(|a| a.hora_inicio);
    schedule
}

/// Today's appointments of the vet still waiting to be attended.
pub fn today_pending(
    appointments: &[Appointment],
    veterinario_id: i64,
    today: NaiveDate,
) -> Vec<&Appointment> {
    daily_schedule(appointments, veterinario_id, today)
        .into_iter()
        .filter(|a| a.estado == AppointmentStatus::Pendiente)
        .collect()
}

/// Most recent appointment of the pet, any estado.
pub fn last_visit(appointments: &[Appointment], mascota_id: i64) -> Option<&Appointment> {
    appointments
        .iter()
        .filter(|a| a.mascota_id == mascota_id)
        .max_by_key(|a| (a.fecha, a.hora_inicio))
}

/// Whole days between the last visit and `today`, regardless of direction.
pub fn days_since_last_visit(
    appointments: &[Appointment],
    mascota_id: i64,
    today: NaiveDate,
) -> Option<i64> {
    last_visit(appointments, mascota_id).map(|a| (today - a.fecha).num_days().abs())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitBadge {
    NoHistory,
    Today,
    Recent(i64),
    Warning(i64),
    Old(NaiveDate),
}

impl fmt::Display for VisitBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitBadge::NoHistory => write!(f, "Sin historial de visitas"),
            VisitBadge::Today => write!(f, "Última visita: Hoy"),
            VisitBadge::Recent(1) | VisitBadge::Warning(1) => {
                write!(f, "Última visita: hace 1 día")
            }
            VisitBadge::Recent(days) | VisitBadge::Warning(days) => {
                write!(f, "Última visita: hace {days} días")
            }
            VisitBadge::Old(fecha) => write!(f, "Última visita: {}", format_fecha(*fecha)),
        }
    }
}

pub fn visit_badge(appointments: &[Appointment], mascota_id: i64, today: NaiveDate) -> VisitBadge {
    let Some(last) = last_visit(appointments, mascota_id) else {
        return VisitBadge::NoHistory;
    };

    match (today - last.fecha).num_days().abs() {
        0 => VisitBadge::Today,
        days if days <= consts::RECENT_VISIT_DAYS => VisitBadge::Recent(days),
        days if days <= consts::WARNING_VISIT_DAYS => VisitBadge::Warning(days),
        _ => VisitBadge::Old(last.fecha),
    }
}

/// A pendiente appointment on or after `today`.
pub fn has_upcoming(appointments: &[Appointment], mascota_id: i64, today: NaiveDate) -> bool {
    appointments.iter().any(|a| {
        a.mascota_id == mascota_id && a.estado == AppointmentStatus::Pendiente && a.fecha >= today
    })
}

pub fn completed_count(appointments: &[Appointment]) -> usize {
    appointments
        .iter()
        .filter(|a| a.estado == AppointmentStatus::Completada)
        .count()
}

/// Weight taken at the latest completed consultation, or the pet record.
pub fn last_recorded_weight(appointments: &[Appointment], pet: &models::pet::Pet) -> f64 {
    appointments
        .iter()
        .filter(|a| a.mascota_id == pet.id && a.estado == AppointmentStatus::Completada)
        .filter_map(|a| a.peso_actual.map(|peso| (a.fecha, peso)))
        .max_by_key(|(fecha, _)| *fecha)
        .map(|(_, peso)| peso)
        .unwrap_or(pet.peso)
}

pub fn appointments_in_month(appointments: &[Appointment], year: i32, month: u32) -> usize {
    appointments
        .iter()
        .filter(|a| a.fecha.year() == year && a.fecha.month() == month)
        .count()
}

/// `02 Nov 2024`, with spanish month abbreviations.
pub fn format_fecha(fecha: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        fecha.day(),
        consts::MONTHS_SHORT_ES[fecha.month0() as usize],
        fecha.year()
    )
}
