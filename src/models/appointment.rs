use chrono::{NaiveDate, NaiveTime};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const HOUR_MINUTE_FORMAT: &str = "%H:%M";

#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    #[display("pendiente")]
    Pendiente,
    #[display("confirmada")]
    Confirmada,
    #[display("completada")]
    Completada,
    #[display("cancelada")]
    Cancelada,
}

impl std::str::FromStr for AppointmentStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pendiente" => Ok(Self::Pendiente),
            "confirmada" => Ok(Self::Confirmada),
            "completada" => Ok(Self::Completada),
            "cancelada" => Ok(Self::Cancelada),
            other => Err(AppError::Validation(format!("unknown estado: {other}"))),
        }
    }
}

impl AppointmentStatus {
    /// pendiente -> confirmada -> completada, and cancelada from any open state.
    /// Writing the current state again is accepted.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;

        self == next
            || matches!(
                (self, next),
                (Pendiente, Confirmada)
                    | (Confirmada, Completada)
                    | (Pendiente, Cancelada)
                    | (Confirmada, Cancelada)
            )
    }

    pub fn transition_to(self, next: AppointmentStatus) -> AppResult<AppointmentStatus> {
        if !self.can_transition_to(next) {
            log::warn!("rejected estado change {self} -> {next}");
            return Err(AppError::IllegalTransition { from: self, to: next });
        }
        Ok(next)
    }

    /// Completed and cancelled appointments belong to the history view.
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completada | AppointmentStatus::Cancelada
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub fecha: NaiveDate,
    #[serde(with = "hour_minute")]
    pub hora_inicio: NaiveTime,
    #[serde(with = "hour_minute")]
    pub hora_fin: NaiveTime,
    pub mascota_id: i64,
    pub cliente_id: i64,
    pub veterinario_id: i64,
    pub servicio: String,
    pub precio: Option<f64>,
    pub estado: AppointmentStatus,
    pub diagnostico: Option<String>,
    pub tratamiento: Option<String>,
    pub sintomas: Option<String>,
    pub temperatura: Option<f64>,
    pub peso_actual: Option<f64>,
}

impl Appointment {
    /// Vet side edit: consultation results plus estado.
    pub fn apply_outcome(mut self, outcome: ConsultationOutcome) -> AppResult<Self> {
        if let Some(estado) = outcome.estado {
            self.estado = self.estado.transition_to(estado)?;
        }
        if outcome.diagnostico.is_some() {
            self.diagnostico = outcome.diagnostico;
        }
        if outcome.tratamiento.is_some() {
            self.tratamiento = outcome.tratamiento;
        }
        if outcome.sintomas.is_some() {
            self.sintomas = outcome.sintomas;
        }
        if outcome.temperatura.is_some() {
            self.temperatura = outcome.temperatura;
        }
        if outcome.peso_actual.is_some() {
            self.peso_actual = outcome.peso_actual;
        }
        Ok(self)
    }

    /// Client side edit: schedule fields plus estado. Completed and
    /// cancelled appointments are history and can not be edited.
    pub fn apply_schedule(mut self, changes: ScheduleChanges) -> AppResult<Self> {
        let was_closed = self.estado.is_closed();

        if let Some(estado) = changes.estado {
            self.estado = self.estado.transition_to(estado)?;
        }
        if was_closed {
            return Err(AppError::Validation(format!(
                "a {} appointment can not be edited",
                self.estado
            )));
        }
        if let Some(fecha) = changes.fecha {
            self.fecha = fecha;
        }
        if let Some(hora_inicio) = changes.hora_inicio {
            self.hora_inicio = hora_inicio;
        }
        if let Some(hora_fin) = changes.hora_fin {
            self.hora_fin = hora_fin;
        }
        if let Some(mascota_id) = changes.mascota_id {
            self.mascota_id = mascota_id;
        }
        if let Some(veterinario_id) = changes.veterinario_id {
            self.veterinario_id = veterinario_id;
        }
        if let Some(servicio) = changes.servicio {
            self.servicio = servicio;
        }
        if changes.sintomas.is_some() {
            self.sintomas = changes.sintomas;
        }

        if self.hora_fin <= self.hora_inicio {
            return Err(AppError::Validation(
                "horaFin must be after horaInicio".into(),
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub fecha: NaiveDate,
    #[serde(with = "hour_minute")]
    pub hora_inicio: NaiveTime,
    #[serde(with = "hour_minute")]
    pub hora_fin: NaiveTime,
    pub mascota_id: i64,
    pub cliente_id: i64,
    pub veterinario_id: i64,
    pub servicio: String,
    pub precio: Option<f64>,
    #[serde(default)]
    pub estado: Option<AppointmentStatus>,
    #[serde(default)]
    pub sintomas: Option<String>,
}

impl NewAppointment {
    pub fn validate(&self) -> AppResult<()> {
        if self.servicio.trim().is_empty() {
            return Err(AppError::Validation("servicio is required".into()));
        }
        if self.hora_fin <= self.hora_inicio {
            return Err(AppError::Validation(
                "horaFin must be after horaInicio".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationOutcome {
    pub diagnostico: Option<String>,
    pub tratamiento: Option<String>,
    pub sintomas: Option<String>,
    pub temperatura: Option<f64>,
    pub peso_actual: Option<f64>,
    pub estado: Option<AppointmentStatus>,
}

impl ConsultationOutcome {
    /// A consultation closes with a diagnosis, a treatment and, when the pet
    /// was weighed, a usable weight.
    pub fn validate(&self) -> AppResult<()> {
        let is_blank =
            |value: &Option<String>| value.as_deref().is_none_or(|v| v.trim().is_empty());
        if is_blank(&self.diagnostico) || is_blank(&self.tratamiento) {
            return Err(AppError::Validation(
                "diagnostico and tratamiento are required".into(),
            ));
        }
        if self
            .peso_actual
            .is_some_and(|peso| !(peso.is_finite() && peso > 0.0))
        {
            return Err(AppError::Validation(
                "pesoActual must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleChanges {
    pub fecha: Option<NaiveDate>,
    #[serde(default, with = "hour_minute::option")]
    pub hora_inicio: Option<NaiveTime>,
    #[serde(default, with = "hour_minute::option")]
    pub hora_fin: Option<NaiveTime>,
    pub mascota_id: Option<i64>,
    pub veterinario_id: Option<i64>,
    pub servicio: Option<String>,
    pub sintomas: Option<String>,
    pub estado: Option<AppointmentStatus>,
}

/// `HH:MM` as used by the booking forms. Seconds are accepted on input.
pub mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::HOUR_MINUTE_FORMAT;

    pub fn parse(value: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(value, HOUR_MINUTE_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(HOUR_MINUTE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value).map_err(D::Error::custom)
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => super::serialize(time, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|value| super::parse(&value).map_err(D::Error::custom))
                .transpose()
        }
    }
}
