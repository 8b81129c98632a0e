use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vaccine {
    pub id: i64,
    pub pet_id: i64,
    pub nombre: String,
    pub fecha: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewVaccine {
    pub pet_id: i64,
    pub nombre: String,
    pub fecha: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: i64,
    pub nombre: String,
    pub especie: String,
    pub raza: String,
    pub edad: i64,
    pub peso: f64,
    pub color: Option<String>,
    pub foto: Option<String>,
    pub cliente_id: i64,
    pub vacunas: Vec<Vaccine>,
}

impl Pet {
    /// Applies a partial edit. The owner never changes.
    pub fn merge(mut self, changes: PetChanges) -> AppResult<Self> {
        if let Some(nombre) = changes.nombre {
            self.nombre = nombre;
        }
        if let Some(especie) = changes.especie {
            self.especie = especie;
        }
        if let Some(raza) = changes.raza {
            self.raza = raza;
        }
        if let Some(edad) = changes.edad {
            self.edad = edad;
        }
        if let Some(peso) = changes.peso {
            self.peso = peso;
        }
        if changes.color.is_some() {
            self.color = changes.color;
        }
        if changes.foto.is_some() {
            self.foto = changes.foto;
        }

        validate_pet_fields(&self.nombre, &self.especie, &self.raza, self.edad, self.peso)?;
        Ok(self)
    }

    pub fn vaccine_status(&self) -> VaccineStatus {
        if self.vacunas.is_empty() {
            return VaccineStatus::Pending;
        }
        VaccineStatus::UpToDate
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    pub nombre: String,
    pub especie: String,
    pub raza: String,
    pub edad: i64,
    pub peso: f64,
    pub color: Option<String>,
    pub foto: Option<String>,
    pub cliente_id: i64,
}

impl NewPet {
    pub fn validate(&self) -> AppResult<()> {
        validate_pet_fields(&self.nombre, &self.especie, &self.raza, self.edad, self.peso)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PetChanges {
    pub nombre: Option<String>,
    pub especie: Option<String>,
    pub raza: Option<String>,
    pub edad: Option<i64>,
    pub peso: Option<f64>,
    pub color: Option<String>,
    pub foto: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum VaccineStatus {
    #[display("Al día con vacunas")]
    UpToDate,
    #[display("Vacuna pendiente")]
    Pending,
}

fn validate_pet_fields(
    nombre: &str,
    especie: &str,
    raza: &str,
    edad: i64,
    peso: f64,
) -> AppResult<()> {
    if [nombre, especie, raza].iter().any(|v| v.trim().is_empty()) {
        return Err(AppError::Validation(
            "nombre, especie and raza are required".into(),
        ));
    }
    if edad < 0 {
        return Err(AppError::Validation("edad can not be negative".into()));
    }
    if !(peso.is_finite() && peso > 0.0) {
        return Err(AppError::Validation("peso must be greater than 0".into()));
    }
    Ok(())
}
