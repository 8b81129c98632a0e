use derive_more::{Display, Error};
use log::error;

use crate::models::appointment::AppointmentStatus;

#[derive(Debug, Display, Error)]
pub enum AppError {
    #[display("invalid input: {_0}")]
    Validation(#[error(not(source))] String),
    #[display("invalid credentials")]
    InvalidCredentials,
    #[display("email already registered")]
    EmailAlreadyExists,
    #[display("no user logged in")]
    NotAuthenticated,
    #[display("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[display("estado can not change from {from} to {to}")]
    IllegalTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    #[display("password hash error: {_0}")]
    PasswordHash(#[error(not(source))] String),
    #[display("storage error: {_0}")]
    Storage(sqlx::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        error!("sqlite failure: {err}");
        AppError::Storage(err)
    }
}

impl AppError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        AppError::NotFound { entity, id }
    }

    /// Short message shown to the person using the app.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => format!("formulario con valores invalidos: {}", msg),
            AppError::InvalidCredentials => "Email o contraseña incorrectos".into(),
            AppError::EmailAlreadyExists => "El email ya está registrado".into(),
            AppError::NotAuthenticated => "favor de iniciar sesion".into(),
            AppError::NotFound { .. } => "recurso no encontrado".into(),
            AppError::IllegalTransition { from, to } => {
                format!("la cita no puede pasar de {from} a {to}")
            }
            AppError::PasswordHash(_) | AppError::Storage(_) => {
                "Error al guardar los datos".into()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
