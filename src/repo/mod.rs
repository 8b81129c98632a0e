pub mod seed;
pub mod sqlite;
pub mod sqlite_queries;

use crate::{error::AppResult, models};
use async_trait::async_trait;

/// Typed CRUD over the clinic store.
///
/// Reads are whole-table: callers filter in memory. Every write is visible
/// to the next call once it returns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppRepo {
    /// Creates the schema and seeds fixture data on the first run only.
    async fn initialize(&self) -> AppResult<()>;

    async fn list_users(&self) -> AppResult<Vec<models::user::User>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<models::user::User>>;

    async fn get_user(&self, user_id: i64) -> AppResult<Option<models::user::User>>;

    async fn insert_user(&self, user: &models::user::NewUser) -> AppResult<i64>;

    /// Merges `changes` into the stored row and returns the result.
    async fn update_user(
        &self,
        user_id: i64,
        changes: &models::user::UserChanges,
    ) -> AppResult<models::user::User>;

    /// Every pet with its vaccines.
    async fn list_pets(&self) -> AppResult<Vec<models::pet::Pet>>;

    async fn get_pet(&self, pet_id: i64) -> AppResult<Option<models::pet::Pet>>;

    async fn insert_pet(&self, pet: &models::pet::NewPet) -> AppResult<i64>;

    async fn update_pet(
        &self,
        pet_id: i64,
        changes: &models::pet::PetChanges,
    ) -> AppResult<models::pet::Pet>;

    /// Removes the pet and its vaccines. Appointments stay as history.
    async fn delete_pet(&self, pet_id: i64) -> AppResult<()>;

    async fn insert_vaccine(&self, vaccine: &models::pet::NewVaccine) -> AppResult<i64>;

    async fn delete_vaccine(&self, vaccine_id: i64) -> AppResult<()>;

    async fn list_appointments(&self) -> AppResult<Vec<models::appointment::Appointment>>;

    async fn get_appointment(
        &self,
        appointment_id: i64,
    ) -> AppResult<Option<models::appointment::Appointment>>;

    async fn insert_appointment(
        &self,
        appointment: &models::appointment::NewAppointment,
    ) -> AppResult<i64>;

    async fn update_appointment(
        &self,
        appointment_id: i64,
        outcome: &models::appointment::ConsultationOutcome,
    ) -> AppResult<models::appointment::Appointment>;

    /// Closes the appointment with the consultation results in one
    /// transaction: pendiente is confirmed first, the outcome is stored as
    /// completada and the pet weight follows `peso_actual`. Nothing is
    /// written when any step fails.
    async fn complete_consultation(
        &self,
        appointment_id: i64,
        outcome: &models::appointment::ConsultationOutcome,
    ) -> AppResult<models::appointment::Appointment>;

    async fn update_appointment_as_client(
        &self,
        appointment_id: i64,
        changes: &models::appointment::ScheduleChanges,
    ) -> AppResult<models::appointment::Appointment>;

    async fn cancel_appointment(
        &self,
        appointment_id: i64,
    ) -> AppResult<models::appointment::Appointment>;

    async fn save_session(&self, user_id: i64) -> AppResult<()>;

    async fn load_session(&self) -> AppResult<Option<i64>>;

    async fn clear_session(&self) -> AppResult<()>;
}

pub type ImplAppRepo = Box<dyn AppRepo>;
