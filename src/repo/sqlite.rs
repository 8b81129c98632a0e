use crate::{
    error::{AppError, AppResult},
    models::{
        appointment::{
            Appointment, AppointmentStatus, ConsultationOutcome, HOUR_MINUTE_FORMAT,
            NewAppointment, ScheduleChanges, hour_minute,
        },
        pet::{NewPet, NewVaccine, Pet, PetChanges, Vaccine},
        user::{NewUser, User, UserChanges, UserKind, UserRole, VetProfile},
    },
    utils,
};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use sqlx::{FromRow, Row, SqliteExecutor, SqlitePool, sqlite::SqliteRow};
use std::collections::HashMap;

use super::{AppRepo, seed, sqlite_queries};

#[derive(Clone)]
pub struct SqlxSqliteRepo {
    pub db_pool: SqlitePool,
}

fn decode_err<E>(column: &str, err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(err),
    }
}

impl FromRow<'_, SqliteRow> for User {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let tipo: String = row.try_get("tipo")?;
        let role = match tipo
            .parse::<UserKind>()
            .map_err(|err| decode_err("tipo", err))?
        {
            UserKind::Cliente => UserRole::Cliente,
            UserKind::Veterinario => UserRole::Veterinario(VetProfile {
                especialidad: row.try_get("especialidad")?,
                licencia: row.try_get("licencia")?,
                horario: row.try_get("horario")?,
                experiencia: row.try_get("experiencia")?,
            }),
        };

        Ok(Self {
            id: row.try_get("id")?,
            nombre: row.try_get("nombre")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password")?,
            telefono: row.try_get("telefono")?,
            direccion: row.try_get("direccion")?,
            role,
        })
    }
}

impl FromRow<'_, SqliteRow> for Pet {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            nombre: row.try_get("nombre")?,
            especie: row.try_get("especie")?,
            raza: row.try_get("raza")?,
            edad: row.try_get("edad")?,
            peso: row.try_get("peso")?,
            color: row.try_get("color")?,
            foto: row.try_get("foto")?,
            cliente_id: row.try_get("cliente_id")?,
            vacunas: Vec::new(),
        })
    }
}

impl FromRow<'_, SqliteRow> for Vaccine {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            pet_id: row.try_get("pet_id")?,
            nombre: row.try_get("nombre")?,
            fecha: row.try_get("fecha")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for Appointment {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let hora_inicio: String = row.try_get("hora_inicio")?;
        let hora_fin: String = row.try_get("hora_fin")?;
        let estado: String = row.try_get("estado")?;

        Ok(Self {
            id: row.try_get("id")?,
            fecha: row.try_get("fecha")?,
            hora_inicio: hour_minute::parse(&hora_inicio)
                .map_err(|err| decode_err("hora_inicio", err))?,
            hora_fin: hour_minute::parse(&hora_fin).map_err(|err| decode_err("hora_fin", err))?,
            mascota_id: row.try_get("mascota_id")?,
            cliente_id: row.try_get("cliente_id")?,
            veterinario_id: row.try_get("veterinario_id")?,
            servicio: row.try_get("servicio")?,
            precio: row.try_get("precio")?,
            estado: estado
                .parse::<AppointmentStatus>()
                .map_err(|err| decode_err("estado", err))?,
            diagnostico: row.try_get("diagnostico")?,
            tratamiento: row.try_get("tratamiento")?,
            sintomas: row.try_get("sintomas")?,
            temperatura: row.try_get("temperatura")?,
            peso_actual: row.try_get("peso_actual")?,
        })
    }
}

/// A duplicated email surfaces as a domain error, not as a storage failure.
fn map_unique_email(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::EmailAlreadyExists
        }
        _ => err.into(),
    }
}

async fn insert_user_row<'e, E: SqliteExecutor<'e>>(
    executor: E,
    user: &NewUser,
) -> AppResult<i64> {
    let password_hash = utils::hash_password(&user.password)?;
    let profile = user.role.vet_profile().cloned().unwrap_or_default();

    Ok(sqlx::query(sqlite_queries::QUERY_INSERT_USER)
        .bind(&user.nombre)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.telefono)
        .bind(&user.direccion)
        .bind(user.role.kind().to_string())
        .bind(profile.especialidad)
        .bind(profile.licencia)
        .bind(profile.horario)
        .bind(profile.experiencia)
        .execute(executor)
        .await
        .map_err(map_unique_email)?
        .last_insert_rowid())
}

async fn insert_pet_row<'e, E: SqliteExecutor<'e>>(executor: E, pet: &NewPet) -> AppResult<i64> {
    Ok(sqlx::query(sqlite_queries::QUERY_INSERT_PET)
        .bind(&pet.nombre)
        .bind(&pet.especie)
        .bind(&pet.raza)
        .bind(pet.edad)
        .bind(pet.peso)
        .bind(&pet.color)
        .bind(&pet.foto)
        .bind(pet.cliente_id)
        .execute(executor)
        .await?
        .last_insert_rowid())
}

async fn insert_vaccine_row<'e, E: SqliteExecutor<'e>>(
    executor: E,
    vaccine: &NewVaccine,
) -> AppResult<i64> {
    Ok(sqlx::query(sqlite_queries::QUERY_INSERT_VACCINE)
        .bind(vaccine.pet_id)
        .bind(&vaccine.nombre)
        .bind(vaccine.fecha)
        .execute(executor)
        .await?
        .last_insert_rowid())
}

async fn insert_appointment_row<'e, E: SqliteExecutor<'e>>(
    executor: E,
    appointment: &NewAppointment,
) -> AppResult<i64> {
    Ok(sqlx::query(sqlite_queries::QUERY_INSERT_APPOINTMENT)
        .bind(appointment.fecha)
        .bind(appointment.hora_inicio.format(HOUR_MINUTE_FORMAT).to_string())
        .bind(appointment.hora_fin.format(HOUR_MINUTE_FORMAT).to_string())
        .bind(appointment.mascota_id)
        .bind(appointment.cliente_id)
        .bind(appointment.veterinario_id)
        .bind(&appointment.servicio)
        .bind(appointment.precio)
        .bind(appointment.estado.unwrap_or_default().to_string())
        .bind(&appointment.sintomas)
        .execute(executor)
        .await?
        .last_insert_rowid())
}

async fn fetch_appointment<'e, E: SqliteExecutor<'e>>(
    executor: E,
    appointment_id: i64,
) -> AppResult<Appointment> {
    sqlx::query_as::<_, Appointment>(sqlite_queries::QUERY_GET_APPOINTMENT_BY_ID)
        .bind(appointment_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found("appointment", appointment_id))
}

#[async_trait]
impl AppRepo for SqlxSqliteRepo {
    async fn initialize(&self) -> AppResult<()> {
        sqlx::raw_sql(sqlite_queries::QUERY_CREATE_TABLES)
            .execute(&self.db_pool)
            .await?;

        let users: i64 = sqlx::query_scalar(sqlite_queries::QUERY_COUNT_USERS)
            .fetch_one(&self.db_pool)
            .await?;
        if users > 0 {
            info!("existing database loaded with {users} users");
            return Ok(());
        }

        let mut transaction = self.db_pool.begin().await?;

        let mut user_ids = Vec::new();
        for user in seed::users() {
            user_ids.push(insert_user_row(&mut *transaction, &user).await?);
        }
        let (cliente_id, veterinario_id) = (user_ids[0], user_ids[1]);

        let mut pet_ids = Vec::new();
        for pet in seed::pets(cliente_id) {
            pet_ids.push(insert_pet_row(&mut *transaction, &pet).await?);
        }

        for (pet_index, nombre, fecha) in seed::VACCINES {
            let vaccine = NewVaccine {
                pet_id: pet_ids[pet_index],
                nombre: nombre.to_string(),
                fecha: seed::vaccine_date(fecha),
            };
            insert_vaccine_row(&mut *transaction, &vaccine).await?;
        }

        insert_appointment_row(
            &mut *transaction,
            &seed::appointment(pet_ids[0], cliente_id, veterinario_id),
        )
        .await?;

        transaction.commit().await?;

        info!("new database created with fixture data");
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(
            sqlx::query_as::<_, User>(sqlite_queries::QUERY_SELECT_USERS)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(
            sqlx::query_as::<_, User>(sqlite_queries::QUERY_GET_USER_BY_EMAIL)
                .bind(email)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        Ok(
            sqlx::query_as::<_, User>(sqlite_queries::QUERY_GET_USER_BY_ID)
                .bind(user_id)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn insert_user(&self, user: &NewUser) -> AppResult<i64> {
        let user_id = insert_user_row(&self.db_pool, user).await?;
        debug!("user {user_id} inserted as {}", user.role.kind());
        Ok(user_id)
    }

    async fn update_user(&self, user_id: i64, changes: &UserChanges) -> AppResult<User> {
        let mut transaction = self.db_pool.begin().await?;

        let user = sqlx::query_as::<_, User>(sqlite_queries::QUERY_GET_USER_BY_ID)
            .bind(user_id)
            .fetch_optional(&mut *transaction)
            .await?
            .ok_or_else(|| AppError::not_found("user", user_id))?
            .merge(changes.clone())?;
        let profile = user.role.vet_profile().cloned().unwrap_or_default();

        sqlx::query(sqlite_queries::QUERY_UPDATE_USER)
            .bind(user.id)
            .bind(&user.nombre)
            .bind(&user.email)
            .bind(&user.telefono)
            .bind(&user.direccion)
            .bind(profile.especialidad)
            .bind(profile.licencia)
            .bind(profile.horario)
            .bind(profile.experiencia)
            .execute(&mut *transaction)
            .await
            .map_err(map_unique_email)?;

        transaction.commit().await?;

        Ok(user)
    }

    async fn list_pets(&self) -> AppResult<Vec<Pet>> {
        let mut pets = sqlx::query_as::<_, Pet>(sqlite_queries::QUERY_SELECT_PETS)
            .fetch_all(&self.db_pool)
            .await?;

        let mut vaccines_by_pet: HashMap<i64, Vec<Vaccine>> = HashMap::new();
        for vaccine in sqlx::query_as::<_, Vaccine>(sqlite_queries::QUERY_SELECT_VACCINES)
            .fetch_all(&self.db_pool)
            .await?
        {
            vaccines_by_pet
                .entry(vaccine.pet_id)
                .or_default()
                .push(vaccine);
        }

        for pet in pets.iter_mut() {
            pet.vacunas = vaccines_by_pet.remove(&pet.id).unwrap_or_default();
        }

        Ok(pets)
    }

    async fn get_pet(&self, pet_id: i64) -> AppResult<Option<Pet>> {
        let Some(mut pet) = sqlx::query_as::<_, Pet>(sqlite_queries::QUERY_GET_PET_BY_ID)
            .bind(pet_id)
            .fetch_optional(&self.db_pool)
            .await?
        else {
            return Ok(None);
        };

        pet.vacunas = sqlx::query_as::<_, Vaccine>(sqlite_queries::QUERY_GET_PET_VACCINES)
            .bind(pet_id)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(Some(pet))
    }

    async fn insert_pet(&self, pet: &NewPet) -> AppResult<i64> {
        insert_pet_row(&self.db_pool, pet).await
    }

    async fn update_pet(&self, pet_id: i64, changes: &PetChanges) -> AppResult<Pet> {
        let mut transaction = self.db_pool.begin().await?;

        let mut pet = sqlx::query_as::<_, Pet>(sqlite_queries::QUERY_GET_PET_BY_ID)
            .bind(pet_id)
            .fetch_optional(&mut *transaction)
            .await?
            .ok_or_else(|| AppError::not_found("pet", pet_id))?
            .merge(changes.clone())?;

        sqlx::query(sqlite_queries::QUERY_UPDATE_PET)
            .bind(pet.id)
            .bind(&pet.nombre)
            .bind(&pet.especie)
            .bind(&pet.raza)
            .bind(pet.edad)
            .bind(pet.peso)
            .bind(&pet.color)
            .bind(&pet.foto)
            .execute(&mut *transaction)
            .await?;

        pet.vacunas = sqlx::query_as::<_, Vaccine>(sqlite_queries::QUERY_GET_PET_VACCINES)
            .bind(pet_id)
            .fetch_all(&mut *transaction)
            .await?;

        transaction.commit().await?;
        Ok(pet)
    }

    async fn delete_pet(&self, pet_id: i64) -> AppResult<()> {
        let mut transaction = self.db_pool.begin().await?;

        sqlx::query(sqlite_queries::QUERY_DELETE_PET_VACCINES)
            .bind(pet_id)
            .execute(&mut *transaction)
            .await?;

        let deleted = sqlx::query(sqlite_queries::QUERY_DELETE_PET)
            .bind(pet_id)
            .execute(&mut *transaction)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(AppError::not_found("pet", pet_id));
        }

        transaction.commit().await?;
        Ok(())
    }

    async fn insert_vaccine(&self, vaccine: &NewVaccine) -> AppResult<i64> {
        insert_vaccine_row(&self.db_pool, vaccine).await
    }

    async fn delete_vaccine(&self, vaccine_id: i64) -> AppResult<()> {
        sqlx::query(sqlite_queries::QUERY_DELETE_VACCINE)
            .bind(vaccine_id)
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }

    async fn list_appointments(&self) -> AppResult<Vec<Appointment>> {
        Ok(
            sqlx::query_as::<_, Appointment>(sqlite_queries::QUERY_SELECT_APPOINTMENTS)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn get_appointment(&self, appointment_id: i64) -> AppResult<Option<Appointment>> {
        Ok(
            sqlx::query_as::<_, Appointment>(sqlite_queries::QUERY_GET_APPOINTMENT_BY_ID)
                .bind(appointment_id)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn insert_appointment(&self, appointment: &NewAppointment) -> AppResult<i64> {
        insert_appointment_row(&self.db_pool, appointment).await
    }

    async fn update_appointment(
        &self,
        appointment_id: i64,
        outcome: &ConsultationOutcome,
    ) -> AppResult<Appointment> {
        let mut transaction = self.db_pool.begin().await?;

        let appointment = fetch_appointment(&mut *transaction, appointment_id)
            .await?
            .apply_outcome(outcome.clone())?;

        sqlx::query(sqlite_queries::QUERY_UPDATE_APPOINTMENT_OUTCOME)
            .bind(appointment.id)
            .bind(&appointment.diagnostico)
            .bind(&appointment.tratamiento)
            .bind(&appointment.sintomas)
            .bind(appointment.temperatura)
            .bind(appointment.peso_actual)
            .bind(appointment.estado.to_string())
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;
        Ok(appointment)
    }

    async fn complete_consultation(
        &self,
        appointment_id: i64,
        outcome: &ConsultationOutcome,
    ) -> AppResult<Appointment> {
        outcome.validate()?;

        let mut transaction = self.db_pool.begin().await?;

        let mut appointment = fetch_appointment(&mut *transaction, appointment_id).await?;
        if appointment.estado == AppointmentStatus::Pendiente {
            appointment.estado = appointment
                .estado
                .transition_to(AppointmentStatus::Confirmada)?;
        }
        let appointment = appointment.apply_outcome(ConsultationOutcome {
            estado: Some(AppointmentStatus::Completada),
            ..outcome.clone()
        })?;

        sqlx::query(sqlite_queries::QUERY_UPDATE_APPOINTMENT_OUTCOME)
            .bind(appointment.id)
            .bind(&appointment.diagnostico)
            .bind(&appointment.tratamiento)
            .bind(&appointment.sintomas)
            .bind(appointment.temperatura)
            .bind(appointment.peso_actual)
            .bind(appointment.estado.to_string())
            .execute(&mut *transaction)
            .await?;

        if let Some(peso_actual) = outcome.peso_actual {
            let updated = sqlx::query(sqlite_queries::QUERY_UPDATE_PET_PESO)
                .bind(appointment.mascota_id)
                .bind(peso_actual)
                .execute(&mut *transaction)
                .await?
                .rows_affected();
            if updated > 0 {
                debug!("pet {} weight set to {peso_actual}", appointment.mascota_id);
            }
        }

        transaction.commit().await?;
        Ok(appointment)
    }

    async fn update_appointment_as_client(
        &self,
        appointment_id: i64,
        changes: &ScheduleChanges,
    ) -> AppResult<Appointment> {
        let mut transaction = self.db_pool.begin().await?;

        let appointment = fetch_appointment(&mut *transaction, appointment_id)
            .await?
            .apply_schedule(changes.clone())?;

        sqlx::query(sqlite_queries::QUERY_UPDATE_APPOINTMENT_SCHEDULE)
            .bind(appointment.id)
            .bind(appointment.fecha)
            .bind(appointment.hora_inicio.format(HOUR_MINUTE_FORMAT).to_string())
            .bind(appointment.hora_fin.format(HOUR_MINUTE_FORMAT).to_string())
            .bind(appointment.mascota_id)
            .bind(appointment.veterinario_id)
            .bind(&appointment.servicio)
            .bind(&appointment.sintomas)
            .bind(appointment.estado.to_string())
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;
        Ok(appointment)
    }

    async fn cancel_appointment(&self, appointment_id: i64) -> AppResult<Appointment> {
        let mut transaction = self.db_pool.begin().await?;

        let mut appointment = fetch_appointment(&mut *transaction, appointment_id).await?;
        appointment.estado = appointment
            .estado
            .transition_to(AppointmentStatus::Cancelada)?;

        sqlx::query(sqlite_queries::QUERY_UPDATE_APPOINTMENT_ESTADO)
            .bind(appointment.id)
            .bind(appointment.estado.to_string())
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;
        Ok(appointment)
    }

    async fn save_session(&self, user_id: i64) -> AppResult<()> {
        sqlx::query(sqlite_queries::QUERY_SAVE_SESSION)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }

    async fn load_session(&self) -> AppResult<Option<i64>> {
        Ok(sqlx::query_scalar::<_, i64>(sqlite_queries::QUERY_LOAD_SESSION)
            .fetch_optional(&self.db_pool)
            .await?)
    }

    async fn clear_session(&self) -> AppResult<()> {
        sqlx::query(sqlite_queries::QUERY_CLEAR_SESSION)
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }
}
