//! # Pet API Module
//!
//! Pet records and their vaccination history. Clients manage their own pets;
//! vets see every pet that has at least one appointment with them.

use crate::{
    error::{AppError, AppResult},
    models, repo,
};
use log::debug;
use std::collections::HashSet;

/// Retrieves the pets owned by a client, vaccines included.
pub async fn pets_of_client(
    cliente_id: i64,
    repo: &repo::ImplAppRepo,
) -> AppResult<Vec<models::pet::Pet>> {
    Ok(repo
        .list_pets()
        .await?
        .into_iter()
        .filter(|pet| pet.cliente_id == cliente_id)
        .collect())
}

/// Retrieves a pet by id.
///
/// # Errors
/// Returns [`AppError::NotFound`] when no pet has that id.
pub async fn find_pet(pet_id: i64, repo: &repo::ImplAppRepo) -> AppResult<models::pet::Pet> {
    repo.get_pet(pet_id)
        .await?
        .ok_or_else(|| AppError::not_found("pet", pet_id))
}

/// Registers a new pet for its owner.
///
/// # Arguments
/// * `new_pet` - Pet form data, `cliente_id` included
/// * `repo` - Repository instance for database operations
///
/// # Returns
/// * `AppResult<i64>` - Id of the created pet
///
/// # Errors
/// Returns [`AppError::Validation`] if nombre, especie or raza are blank,
/// edad is negative or peso is not positive. Nothing is written then.
#[tracing::instrument(skip_all)]
pub async fn add_pet(new_pet: &models::pet::NewPet, repo: &repo::ImplAppRepo) -> AppResult<i64> {
    new_pet.validate()?;

    let pet_id = repo.insert_pet(new_pet).await?;
    debug!("pet {pet_id} added for client {}", new_pet.cliente_id);

    Ok(pet_id)
}

pub async fn edit_pet(
    pet_id: i64,
    changes: &models::pet::PetChanges,
    repo: &repo::ImplAppRepo,
) -> AppResult<models::pet::Pet> {
    repo.update_pet(pet_id, changes).await
}

/// Deletes the pet and its vaccines. Its appointments are kept as history.
pub async fn remove_pet(pet_id: i64, repo: &repo::ImplAppRepo) -> AppResult<()> {
    repo.delete_pet(pet_id).await
}

/// Adds a vaccine record to a pet.
///
/// # Errors
/// Returns [`AppError::Validation`] for a blank vaccine name and
/// [`AppError::NotFound`] when the pet does not exist.
#[tracing::instrument(skip(repo))]
pub async fn add_vaccine(
    vaccine: &models::pet::NewVaccine,
    repo: &repo::ImplAppRepo,
) -> AppResult<i64> {
    if vaccine.nombre.trim().is_empty() {
        return Err(AppError::Validation("vaccine nombre is required".into()));
    }

    if repo.get_pet(vaccine.pet_id).await?.is_none() {
        return Err(AppError::not_found("pet", vaccine.pet_id));
    }

    repo.insert_vaccine(&models::pet::NewVaccine {
        nombre: vaccine.nombre.trim().to_string(),
        ..vaccine.clone()
    })
    .await
}

/// Deleting an id that does not exist is not an error.
pub async fn remove_vaccine(vaccine_id: i64, repo: &repo::ImplAppRepo) -> AppResult<()> {
    repo.delete_vaccine(vaccine_id).await
}

/// Vaccination history as shown on the pet profile, latest first.
pub fn vaccines_newest_first(pet: &models::pet::Pet) -> Vec<&models::pet::Vaccine> {
    let mut vaccines: Vec<&models::pet::Vaccine> = pet.vacunas.iter().collect();
    vaccines.sort_by(|a, b| b.fecha.cmp(&a.fecha).then(b.id.cmp(&a.id)));
    vaccines
}

pub fn vaccine_status(pet: &models::pet::Pet) -> models::pet::VaccineStatus {
    pet.vaccine_status()
}

/// Pets with at least one appointment (in any estado) with the given vet.
///
/// # Arguments
/// * `veterinario_id` - ID of the vet whose patients are listed
/// * `repo` - Repository instance for database operations
///
/// # Returns
/// * `AppResult<Vec<Pet>>` - Patients in pet id order
pub async fn patients_of_vet(
    veterinario_id: i64,
    repo: &repo::ImplAppRepo,
) -> AppResult<Vec<models::pet::Pet>> {
    let patient_ids: HashSet<i64> = repo
        .list_appointments()
        .await?
        .iter()
        .filter(|appointment| appointment.veterinario_id == veterinario_id)
        .map(|appointment| appointment.mascota_id)
        .collect();

    Ok(repo
        .list_pets()
        .await?
        .into_iter()
        .filter(|pet| patient_ids.contains(&pet.id))
        .collect())
}

/// Case insensitive match on nombre, raza or especie. A blank query keeps
/// every pet.
pub fn search_pets<'a>(pets: &'a [models::pet::Pet], query: &str) -> Vec<&'a models::pet::Pet> {
    let query = query.trim().to_lowercase();

    pets.iter()
        .filter(|pet| {
            query.is_empty()
                || [&pet.nombre, &pet.raza, &pet.especie]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
        })
        .collect()
}
