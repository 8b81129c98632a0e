//! # User API Module
//!
//! Directory lookups used by the booking form (vet picker) and by the vet
//! screens (owner names next to each patient).

use crate::{
    error::{AppError, AppResult},
    models, repo,
};
use std::collections::HashMap;

/// Name shown when a row points to a user that no longer exists.
pub const UNKNOWN_CLIENT: &str = "Cliente desconocido";

/// All users registered as veterinarians, in id order.
pub async fn list_veterinarians(repo: &repo::ImplAppRepo) -> AppResult<Vec<models::user::User>> {
    Ok(repo
        .list_users()
        .await?
        .into_iter()
        .filter(|user| user.is_vet())
        .collect())
}

pub async fn list_clients(repo: &repo::ImplAppRepo) -> AppResult<Vec<models::user::User>> {
    Ok(repo
        .list_users()
        .await?
        .into_iter()
        .filter(|user| !user.is_vet())
        .collect())
}

/// Retrieves a user by id.
///
/// # Errors
/// Returns [`AppError::NotFound`] when no user has that id.
pub async fn find_user(user_id: i64, repo: &repo::ImplAppRepo) -> AppResult<models::user::User> {
    repo.get_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("user", user_id))
}

/// Id to display name, for list screens that only carry foreign keys.
pub fn names_by_id(users: &[models::user::User]) -> HashMap<i64, &str> {
    users
        .iter()
        .map(|user| (user.id, user.nombre.as_str()))
        .collect()
}

pub fn name_or_unknown<'a>(names: &HashMap<i64, &'a str>, user_id: i64) -> &'a str {
    names.get(&user_id).copied().unwrap_or(UNKNOWN_CLIENT)
}
