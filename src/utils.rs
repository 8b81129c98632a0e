//! Helper functions shared by repo/, session and the scripts binary.

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    repo,
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use std::str::FromStr;

pub async fn setup_sqlite_db_pool(db_host: &str) -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(db_host)?.pragma("foreign_keys", "ON");

    // every connection to :memory: opens its own database
    if db_host.contains(":memory:") {
        return Ok(SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?);
    }

    Ok(SqlitePool::connect_with(
        options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal),
    )
    .await?)
}

/// Opens the configured store and makes sure schema and fixtures exist.
pub async fn open_repo(app_config: &AppConfig) -> AppResult<repo::sqlite::SqlxSqliteRepo> {
    let sqlite_repo = repo::sqlite::SqlxSqliteRepo {
        db_pool: setup_sqlite_db_pool(&app_config.db_host).await?,
    };
    repo::AppRepo::initialize(&sqlite_repo).await?;

    Ok(sqlite_repo)
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::PasswordHash(err.to_string()))
}

/// False for a wrong password and for a stored value that is not a PHC hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("123456").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("123456", &hash));
        assert!(!verify_password("654321", &hash));
    }

    #[test]
    fn test_verify_rejects_plain_text_column() {
        assert!(!verify_password("123456", "123456"));
    }
}
