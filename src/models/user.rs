use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Role stored in the `tipo` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
pub enum UserKind {
    #[serde(rename = "cliente")]
    #[display("cliente")]
    Cliente,
    #[serde(rename = "veterinario")]
    #[display("veterinario")]
    Veterinario,
}

impl std::str::FromStr for UserKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cliente" => Ok(UserKind::Cliente),
            "veterinario" => Ok(UserKind::Veterinario),
            other => Err(AppError::Validation(format!("unknown tipo: {other}"))),
        }
    }
}

/// Professional data only a veterinario carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VetProfile {
    pub especialidad: Option<String>,
    pub licencia: Option<String>,
    pub horario: Option<String>,
    pub experiencia: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "tipo", rename_all = "lowercase")]
pub enum UserRole {
    Cliente,
    Veterinario(VetProfile),
}

impl UserRole {
    pub fn kind(&self) -> UserKind {
        match self {
            UserRole::Cliente => UserKind::Cliente,
            UserRole::Veterinario(_) => UserKind::Veterinario,
        }
    }

    pub fn vet_profile(&self) -> Option<&VetProfile> {
        match self {
            UserRole::Cliente => None,
            UserRole::Veterinario(profile) => Some(profile),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    #[serde(flatten)]
    pub role: UserRole,
}

impl User {
    pub fn kind(&self) -> UserKind {
        self.role.kind()
    }

    pub fn is_vet(&self) -> bool {
        self.kind() == UserKind::Veterinario
    }

    /// Returns the user with `changes` merged in.
    ///
    /// Fields left as `None` keep their stored value and the role never
    /// changes. Veterinario fields sent for a cliente are rejected.
    pub fn merge(mut self, changes: UserChanges) -> AppResult<Self> {
        let touches_vet_profile = changes.touches_vet_profile();

        if let Some(nombre) = changes.nombre {
            self.nombre = required("nombre", nombre)?;
        }
        if let Some(email) = changes.email {
            self.email = required("email", email)?;
        }
        if changes.telefono.is_some() {
            self.telefono = changes.telefono;
        }
        if changes.direccion.is_some() {
            self.direccion = changes.direccion;
        }

        match &mut self.role {
            UserRole::Veterinario(profile) => {
                if changes.especialidad.is_some() {
                    profile.especialidad = changes.especialidad;
                }
                if changes.licencia.is_some() {
                    profile.licencia = changes.licencia;
                }
                if changes.horario.is_some() {
                    profile.horario = changes.horario;
                }
                if changes.experiencia.is_some() {
                    profile.experiencia = changes.experiencia;
                }
            }
            UserRole::Cliente if touches_vet_profile => {
                return Err(AppError::Validation(
                    "a cliente has no veterinario profile".into(),
                ));
            }
            UserRole::Cliente => {}
        }

        Ok(self)
    }
}

/// Data submitted by the registration form. `password` is plain text and is
/// hashed before it reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewUser {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    #[serde(flatten)]
    pub role: UserRole,
}

impl NewUser {
    pub fn cliente(nombre: &str, email: &str, password: &str, telefono: &str) -> Self {
        Self {
            nombre: nombre.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            telefono: Some(telefono.to_string()),
            direccion: None,
            role: UserRole::Cliente,
        }
    }

    pub fn fields_are_valid(&self) -> bool {
        [
            self.nombre.as_str(),
            self.email.as_str(),
            self.password.as_str(),
            self.telefono.as_deref().unwrap_or_default(),
        ]
        .iter()
        .all(|value| !value.trim().is_empty())
    }
}

/// Partial profile edit. `None` means "leave as is".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserChanges {
    pub nombre: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub especialidad: Option<String>,
    pub licencia: Option<String>,
    pub horario: Option<String>,
    pub experiencia: Option<i64>,
}

impl UserChanges {
    fn touches_vet_profile(&self) -> bool {
        self.especialidad.is_some()
            || self.licencia.is_some()
            || self.horario.is_some()
            || self.experiencia.is_some()
    }
}

fn required(field: &str, value: String) -> AppResult<String> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_vet() -> User {
        User {
            id: 2,
            nombre: "Dr. Ricardo López".into(),
            email: "ricardo@vet.com".into(),
            password_hash: String::new(),
            telefono: Some("+57 301 234 5678".into()),
            direccion: None,
            role: UserRole::Veterinario(VetProfile {
                especialidad: Some("Medicina General Veterinaria".into()),
                licencia: Some("MV-12345".into()),
                horario: Some("Lun-Vie: 8AM-6PM".into()),
                experiencia: Some(8),
            }),
        }
    }

    #[test]
    fn test_merge_keeps_unspecified_vet_fields() {
        let merged = create_test_vet()
            .merge(UserChanges {
                telefono: Some("+57 300 000 0000".into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(merged.telefono.as_deref(), Some("+57 300 000 0000"));
        let profile = merged.role.vet_profile().unwrap();
        assert_eq!(profile.licencia.as_deref(), Some("MV-12345"));
        assert_eq!(profile.experiencia, Some(8));
        assert!(merged.is_vet());
    }

    #[test]
    fn test_merge_rejects_vet_fields_on_cliente() {
        let cliente = User {
            role: UserRole::Cliente,
            ..create_test_vet()
        };

        let result = cliente.merge(UserChanges {
            especialidad: Some("Cirugía".into()),
            ..Default::default()
        });

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_merge_cliente_contact_fields_with_vet_field() {
        let cliente = User {
            role: UserRole::Cliente,
            ..create_test_vet()
        };

        let result = cliente.clone().merge(UserChanges {
            telefono: Some("+57 1".into()),
            direccion: Some("Calle 1".into()),
            horario: Some("Lun".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(AppError::Validation(_))));

        let merged = cliente
            .merge(UserChanges {
                telefono: Some("+57 1".into()),
                direccion: Some("Calle 1".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(merged.direccion.as_deref(), Some("Calle 1"));
        assert_eq!(merged.role, UserRole::Cliente);
    }

    #[test]
    fn test_merge_rejects_blank_nombre() {
        let result = create_test_vet().merge(UserChanges {
            nombre: Some("   ".into()),
            ..Default::default()
        });

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_user_serializes_tipo_tag_without_password() {
        let value = serde_json::to_value(create_test_vet()).unwrap();

        assert_eq!(value["tipo"], "veterinario");
        assert_eq!(value["licencia"], "MV-12345");
        assert!(value.get("password_hash").is_none());
    }

    #[test]
    fn test_new_user_from_json_form() {
        let new_user: NewUser = serde_json::from_str(
            r#"{"nombre":"Ana","email":"a@b.com","password":"x","telefono":"1","direccion":null,"tipo":"cliente"}"#,
        )
        .unwrap();

        assert_eq!(new_user.role, UserRole::Cliente);
        assert!(new_user.fields_are_valid());
        assert!(
            !NewUser {
                telefono: None,
                ..new_user
            }
            .fields_are_valid()
        );
    }
}
