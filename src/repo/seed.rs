//! Fixture rows written the first time the store is created.

use chrono::{NaiveDate, NaiveTime};

use crate::models::{
    appointment::{AppointmentStatus, NewAppointment},
    pet::NewPet,
    user::{NewUser, UserRole, VetProfile},
};

pub const SEED_PASSWORD: &str = "123456";

pub fn users() -> Vec<NewUser> {
    vec![
        NewUser {
            direccion: Some("Calle 100 #15-20, Bogotá".into()),
            ..NewUser::cliente(
                "Juan Pérez",
                "juan@cliente.com",
                SEED_PASSWORD,
                "+57 300 123 4567",
            )
        },
        NewUser {
            nombre: "Dr. Ricardo López".into(),
            email: "ricardo@vet.com".into(),
            password: SEED_PASSWORD.into(),
            telefono: Some("+57 301 234 5678".into()),
            direccion: None,
            role: UserRole::Veterinario(VetProfile {
                especialidad: Some("Medicina General Veterinaria".into()),
                licencia: Some("MV-12345".into()),
                horario: Some("Lun-Vie: 8AM-6PM".into()),
                experiencia: Some(8),
            }),
        },
    ]
}

pub fn pets(cliente_id: i64) -> Vec<NewPet> {
    vec![
        NewPet {
            nombre: "Max".into(),
            especie: "Perro".into(),
            raza: "Labrador".into(),
            edad: 3,
            peso: 28.0,
            color: Some("Dorado".into()),
            foto: None,
            cliente_id,
        },
        NewPet {
            nombre: "Luna".into(),
            especie: "Gato".into(),
            raza: "Siamés".into(),
            edad: 2,
            peso: 4.0,
            color: Some("Blanco".into()),
            foto: None,
            cliente_id,
        },
    ]
}

/// (pet index in [`pets`], nombre, fecha)
pub const VACCINES: [(usize, &str, (i32, u32, u32)); 3] = [
    (0, "Rabia", (2024, 8, 15)),
    (0, "Parvovirus", (2024, 7, 20)),
    (1, "Triple Felina", (2024, 6, 10)),
];

pub fn vaccine_date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn appointment(mascota_id: i64, cliente_id: i64, veterinario_id: i64) -> NewAppointment {
    NewAppointment {
        fecha: NaiveDate::from_ymd_opt(2024, 11, 2).unwrap_or_default(),
        hora_inicio: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
        hora_fin: NaiveTime::from_hms_opt(10, 45, 0).unwrap_or_default(),
        mascota_id,
        cliente_id,
        veterinario_id,
        servicio: "Control Veterinario".into(),
        precio: Some(50000.0),
        estado: Some(AppointmentStatus::Confirmada),
        sintomas: None,
    }
}
