use animalia::{
    AppError, Session, api,
    models::{
        appointment::{AppointmentStatus, ConsultationOutcome, NewAppointment, ScheduleChanges},
        pet::{NewPet, NewVaccine, PetChanges, VaccineStatus},
        user::UserChanges,
    },
    repo::{AppRepo, ImplAppRepo, sqlite::SqlxSqliteRepo},
    utils,
};
use chrono::{NaiveDate, NaiveTime};

async fn seeded_repo() -> anyhow::Result<SqlxSqliteRepo> {
    let sqlite_repo = SqlxSqliteRepo {
        db_pool: utils::setup_sqlite_db_pool("sqlite::memory:").await?,
    };
    sqlite_repo.initialize().await?;
    Ok(sqlite_repo)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn hour(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn new_appointment(estado: Option<AppointmentStatus>) -> NewAppointment {
    NewAppointment {
        fecha: date(2024, 11, 10),
        hora_inicio: hour(14, 0),
        hora_fin: hour(14, 30),
        mascota_id: 2,
        cliente_id: 1,
        veterinario_id: 2,
        servicio: "Vacunación".into(),
        precio: Some(35000.0),
        estado,
        sintomas: None,
    }
}

#[tokio::test]
async fn initialize_seeds_once() -> anyhow::Result<()> {
    let sqlite_repo = seeded_repo().await?;
    sqlite_repo.initialize().await?;

    let users = sqlite_repo.list_users().await?;
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].nombre, "Juan Pérez");
    assert!(users[1].is_vet());
    assert!(users[0].password_hash.starts_with("$argon2"));

    let pets = sqlite_repo.list_pets().await?;
    assert_eq!(
        pets.iter().map(|p| p.nombre.as_str()).collect::<Vec<_>>(),
        vec!["Max", "Luna"]
    );
    assert_eq!(pets[0].vacunas.len(), 2);
    assert_eq!(pets[1].vacunas[0].nombre, "Triple Felina");

    let appointments = sqlite_repo.list_appointments().await?;
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].estado, AppointmentStatus::Confirmada);
    assert_eq!(appointments[0].hora_inicio, hour(10, 0));
    assert_eq!(appointments[0].precio, Some(50000.0));
    Ok(())
}

#[tokio::test]
async fn inserted_pet_reads_back_equal() -> anyhow::Result<()> {
    let sqlite_repo = seeded_repo().await?;
    let new_pet = NewPet {
        nombre: "Kiwi".into(),
        especie: "Ave".into(),
        raza: "Periquito".into(),
        edad: 1,
        peso: 0.04,
        color: None,
        foto: Some("data:image/png;base64,AAAA".into()),
        cliente_id: 1,
    };

    let pet_id = sqlite_repo.insert_pet(&new_pet).await?;
    let pet = sqlite_repo
        .list_pets()
        .await?
        .into_iter()
        .find(|p| p.id == pet_id)
        .unwrap();

    assert_eq!(pet.nombre, new_pet.nombre);
    assert_eq!(pet.especie, new_pet.especie);
    assert_eq!(pet.raza, new_pet.raza);
    assert_eq!(pet.edad, new_pet.edad);
    assert_eq!(pet.peso, new_pet.peso);
    assert_eq!(pet.color, new_pet.color);
    assert_eq!(pet.foto, new_pet.foto);
    assert_eq!(pet.cliente_id, 1);
    assert!(pet.vacunas.is_empty());
    Ok(())
}

#[tokio::test]
async fn appointment_without_estado_is_pendiente() -> anyhow::Result<()> {
    let sqlite_repo = seeded_repo().await?;

    let appointment_id = sqlite_repo.insert_appointment(&new_appointment(None)).await?;
    let appointment = sqlite_repo.get_appointment(appointment_id).await?.unwrap();

    assert_eq!(appointment.estado, AppointmentStatus::Pendiente);
    assert_eq!(appointment.hora_fin, hour(14, 30));
    Ok(())
}

#[tokio::test]
async fn deleted_vaccine_is_gone_and_missing_id_is_ignored() -> anyhow::Result<()> {
    let sqlite_repo = seeded_repo().await?;
    let max = sqlite_repo.get_pet(1).await?.unwrap();
    let rabia = max.vacunas.iter().find(|v| v.nombre == "Rabia").unwrap();

    sqlite_repo.delete_vaccine(rabia.id).await?;
    sqlite_repo.delete_vaccine(9999).await?;

    let max = sqlite_repo.get_pet(1).await?.unwrap();
    assert!(max.vacunas.iter().all(|v| v.id != rabia.id));
    assert_eq!(max.vacunas.len(), 1);
    Ok(())
}

#[tokio::test]
async fn delete_pet_takes_its_vaccines() -> anyhow::Result<()> {
    let sqlite_repo = seeded_repo().await?;

    sqlite_repo.delete_pet(1).await?;

    assert!(sqlite_repo.get_pet(1).await?.is_none());
    let remaining = sqlite_repo.list_pets().await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].vacunas.len(), 1);
    assert_eq!(sqlite_repo.list_appointments().await?.len(), 1);

    let result = sqlite_repo.delete_pet(1).await;
    assert!(matches!(result, Err(AppError::NotFound { entity: "pet", .. })));
    Ok(())
}

#[tokio::test]
async fn update_user_merges_and_rejects_vet_fields_on_client() -> anyhow::Result<()> {
    let sqlite_repo = seeded_repo().await?;

    let updated = sqlite_repo
        .update_user(
            1,
            &UserChanges {
                telefono: Some("+57 311 000 0000".into()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.telefono.as_deref(), Some("+57 311 000 0000"));
    assert_eq!(updated.direccion.as_deref(), Some("Calle 100 #15-20, Bogotá"));
    assert_eq!(updated.nombre, "Juan Pérez");

    let result = sqlite_repo
        .update_user(
            1,
            &UserChanges {
                licencia: Some("MV-1".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let stored = sqlite_repo.get_user(1).await?.unwrap();
    assert_eq!(stored.telefono.as_deref(), Some("+57 311 000 0000"));

    let vet = sqlite_repo
        .update_user(
            2,
            &UserChanges {
                horario: Some("Sáb: 9AM-1PM".into()),
                ..Default::default()
            },
        )
        .await?;
    let profile = vet.role.vet_profile().unwrap();
    assert_eq!(profile.horario.as_deref(), Some("Sáb: 9AM-1PM"));
    assert_eq!(profile.licencia.as_deref(), Some("MV-12345"));
    Ok(())
}

#[tokio::test]
async fn profile_edit_is_visible_through_the_session() -> anyhow::Result<()> {
    let sqlite_repo = seeded_repo().await?;
    let mut session = Session::new(Box::new(sqlite_repo.clone()));
    session.login("juan@cliente.com", "123456").await?;

    session
        .update_current_user(UserChanges {
            nombre: Some("Juan P. Gómez".into()),
            ..Default::default()
        })
        .await?;

    assert_eq!(
        session.current_user().map(|u| u.nombre.as_str()),
        Some("Juan P. Gómez")
    );
    assert_eq!(
        sqlite_repo.get_user(1).await?.map(|u| u.nombre),
        Some("Juan P. Gómez".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn closed_appointments_can_not_be_reopened() -> anyhow::Result<()> {
    let sqlite_repo = seeded_repo().await?;

    let completed = sqlite_repo
        .update_appointment(
            1,
            &ConsultationOutcome {
                diagnostico: Some("Sano".into()),
                tratamiento: Some("Ninguno".into()),
                estado: Some(AppointmentStatus::Completada),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(completed.estado, AppointmentStatus::Completada);

    let result = sqlite_repo.cancel_appointment(1).await;
    assert!(matches!(
        result,
        Err(AppError::IllegalTransition {
            from: AppointmentStatus::Completada,
            to: AppointmentStatus::Cancelada,
        })
    ));

    let result = sqlite_repo
        .update_appointment_as_client(
            1,
            &ScheduleChanges {
                estado: Some(AppointmentStatus::Pendiente),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::IllegalTransition { .. })));

    let stored = sqlite_repo.get_appointment(1).await?.unwrap();
    assert_eq!(stored.estado, AppointmentStatus::Completada);
    assert_eq!(stored.diagnostico.as_deref(), Some("Sano"));
    Ok(())
}

#[tokio::test]
async fn closed_appointments_keep_their_schedule() -> anyhow::Result<()> {
    let sqlite_repo = seeded_repo().await?;
    let cancelled_id = sqlite_repo.insert_appointment(&new_appointment(None)).await?;
    sqlite_repo.cancel_appointment(cancelled_id).await?;

    let result = sqlite_repo
        .update_appointment_as_client(
            cancelled_id,
            &ScheduleChanges {
                fecha: Some(date(2024, 12, 1)),
                servicio: Some("Cirugía".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let stored = sqlite_repo.get_appointment(cancelled_id).await?.unwrap();
    assert_eq!(stored.fecha, date(2024, 11, 10));
    assert_eq!(stored.servicio, "Vacunación");
    assert_eq!(stored.estado, AppointmentStatus::Cancelada);

    let open = sqlite_repo
        .update_appointment_as_client(
            1,
            &ScheduleChanges {
                fecha: Some(date(2024, 11, 3)),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(open.fecha, date(2024, 11, 3));
    Ok(())
}

#[tokio::test]
async fn rejected_consultation_writes_nothing() -> anyhow::Result<()> {
    let sqlite_repo = seeded_repo().await?;
    let repo: ImplAppRepo = Box::new(sqlite_repo.clone());

    let result = api::appointment::record_consultation(
        1,
        &ConsultationOutcome {
            diagnostico: Some("Sano".into()),
            tratamiento: Some("Nada".into()),
            peso_actual: Some(0.0),
            ..Default::default()
        },
        &repo,
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let stored = sqlite_repo.get_appointment(1).await?.unwrap();
    assert_eq!(stored.estado, AppointmentStatus::Confirmada);
    assert_eq!(stored.diagnostico, None);
    assert_eq!(sqlite_repo.get_pet(1).await?.unwrap().peso, 28.0);

    let cancelled_id = sqlite_repo.insert_appointment(&new_appointment(None)).await?;
    sqlite_repo.cancel_appointment(cancelled_id).await?;

    let result = sqlite_repo
        .complete_consultation(
            cancelled_id,
            &ConsultationOutcome {
                diagnostico: Some("Sano".into()),
                tratamiento: Some("Nada".into()),
                peso_actual: Some(5.0),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::IllegalTransition { .. })));

    let stored = sqlite_repo.get_appointment(cancelled_id).await?.unwrap();
    assert_eq!(stored.estado, AppointmentStatus::Cancelada);
    assert_eq!(stored.diagnostico, None);
    assert_eq!(sqlite_repo.get_pet(2).await?.unwrap().peso, 4.0);
    Ok(())
}

#[tokio::test]
async fn update_user_to_taken_email_keeps_the_row() -> anyhow::Result<()> {
    let sqlite_repo = seeded_repo().await?;

    let result = sqlite_repo
        .update_user(
            1,
            &UserChanges {
                email: Some("ricardo@vet.com".into()),
                nombre: Some("Juan Cambiado".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::EmailAlreadyExists)));

    let stored = sqlite_repo.get_user(1).await?.unwrap();
    assert_eq!(stored.email, "juan@cliente.com");
    assert_eq!(stored.nombre, "Juan Pérez");
    Ok(())
}

#[tokio::test]
async fn booking_rescheduling_and_consultation() -> anyhow::Result<()> {
    let repo: ImplAppRepo = Box::new(seeded_repo().await?);

    let appointment_id = api::appointment::book(
        &new_appointment(Some(AppointmentStatus::Completada)),
        &repo,
    )
    .await?;
    let booked = repo.get_appointment(appointment_id).await?.unwrap();
    assert_eq!(booked.estado, AppointmentStatus::Pendiente);

    let moved = api::appointment::reschedule(
        appointment_id,
        &ScheduleChanges {
            fecha: Some(date(2024, 11, 12)),
            hora_inicio: Some(hour(9, 0)),
            hora_fin: Some(hour(9, 30)),
            ..Default::default()
        },
        &repo,
    )
    .await?;
    assert_eq!(moved.fecha, date(2024, 11, 12));
    assert_eq!(moved.servicio, "Vacunación");

    let closed = api::appointment::record_consultation(
        appointment_id,
        &ConsultationOutcome {
            diagnostico: Some("Refuerzo aplicado".into()),
            tratamiento: Some("Control en un año".into()),
            peso_actual: Some(4.3),
            ..Default::default()
        },
        &repo,
    )
    .await?;
    assert_eq!(closed.estado, AppointmentStatus::Completada);

    let luna = repo.get_pet(2).await?.unwrap();
    assert_eq!(luna.peso, 4.3);

    let appointments = api::appointment::appointments_of_vet(2, &repo).await?;
    assert_eq!(api::appointment::completed_count(&appointments), 1);
    assert_eq!(api::appointment::last_recorded_weight(&appointments, &luna), 4.3);

    let patients = api::pet::patients_of_vet(2, &repo).await?;
    assert_eq!(patients.len(), 2);
    Ok(())
}

#[tokio::test]
async fn vaccines_through_the_pet_api() -> anyhow::Result<()> {
    let repo: ImplAppRepo = Box::new(seeded_repo().await?);

    api::pet::add_vaccine(
        &NewVaccine {
            pet_id: 2,
            nombre: "Leucemia Felina".into(),
            fecha: date(2024, 9, 30),
        },
        &repo,
    )
    .await?;

    let luna = api::pet::find_pet(2, &repo).await?;
    let newest = api::pet::vaccines_newest_first(&luna);
    assert_eq!(newest[0].nombre, "Leucemia Felina");
    assert_eq!(api::pet::vaccine_status(&luna), VaccineStatus::UpToDate);

    let edited = api::pet::edit_pet(
        2,
        &PetChanges {
            edad: Some(3),
            ..Default::default()
        },
        &repo,
    )
    .await?;
    assert_eq!(edited.edad, 3);
    assert_eq!(edited.vacunas.len(), 2);
    Ok(())
}
