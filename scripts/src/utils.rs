use animalia::{
    api,
    models::{appointment::Appointment, pet::Pet, user::User},
};

pub fn user_line(user: &User) -> String {
    let especialidad = user
        .role
        .vet_profile()
        .and_then(|profile| profile.especialidad.as_deref())
        .unwrap_or("-");

    format!(
        "{:>4}  {:<12} {:<28} {:<24} {}",
        user.id,
        user.kind().to_string(),
        user.email,
        user.nombre,
        especialidad
    )
}

pub fn pet_line(pet: &Pet) -> String {
    format!(
        "{:>4}  {:<12} {:<10} {:<20} {:>3} años {:>6.1} kg  cliente={}  {}",
        pet.id,
        pet.nombre,
        pet.especie,
        pet.raza,
        pet.edad,
        pet.peso,
        pet.cliente_id,
        pet.vaccine_status()
    )
}

pub fn appointment_line(appointment: &Appointment) -> String {
    format!(
        "{:>4}  {} {}-{}  {:<11} mascota={} vet={}  {}",
        appointment.id,
        api::appointment::format_fecha(appointment.fecha),
        appointment.hora_inicio.format("%H:%M"),
        appointment.hora_fin.format("%H:%M"),
        appointment.estado.to_string(),
        appointment.mascota_id,
        appointment.veterinario_id,
        appointment.servicio
    )
}
