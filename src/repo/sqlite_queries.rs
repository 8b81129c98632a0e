pub const QUERY_CREATE_TABLES: &str = include_str!("../../migrations/0001_create_tables.sql");

pub const QUERY_COUNT_USERS: &str = "SELECT COUNT(*) FROM users;";

pub const QUERY_SELECT_USERS: &str = r#"
SELECT
    id,nombre,email,password,telefono,direccion,tipo,
    especialidad,licencia,horario,experiencia
FROM users
ORDER BY id;
"#;

pub const QUERY_GET_USER_BY_EMAIL: &str = r#"
SELECT
    id,nombre,email,password,telefono,direccion,tipo,
    especialidad,licencia,horario,experiencia
FROM users
WHERE email=$1;
"#;

pub const QUERY_GET_USER_BY_ID: &str = r#"
SELECT
    id,nombre,email,password,telefono,direccion,tipo,
    especialidad,licencia,horario,experiencia
FROM users
WHERE id=$1;
"#;

pub const QUERY_INSERT_USER: &str = r#"
INSERT INTO users (
    nombre,email,password,telefono,direccion,tipo,
    especialidad,licencia,horario,experiencia
) VALUES($1,$2,$3,$4,$5,$6,$7,$8,$9,$10);
"#;

pub const QUERY_UPDATE_USER: &str = r#"
UPDATE users SET
    nombre=$2,
    email=$3,
    telefono=$4,
    direccion=$5,
    especialidad=$6,
    licencia=$7,
    horario=$8,
    experiencia=$9
WHERE id=$1;
"#;

pub const QUERY_SELECT_PETS: &str = r#"
SELECT id,nombre,especie,raza,edad,peso,color,foto,cliente_id
FROM pets
ORDER BY id;
"#;

pub const QUERY_GET_PET_BY_ID: &str = r#"
SELECT id,nombre,especie,raza,edad,peso,color,foto,cliente_id
FROM pets
WHERE id=$1;
"#;

pub const QUERY_INSERT_PET: &str = r#"
INSERT INTO pets (
    nombre,especie,raza,edad,peso,color,foto,cliente_id
) VALUES($1,$2,$3,$4,$5,$6,$7,$8);
"#;

pub const QUERY_UPDATE_PET: &str = r#"
UPDATE pets SET
    nombre=$2,
    especie=$3,
    raza=$4,
    edad=$5,
    peso=$6,
    color=$7,
    foto=$8
WHERE id=$1;
"#;

pub const QUERY_UPDATE_PET_PESO: &str = "UPDATE pets SET peso=$2 WHERE id=$1 AND peso<>$2;";

pub const QUERY_DELETE_PET: &str = "DELETE FROM pets WHERE id=$1;";

pub const QUERY_SELECT_VACCINES: &str = r#"
SELECT id,pet_id,nombre,fecha
FROM vaccines
ORDER BY id;
"#;

pub const QUERY_GET_PET_VACCINES: &str = r#"
SELECT id,pet_id,nombre,fecha
FROM vaccines
WHERE pet_id=$1
ORDER BY id;
"#;

pub const QUERY_INSERT_VACCINE: &str =
    "INSERT INTO vaccines (pet_id,nombre,fecha) VALUES($1,$2,$3);";

pub const QUERY_DELETE_VACCINE: &str = "DELETE FROM vaccines WHERE id=$1;";

pub const QUERY_DELETE_PET_VACCINES: &str = "DELETE FROM vaccines WHERE pet_id=$1;";

pub const QUERY_SELECT_APPOINTMENTS: &str = r#"
SELECT
    id,fecha,hora_inicio,hora_fin,mascota_id,cliente_id,veterinario_id,
    servicio,precio,estado,diagnostico,tratamiento,sintomas,temperatura,peso_actual
FROM appointments
ORDER BY id;
"#;

pub const QUERY_GET_APPOINTMENT_BY_ID: &str = r#"
SELECT
    id,fecha,hora_inicio,hora_fin,mascota_id,cliente_id,veterinario_id,
    servicio,precio,estado,diagnostico,tratamiento,sintomas,temperatura,peso_actual
FROM appointments
WHERE id=$1;
"#;

pub const QUERY_INSERT_APPOINTMENT: &str = r#"
INSERT INTO appointments (
    fecha,hora_inicio,hora_fin,mascota_id,cliente_id,
    veterinario_id,servicio,precio,estado,sintomas
) VALUES($1,$2,$3,$4,$5,$6,$7,$8,$9,$10);
"#;

pub const QUERY_UPDATE_APPOINTMENT_OUTCOME: &str = r#"
UPDATE appointments SET
    diagnostico=$2,
    tratamiento=$3,
    sintomas=$4,
    temperatura=$5,
    peso_actual=$6,
    estado=$7
WHERE id=$1;
"#;

pub const QUERY_UPDATE_APPOINTMENT_SCHEDULE: &str = r#"
UPDATE appointments SET
    fecha=$2,
    hora_inicio=$3,
    hora_fin=$4,
    mascota_id=$5,
    veterinario_id=$6,
    servicio=$7,
    sintomas=$8,
    estado=$9
WHERE id=$1;
"#;

pub const QUERY_UPDATE_APPOINTMENT_ESTADO: &str =
    "UPDATE appointments SET estado=$2 WHERE id=$1;";

pub const QUERY_SAVE_SESSION: &str = r#"
INSERT INTO app_session (id,user_id,created_at) VALUES(1,$1,$2)
ON CONFLICT(id) DO UPDATE SET
    user_id=excluded.user_id,
    created_at=excluded.created_at;
"#;

pub const QUERY_LOAD_SESSION: &str = "SELECT user_id FROM app_session WHERE id=1;";

pub const QUERY_CLEAR_SESSION: &str = "DELETE FROM app_session;";
