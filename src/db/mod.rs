//! Acceso a la base de datos SQLite compartida con la capa CRUD.
//!
//! Las tablas de catálogo (periodos, materias, grupos, docentes, aulas,
//! bloques) las mantiene el resto del sistema; este crate sólo las lee. La
//! tabla `asignaciones` la escribe exclusivamente el motor.

pub mod gateway;
pub mod snapshot;

use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub use gateway::{actualizar_asignacion, buscar_asignacion, guardar_generacion, listar_asignaciones};
pub use snapshot::cargar_catalogo;

const ESQUEMA: &str = "
    CREATE TABLE IF NOT EXISTS periodos (
        id INTEGER PRIMARY KEY,
        nombre TEXT NOT NULL,
        fecha_inicio TEXT NOT NULL,
        fecha_fin TEXT NOT NULL,
        activo INTEGER NOT NULL DEFAULT 1
    );

    CREATE TABLE IF NOT EXISTS materias (
        id INTEGER PRIMARY KEY,
        codigo TEXT NOT NULL,
        nombre TEXT NOT NULL,
        area_id INTEGER
    );

    CREATE TABLE IF NOT EXISTS grupos (
        id INTEGER PRIMARY KEY,
        materia_id INTEGER NOT NULL REFERENCES materias(id),
        periodo_id INTEGER NOT NULL REFERENCES periodos(id) ON DELETE RESTRICT,
        codigo TEXT NOT NULL,
        cupo_maximo INTEGER NOT NULL,
        cupo_minimo INTEGER,
        modalidad_id INTEGER
    );

    CREATE TABLE IF NOT EXISTS docentes (
        id INTEGER PRIMARY KEY,
        persona_id INTEGER NOT NULL,
        nombre TEXT NOT NULL,
        activo INTEGER NOT NULL DEFAULT 1
    );

    CREATE TABLE IF NOT EXISTS docente_materias (
        docente_id INTEGER NOT NULL REFERENCES docentes(id),
        materia_id INTEGER NOT NULL REFERENCES materias(id),
        PRIMARY KEY (docente_id, materia_id)
    );

    CREATE TABLE IF NOT EXISTS docente_areas (
        docente_id INTEGER NOT NULL REFERENCES docentes(id),
        area_id INTEGER NOT NULL,
        PRIMARY KEY (docente_id, area_id)
    );

    CREATE TABLE IF NOT EXISTS aulas (
        id INTEGER PRIMARY KEY,
        codigo TEXT NOT NULL,
        capacidad INTEGER NOT NULL,
        piso INTEGER NOT NULL,
        es_virtual INTEGER NOT NULL DEFAULT 0,
        activo INTEGER NOT NULL DEFAULT 1
    );

    CREATE TABLE IF NOT EXISTS bloques_horario (
        id INTEGER PRIMARY KEY,
        dia TEXT NOT NULL,
        hora_inicio TEXT NOT NULL,
        hora_fin TEXT NOT NULL,
        activo INTEGER NOT NULL DEFAULT 1
    );

    CREATE TABLE IF NOT EXISTS asignaciones (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        grupo_id INTEGER NOT NULL REFERENCES grupos(id),
        docente_id INTEGER NOT NULL REFERENCES docentes(id),
        aula_id INTEGER NOT NULL REFERENCES aulas(id),
        bloque_horario_id INTEGER NOT NULL REFERENCES bloques_horario(id),
        periodo_id INTEGER NOT NULL REFERENCES periodos(id) ON DELETE RESTRICT,
        modalidad_id INTEGER NOT NULL,
        origen TEXT NOT NULL,
        creado_en TEXT NOT NULL,
        actualizado_en TEXT NOT NULL,
        UNIQUE (periodo_id, grupo_id)
    );
";

/// Abre la base en `path` (creando el directorio si hace falta). `:memory:`
/// abre una base en memoria.
pub fn open_connection(path: &Path) -> rusqlite::Result<Connection> {
    if path != Path::new(":memory:") {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                // si falla, Connection::open reporta el error concreto
                if let Err(e) = fs::create_dir_all(dir) {
                    warn!(dir = %dir.display(), error = %e, "no se pudo crear el directorio de la base");
                }
            }
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Crea las tablas si no existen.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    debug!("inicializando esquema");
    conn.execute_batch(ESQUEMA)
}
