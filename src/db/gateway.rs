//! Escritura y lectura de la tabla `asignaciones`.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use crate::error::MotorError;
use crate::models::{Asignacion, AsignacionId, Modalidad, Origen, PeriodoId};

const COLUMNAS: &str =
    "id, grupo_id, docente_id, aula_id, bloque_horario_id, periodo_id, modalidad_id, origen";

fn leer_fila(row: &Row<'_>) -> rusqlite::Result<(Asignacion, i64)> {
    let origen: String = row.get(7)?;
    Ok((
        Asignacion {
            id: Some(row.get(0)?),
            grupo_id: row.get(1)?,
            docente_id: row.get(2)?,
            aula_id: row.get(3)?,
            bloque_id: row.get(4)?,
            periodo_id: row.get(5)?,
            modalidad: Modalidad::Presencial,
            origen: Origen::parse(&origen),
        },
        row.get(6)?,
    ))
}

fn con_modalidad((mut asignacion, modalidad_id): (Asignacion, i64)) -> Result<Asignacion, MotorError> {
    asignacion.modalidad = Modalidad::desde_id(modalidad_id)?;
    Ok(asignacion)
}

/// Persiste las asignaciones de una corrida en una sola transacción. Con
/// `sobrescribir` primero borra todas las filas del periodo. Devuelve las
/// asignaciones con su id ya asignado, en el mismo orden de entrada.
pub fn guardar_generacion(
    conn: &mut Connection,
    periodo_id: PeriodoId,
    colocadas: &[Asignacion],
    sobrescribir: bool,
) -> Result<Vec<Asignacion>, MotorError> {
    let tx = conn.transaction()?;
    if sobrescribir {
        let borradas = tx.execute("DELETE FROM asignaciones WHERE periodo_id = ?1", params![periodo_id])?;
        debug!(periodo_id, borradas, "asignaciones previas eliminadas");
    }

    let ts = Utc::now().to_rfc3339();
    let mut guardadas = Vec::with_capacity(colocadas.len());
    {
        let mut stmt = tx.prepare(
            "INSERT INTO asignaciones (
                grupo_id, docente_id, aula_id, bloque_horario_id, periodo_id,
                modalidad_id, origen, creado_en, actualizado_en
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        )?;
        for a in colocadas {
            stmt.execute(params![
                a.grupo_id,
                a.docente_id,
                a.aula_id,
                a.bloque_id,
                periodo_id,
                a.modalidad.id(),
                a.origen.as_str(),
                ts,
            ])?;
            let mut nueva = a.clone();
            nueva.id = Some(tx.last_insert_rowid());
            nueva.periodo_id = periodo_id;
            guardadas.push(nueva);
        }
    }
    tx.commit()?;
    Ok(guardadas)
}

/// Actualiza los campos editables de una fila existente.
pub fn actualizar_asignacion(conn: &Connection, asignacion: &Asignacion) -> Result<(), MotorError> {
    let Some(id) = asignacion.id else {
        return Err(MotorError::Interno("actualizar_asignacion sobre una asignación sin id".to_string()));
    };
    let ts = Utc::now().to_rfc3339();
    let n = conn.execute(
        "UPDATE asignaciones
         SET docente_id = ?1, aula_id = ?2, bloque_horario_id = ?3, modalidad_id = ?4,
             origen = ?5, actualizado_en = ?6
         WHERE id = ?7",
        params![
            asignacion.docente_id,
            asignacion.aula_id,
            asignacion.bloque_id,
            asignacion.modalidad.id(),
            asignacion.origen.as_str(),
            ts,
            id,
        ],
    )?;
    if n == 0 {
        return Err(crate::error::InputError::AsignacionNoExiste(id).into());
    }
    Ok(())
}

pub fn buscar_asignacion(conn: &Connection, id: AsignacionId) -> Result<Option<Asignacion>, MotorError> {
    let sql = format!("SELECT {} FROM asignaciones WHERE id = ?1", COLUMNAS);
    let fila = conn.query_row(&sql, params![id], leer_fila).optional()?;
    fila.map(con_modalidad).transpose()
}

/// Asignaciones comprometidas del periodo, ordenadas por id.
pub fn listar_asignaciones(conn: &Connection, periodo_id: PeriodoId) -> Result<Vec<Asignacion>, MotorError> {
    let sql = format!("SELECT {} FROM asignaciones WHERE periodo_id = ?1 ORDER BY id", COLUMNAS);
    let mut stmt = conn.prepare(&sql)?;
    let filas = stmt.query_map(params![periodo_id], leer_fila)?;
    let mut out = Vec::new();
    for fila in filas {
        out.push(con_modalidad(fila?)?);
    }
    Ok(out)
}
