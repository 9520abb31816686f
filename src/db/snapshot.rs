//! Carga del snapshot de catálogo de un periodo.
//!
//! Todo se lee una vez al comienzo de la corrida; el solver no vuelve a tocar
//! la base de datos.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{InputError, MotorError};
use crate::models::{
    AreaId, Aula, BloqueHorario, Catalogo, Dia, Docente, DocenteId, Franja, Grupo, Materia, MateriaId,
    Modalidad, Periodo, PeriodoId,
};

pub fn cargar_catalogo(conn: &Connection, periodo_id: PeriodoId) -> Result<Catalogo, MotorError> {
    let periodo = cargar_periodo(conn, periodo_id)?.ok_or(InputError::PeriodoNoExiste(periodo_id))?;
    let grupos = cargar_grupos(conn, periodo_id)?;
    let materias = cargar_materias(conn)?;
    let docentes = cargar_docentes(conn)?;
    let aulas = cargar_aulas(conn)?;
    let bloques = cargar_bloques(conn)?;
    let asignaciones = crate::db::gateway::listar_asignaciones(conn, periodo_id)?;
    Ok(Catalogo::new(periodo, grupos, materias, docentes, aulas, bloques, asignaciones)?)
}

fn parse_fecha(s: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| InputError::FechaInvalida(s.to_string()))
}

fn cargar_periodo(conn: &Connection, periodo_id: PeriodoId) -> Result<Option<Periodo>, MotorError> {
    let fila = conn
        .query_row(
            "SELECT id, nombre, fecha_inicio, fecha_fin, activo FROM periodos WHERE id = ?1",
            params![periodo_id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, bool>(4)?,
                ))
            },
        )
        .optional()?;
    let Some((id, nombre, inicio, fin, activo)) = fila else {
        return Ok(None);
    };
    Ok(Some(Periodo {
        id,
        nombre,
        fecha_inicio: parse_fecha(&inicio)?,
        fecha_fin: parse_fecha(&fin)?,
        activo,
    }))
}

fn cargar_grupos(conn: &Connection, periodo_id: PeriodoId) -> Result<Vec<Grupo>, MotorError> {
    let mut stmt = conn.prepare(
        "SELECT id, materia_id, periodo_id, codigo, cupo_maximo, cupo_minimo, modalidad_id
         FROM grupos WHERE periodo_id = ?1 ORDER BY id",
    )?;
    let filas = stmt.query_map(params![periodo_id], |row| {
        Ok((
            Grupo {
                id: row.get(0)?,
                materia_id: row.get(1)?,
                periodo_id: row.get(2)?,
                codigo: row.get(3)?,
                cupo_maximo: row.get(4)?,
                cupo_minimo: row.get(5)?,
                modalidad: None,
            },
            row.get::<_, Option<i64>>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for fila in filas {
        let (mut grupo, modalidad_id) = fila?;
        grupo.modalidad = modalidad_id.map(Modalidad::desde_id).transpose()?;
        out.push(grupo);
    }
    Ok(out)
}

fn cargar_materias(conn: &Connection) -> Result<Vec<Materia>, MotorError> {
    let mut stmt = conn.prepare("SELECT id, codigo, nombre, area_id FROM materias ORDER BY id")?;
    let filas = stmt.query_map([], |row| {
        Ok(Materia { id: row.get(0)?, codigo: row.get(1)?, nombre: row.get(2)?, area_id: row.get(3)? })
    })?;
    let mut out = Vec::new();
    for f in filas {
        out.push(f?);
    }
    Ok(out)
}

fn cargar_docentes(conn: &Connection) -> Result<Vec<Docente>, MotorError> {
    let mut materias: BTreeMap<DocenteId, BTreeSet<MateriaId>> = BTreeMap::new();
    {
        let mut stmt = conn.prepare("SELECT docente_id, materia_id FROM docente_materias")?;
        let filas = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?;
        for f in filas {
            let (d, m) = f?;
            materias.entry(d).or_default().insert(m);
        }
    }
    let mut areas: BTreeMap<DocenteId, BTreeSet<AreaId>> = BTreeMap::new();
    {
        let mut stmt = conn.prepare("SELECT docente_id, area_id FROM docente_areas")?;
        let filas = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?;
        for f in filas {
            let (d, a) = f?;
            areas.entry(d).or_default().insert(a);
        }
    }

    let mut stmt = conn.prepare("SELECT id, persona_id, nombre, activo FROM docentes ORDER BY id")?;
    let filas = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, String>(2)?, row.get::<_, bool>(3)?))
    })?;
    let mut out = Vec::new();
    for f in filas {
        let (id, persona_id, nombre, activo) = f?;
        out.push(Docente {
            id,
            persona_id,
            nombre,
            activo,
            materias: materias.remove(&id).unwrap_or_default(),
            areas: areas.remove(&id).unwrap_or_default(),
        });
    }
    Ok(out)
}

fn cargar_aulas(conn: &Connection) -> Result<Vec<Aula>, MotorError> {
    let mut stmt = conn.prepare("SELECT id, codigo, capacidad, piso, es_virtual, activo FROM aulas ORDER BY id")?;
    let filas = stmt.query_map([], |row| {
        Ok(Aula {
            id: row.get(0)?,
            codigo: row.get(1)?,
            capacidad: row.get(2)?,
            piso: row.get(3)?,
            es_virtual: row.get(4)?,
            activo: row.get(5)?,
        })
    })?;
    let mut out = Vec::new();
    for f in filas {
        out.push(f?);
    }
    Ok(out)
}

/// Las horas se guardan como texto ("08:00" o "08:00:00"); aquí se
/// normalizan a minutos para no compararlas nunca como cadenas.
fn cargar_bloques(conn: &Connection) -> Result<Vec<BloqueHorario>, MotorError> {
    let mut stmt = conn.prepare("SELECT id, dia, hora_inicio, hora_fin, activo FROM bloques_horario ORDER BY id")?;
    let filas = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, bool>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for f in filas {
        let (id, dia, inicio, fin, activo) = f?;
        let dia = Dia::parse(&dia).ok_or(InputError::DiaInvalido(dia))?;
        out.push(BloqueHorario { id, dia, franja: Franja::desde_texto(&inicio, &fin)?, activo });
    }
    Ok(out)
}
