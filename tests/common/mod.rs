// Fixtures compartidas por las pruebas de integración.
#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::BTreeSet;

use horarios::api_json::{
    OpcionesGeneracion, Preferencia, RestriccionDocente, SolicitudGeneracion, SolicitudValidada,
    validar_solicitud,
};
use horarios::models::{
    Asignacion, Aula, BloqueHorario, Catalogo, Dia, Docente, Franja, Grupo, Materia, Modalidad, Origen, Periodo,
};

pub const PERIODO: i64 = 1;

pub fn periodo(id: i64) -> Periodo {
    Periodo {
        id,
        nombre: format!("2025-{}", id),
        fecha_inicio: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        fecha_fin: NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
        activo: true,
    }
}

pub fn materia(id: i64) -> Materia {
    Materia { id, codigo: format!("MAT{}", id), nombre: format!("Materia {}", id), area_id: None }
}

pub fn grupo(id: i64, materia_id: i64, cupo: i32) -> Grupo {
    Grupo {
        id,
        materia_id,
        periodo_id: PERIODO,
        codigo: format!("G{}", id),
        cupo_maximo: cupo,
        cupo_minimo: None,
        modalidad: None,
    }
}

pub fn docente(id: i64, materias: &[i64]) -> Docente {
    Docente {
        id,
        persona_id: 100 + id,
        nombre: format!("Docente {}", id),
        activo: true,
        materias: materias.iter().copied().collect(),
        areas: BTreeSet::new(),
    }
}

pub fn aula(id: i64, capacidad: i32, piso: i32) -> Aula {
    Aula { id, codigo: format!("A-{}", id), capacidad, piso, es_virtual: false, activo: true }
}

pub fn bloque(id: i64, dia: Dia, inicio: &str, fin: &str) -> BloqueHorario {
    BloqueHorario { id, dia, franja: Franja::desde_texto(inicio, fin).unwrap(), activo: true }
}

pub fn asignacion(id: Option<i64>, grupo_id: i64, docente_id: i64, aula_id: i64, bloque_id: i64) -> Asignacion {
    Asignacion {
        id,
        grupo_id,
        docente_id,
        aula_id,
        bloque_id,
        periodo_id: PERIODO,
        modalidad: Modalidad::Presencial,
        origen: Origen::Automatica,
    }
}

pub fn catalogo(
    grupos: Vec<Grupo>,
    docentes: Vec<Docente>,
    aulas: Vec<Aula>,
    bloques: Vec<BloqueHorario>,
    asignaciones: Vec<Asignacion>,
) -> Catalogo {
    let mut materias: Vec<Materia> = grupos.iter().map(|g| materia(g.materia_id)).collect();
    materias.sort_by_key(|m| m.id);
    materias.dedup_by_key(|m| m.id);
    Catalogo::new(periodo(PERIODO), grupos, materias, docentes, aulas, bloques, asignaciones).unwrap()
}

pub fn solicitud(
    catalogo: &Catalogo,
    restricciones: &[(i64, &[i32])],
    preferencias: &[(i64, i64)],
) -> SolicitudValidada {
    solicitud_con(catalogo, restricciones, preferencias, OpcionesGeneracion::default())
}

pub fn solicitud_con(
    catalogo: &Catalogo,
    restricciones: &[(i64, &[i32])],
    preferencias: &[(i64, i64)],
    opciones: OpcionesGeneracion,
) -> SolicitudValidada {
    let s = SolicitudGeneracion {
        periodo_id: PERIODO,
        restricciones_docentes: restricciones
            .iter()
            .map(|(docente_id, pisos)| RestriccionDocente { docente_id: *docente_id, pisos: pisos.to_vec() })
            .collect(),
        preferencias: preferencias
            .iter()
            .map(|(docente_id, grupo_id)| Preferencia { docente_id: *docente_id, grupo_id: *grupo_id })
            .collect(),
        sobrescribir: false,
        opciones,
    };
    validar_solicitud(&s, catalogo).unwrap()
}

/// Base SQLite en memoria con tres periodos (el 3 inactivo), dos docentes,
/// dos aulas y dos bloques.
pub fn conexion_sembrada() -> rusqlite::Connection {
    let conn = horarios::db::open_connection(std::path::Path::new(":memory:")).unwrap();
    horarios::db::init_db(&conn).unwrap();
    conn.execute_batch(
        "INSERT INTO periodos VALUES (1, '2025-1', '2025-03-01', '2025-07-31', 1);
         INSERT INTO periodos VALUES (2, '2025-2', '2025-08-01', '2025-12-20', 1);
         INSERT INTO periodos VALUES (3, '2024-2', '2024-08-01', '2024-12-20', 0);
         INSERT INTO materias VALUES (10, 'MAT10', 'Cálculo', NULL);
         INSERT INTO grupos VALUES (1, 10, 1, 'G1', 30, NULL, NULL);
         INSERT INTO grupos VALUES (2, 10, 1, 'G2', 20, NULL, NULL);
         INSERT INTO grupos VALUES (3, 10, 2, 'G3', 20, NULL, NULL);
         INSERT INTO grupos VALUES (4, 10, 3, 'G4', 20, NULL, NULL);
         INSERT INTO docentes VALUES (1, 101, 'Ana', 1);
         INSERT INTO docentes VALUES (2, 102, 'Beto', 1);
         INSERT INTO docente_materias VALUES (1, 10);
         INSERT INTO docente_materias VALUES (2, 10);
         INSERT INTO aulas VALUES (1, 'A-1', 25, 1, 0, 1);
         INSERT INTO aulas VALUES (2, 'A-2', 40, 2, 0, 1);
         INSERT INTO bloques_horario VALUES (1, 'LU', '08:00', '09:30', 1);
         INSERT INTO bloques_horario VALUES (2, 'Martes', '10:00:00', '11:30:00', 1);",
    )
    .unwrap();
    conn
}
