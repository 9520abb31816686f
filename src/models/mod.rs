// Estructuras de datos principales del motor de horarios

pub mod catalogo;
pub mod tiempo;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::InputError;

pub use catalogo::Catalogo;
pub use tiempo::{Dia, Franja};

pub type PeriodoId = i64;
pub type GrupoId = i64;
pub type DocenteId = i64;
pub type AulaId = i64;
pub type BloqueId = i64;
pub type AsignacionId = i64;
pub type MateriaId = i64;
pub type AreaId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Periodo {
    pub id: PeriodoId,
    pub nombre: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub activo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Materia {
    pub id: MateriaId,
    pub codigo: String,
    pub nombre: String,
    pub area_id: Option<AreaId>,
}

/// Grupo (sección) de una materia en un periodo. Necesita exactamente una
/// asignación semanal por corrida.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grupo {
    pub id: GrupoId,
    pub materia_id: MateriaId,
    pub periodo_id: PeriodoId,
    pub codigo: String,
    pub cupo_maximo: i32,
    pub cupo_minimo: Option<i32>,
    /// Modalidad fija solicitada para el grupo; `None` = la decide el aula.
    pub modalidad: Option<Modalidad>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Docente {
    pub id: DocenteId,
    pub persona_id: i64,
    pub nombre: String,
    pub activo: bool,
    /// Materias que el docente tiene preasignadas.
    pub materias: BTreeSet<MateriaId>,
    /// Áreas que el docente cubre completas.
    pub areas: BTreeSet<AreaId>,
}

impl Docente {
    pub fn puede_dictar(&self, materia: &Materia) -> bool {
        self.activo
            && (self.materias.contains(&materia.id)
                || materia.area_id.is_some_and(|a| self.areas.contains(&a)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aula {
    pub id: AulaId,
    pub codigo: String,
    pub capacidad: i32,
    pub piso: i32,
    pub es_virtual: bool,
    pub activo: bool,
}

impl Aula {
    pub fn admite(&self, modalidad: Modalidad) -> bool {
        self.es_virtual == (modalidad == Modalidad::Virtual)
    }

    /// Modalidad que corresponde a una asignación en esta aula cuando el
    /// grupo no fija una.
    pub fn modalidad_natural(&self) -> Modalidad {
        if self.es_virtual { Modalidad::Virtual } else { Modalidad::Presencial }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloqueHorario {
    pub id: BloqueId,
    pub dia: Dia,
    pub franja: Franja,
    pub activo: bool,
}

impl BloqueHorario {
    /// Mismo día y franjas que se intersectan.
    pub fn se_solapa(&self, otro: &BloqueHorario) -> bool {
        self.dia == otro.dia && self.franja.se_solapa(&otro.franja)
    }

    pub fn etiqueta(&self) -> String {
        format!("{} {}", self.dia, self.franja)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Modalidad {
    Presencial,
    Virtual,
}

impl Modalidad {
    /// Ids de la tabla `modalidades`.
    pub fn desde_id(id: i64) -> Result<Modalidad, InputError> {
        match id {
            1 => Ok(Modalidad::Presencial),
            2 => Ok(Modalidad::Virtual),
            otro => Err(InputError::ModalidadDesconocida(otro)),
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Modalidad::Presencial => 1,
            Modalidad::Virtual => 2,
        }
    }
}

impl fmt::Display for Modalidad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modalidad::Presencial => f.write_str("Presencial"),
            Modalidad::Virtual => f.write_str("Virtual"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origen {
    Automatica,
    Manual,
}

impl Origen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origen::Automatica => "automatica",
            Origen::Manual => "manual",
        }
    }

    pub fn parse(s: &str) -> Origen {
        if s.eq_ignore_ascii_case("manual") { Origen::Manual } else { Origen::Automatica }
    }
}

/// Asignación de un grupo a aula, bloque y docente dentro de un periodo.
/// `id` es `None` mientras la asignación no ha sido persistida.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asignacion {
    pub id: Option<AsignacionId>,
    pub grupo_id: GrupoId,
    pub docente_id: DocenteId,
    pub aula_id: AulaId,
    pub bloque_id: BloqueId,
    pub periodo_id: PeriodoId,
    pub modalidad: Modalidad,
    pub origen: Origen,
}

impl Asignacion {
    /// True si ambas filas representan la misma asignación persistida.
    pub fn misma_fila(&self, otra: &Asignacion) -> bool {
        matches!((self.id, otra.id), (Some(a), Some(b)) if a == b)
    }
}
