// Detección de conflictos de una asignación candidata contra las ya comprometidas.
//
// `validar` es una función pura: la usan tanto el solver en cada intento de
// colocación como la edición manual de una sola asignación.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::api_json::RestriccionesDocentes;
use crate::error::InputError;
use crate::models::{Asignacion, AsignacionId, BloqueId, Catalogo, GrupoId, Modalidad};

/// Motivo por el que una candidata viola una restricción dura.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum Conflicto {
    DocenteOcupado { asignacion_id: Option<AsignacionId>, grupo_id: GrupoId, bloque_id: BloqueId },
    AulaOcupada { asignacion_id: Option<AsignacionId>, grupo_id: GrupoId, bloque_id: BloqueId },
    CapacidadInsuficiente { capacidad: i32, cupo_maximo: i32 },
    PisoNoPermitido { piso: i32, permitidos: BTreeSet<i32> },
    ModalidadIncompatible { requerida: Modalidad, aula_virtual: bool },
    GrupoYaAsignado { asignacion_id: Option<AsignacionId> },
}

/// Categoría del conflicto, usada para agregar motivos en el reporte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoConflicto {
    DocenteOcupado,
    AulaOcupada,
    CapacidadInsuficiente,
    PisoNoPermitido,
    ModalidadIncompatible,
    GrupoYaAsignado,
}

impl Conflicto {
    pub fn tipo(&self) -> TipoConflicto {
        match self {
            Conflicto::DocenteOcupado { .. } => TipoConflicto::DocenteOcupado,
            Conflicto::AulaOcupada { .. } => TipoConflicto::AulaOcupada,
            Conflicto::CapacidadInsuficiente { .. } => TipoConflicto::CapacidadInsuficiente,
            Conflicto::PisoNoPermitido { .. } => TipoConflicto::PisoNoPermitido,
            Conflicto::ModalidadIncompatible { .. } => TipoConflicto::ModalidadIncompatible,
            Conflicto::GrupoYaAsignado { .. } => TipoConflicto::GrupoYaAsignado,
        }
    }

    /// Grupo de la asignación comprometida con la que choca, si aplica.
    pub fn grupo_en_conflicto(&self) -> Option<GrupoId> {
        match self {
            Conflicto::DocenteOcupado { grupo_id, .. } | Conflicto::AulaOcupada { grupo_id, .. } => {
                Some(*grupo_id)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validacion {
    pub ok: bool,
    pub conflictos: Vec<Conflicto>,
}

impl Validacion {
    fn desde(conflictos: Vec<Conflicto>) -> Validacion {
        Validacion { ok: conflictos.is_empty(), conflictos }
    }
}

/// Verifica todas las reglas duras y devuelve el conjunto completo de
/// conflictos (no sólo el primero).
///
/// Reglas:
/// 1. docente con otra asignación en un bloque que se solapa
/// 2. aula con otra asignación en un bloque que se solapa
/// 3. capacidad del aula >= cupo máximo del grupo
/// 4. piso del aula dentro de los pisos permitidos del docente
/// 5. modalidad coherente con el aula cuando el grupo la fija
/// 6. una sola asignación por grupo y periodo
///
/// Si la candidata tiene `id`, la fila comprometida con ese mismo id se
/// ignora en todas las comparaciones (una edición puede conservar su lugar).
/// Sólo falla si la candidata referencia entidades que no están en el catálogo.
pub fn validar(
    candidata: &Asignacion,
    comprometidas: &[Asignacion],
    catalogo: &Catalogo,
    restricciones: &RestriccionesDocentes,
) -> Result<Validacion, InputError> {
    let grupo = catalogo.grupo(candidata.grupo_id)?;
    let aula = catalogo.aula(candidata.aula_id)?;
    let bloque = catalogo.bloque(candidata.bloque_id)?;
    catalogo.docente(candidata.docente_id)?;

    let mut conflictos = Vec::new();
    let mut grupo_repetido = Vec::new();

    for otra in comprometidas {
        if otra.periodo_id != candidata.periodo_id || otra.misma_fila(candidata) {
            continue;
        }
        if otra.grupo_id == candidata.grupo_id {
            grupo_repetido.push(Conflicto::GrupoYaAsignado { asignacion_id: otra.id });
            continue;
        }
        let Ok(otro_bloque) = catalogo.bloque(otra.bloque_id) else {
            continue;
        };
        if !bloque.se_solapa(otro_bloque) {
            continue;
        }
        if otra.docente_id == candidata.docente_id {
            conflictos.push(Conflicto::DocenteOcupado {
                asignacion_id: otra.id,
                grupo_id: otra.grupo_id,
                bloque_id: otra.bloque_id,
            });
        }
        if otra.aula_id == candidata.aula_id {
            conflictos.push(Conflicto::AulaOcupada {
                asignacion_id: otra.id,
                grupo_id: otra.grupo_id,
                bloque_id: otra.bloque_id,
            });
        }
    }

    if aula.capacidad < grupo.cupo_maximo {
        conflictos.push(Conflicto::CapacidadInsuficiente {
            capacidad: aula.capacidad,
            cupo_maximo: grupo.cupo_maximo,
        });
    }

    if let Some(permitidos) = restricciones.pisos_de(candidata.docente_id) {
        if !permitidos.contains(&aula.piso) {
            conflictos.push(Conflicto::PisoNoPermitido { piso: aula.piso, permitidos: permitidos.clone() });
        }
    }

    if let Some(requerida) = grupo.modalidad {
        if !aula.admite(requerida) || candidata.modalidad != requerida {
            conflictos.push(Conflicto::ModalidadIncompatible { requerida, aula_virtual: aula.es_virtual });
        }
    }

    conflictos.extend(grupo_repetido);
    Ok(Validacion::desde(conflictos))
}
