//! Snapshot en memoria de todo lo que necesita una corrida sobre un periodo.
//!
//! Se construye una sola vez (desde la base de datos o a mano en las pruebas)
//! y después es de solo lectura: el solver y el validador de conflictos nunca
//! vuelven a consultar el almacén.

use std::collections::BTreeMap;

use super::{
    Asignacion, Aula, AulaId, BloqueHorario, BloqueId, Docente, DocenteId, Grupo, GrupoId, Materia,
    MateriaId, Periodo,
};
use crate::error::InputError;

#[derive(Debug, Clone)]
pub struct Catalogo {
    pub periodo: Periodo,
    pub grupos: BTreeMap<GrupoId, Grupo>,
    pub materias: BTreeMap<MateriaId, Materia>,
    pub docentes: BTreeMap<DocenteId, Docente>,
    pub aulas: BTreeMap<AulaId, Aula>,
    pub bloques: BTreeMap<BloqueId, BloqueHorario>,
    /// Asignaciones ya comprometidas del periodo, en orden de id.
    pub asignaciones: Vec<Asignacion>,
}

impl Catalogo {
    /// Arma el catálogo verificando la integridad referencial mínima: los
    /// grupos pertenecen al periodo y las asignaciones existentes apuntan a
    /// entidades conocidas.
    pub fn new(
        periodo: Periodo,
        grupos: Vec<Grupo>,
        materias: Vec<Materia>,
        docentes: Vec<Docente>,
        aulas: Vec<Aula>,
        bloques: Vec<BloqueHorario>,
        mut asignaciones: Vec<Asignacion>,
    ) -> Result<Catalogo, InputError> {
        for g in &grupos {
            if g.periodo_id != periodo.id {
                return Err(InputError::GrupoFueraDePeriodo { grupo_id: g.id, periodo_id: periodo.id });
            }
        }
        let catalogo = Catalogo {
            grupos: grupos.into_iter().map(|g| (g.id, g)).collect(),
            materias: materias.into_iter().map(|m| (m.id, m)).collect(),
            docentes: docentes.into_iter().map(|d| (d.id, d)).collect(),
            aulas: aulas.into_iter().map(|a| (a.id, a)).collect(),
            bloques: bloques.into_iter().map(|b| (b.id, b)).collect(),
            asignaciones: Vec::new(),
            periodo,
        };

        asignaciones.retain(|a| a.periodo_id == catalogo.periodo.id);
        asignaciones.sort_by_key(|a| (a.id, a.grupo_id));
        for a in &asignaciones {
            catalogo.grupo(a.grupo_id)?;
            catalogo.docente(a.docente_id)?;
            catalogo.aula(a.aula_id)?;
            catalogo.bloque(a.bloque_id)?;
        }
        Ok(Catalogo { asignaciones, ..catalogo })
    }

    pub fn grupo(&self, id: GrupoId) -> Result<&Grupo, InputError> {
        self.grupos
            .get(&id)
            .ok_or(InputError::GrupoFueraDePeriodo { grupo_id: id, periodo_id: self.periodo.id })
    }

    pub fn docente(&self, id: DocenteId) -> Result<&Docente, InputError> {
        self.docentes.get(&id).ok_or(InputError::DocenteNoExiste(id))
    }

    pub fn aula(&self, id: AulaId) -> Result<&Aula, InputError> {
        self.aulas.get(&id).ok_or(InputError::AulaNoExiste(id))
    }

    pub fn bloque(&self, id: BloqueId) -> Result<&BloqueHorario, InputError> {
        self.bloques.get(&id).ok_or(InputError::BloqueNoExiste(id))
    }

    pub fn materia_de(&self, grupo: &Grupo) -> Option<&Materia> {
        self.materias.get(&grupo.materia_id)
    }

    /// Docentes activos que pueden dictar la materia del grupo, por id.
    pub fn docentes_elegibles(&self, grupo: &Grupo) -> Vec<&Docente> {
        let Some(materia) = self.materia_de(grupo) else {
            return Vec::new();
        };
        self.docentes.values().filter(|d| d.puede_dictar(materia)).collect()
    }

    /// Aulas activas en orden de ajuste: menor capacidad primero, id como desempate.
    pub fn aulas_por_ajuste(&self) -> Vec<&Aula> {
        let mut aulas: Vec<&Aula> = self.aulas.values().filter(|a| a.activo).collect();
        aulas.sort_by_key(|a| (a.capacidad, a.id));
        aulas
    }

    /// Bloques activos en orden estable (día, inicio, fin, id).
    pub fn bloques_ordenados(&self) -> Vec<&BloqueHorario> {
        let mut bloques: Vec<&BloqueHorario> = self.bloques.values().filter(|b| b.activo).collect();
        bloques.sort_by_key(|b| (b.dia, b.franja.inicio, b.franja.fin, b.id));
        bloques
    }

    pub fn asignacion_de_grupo(&self, grupo_id: GrupoId) -> Option<&Asignacion> {
        self.asignaciones.iter().find(|a| a.grupo_id == grupo_id)
    }
}
