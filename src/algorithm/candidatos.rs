//! Construcción del conjunto de candidatos (docente, aula, bloque) de un grupo.
//!
//! El orden de iteración es parte del contrato porque define qué candidata
//! gana: docentes preferidos primero (en el orden de la solicitud), luego los
//! elegibles por id; dentro de cada docente, aulas de menor capacidad
//! suficiente primero y bloques en orden (día, inicio, fin, id).
//!
//! Las restricciones de piso se aplican aquí como filtro duro: un docente
//! restringido nunca genera candidatas en aulas de pisos no permitidos.

use crate::api_json::SolicitudValidada;
use crate::models::{Asignacion, Aula, BloqueHorario, Catalogo, Docente, Grupo, Modalidad, Origen};

use super::solver::MotivoNoResuelto;

#[derive(Debug)]
pub struct PoolCandidatos<'a> {
    pub grupo: &'a Grupo,
    /// Docentes en orden de prioridad, cada uno con las aulas que puede usar.
    pub docentes: Vec<DocenteCandidato<'a>>,
    pub bloques: Vec<&'a BloqueHorario>,
    /// Aulas que cubren cupo y modalidad, antes del filtro de pisos.
    pub aulas_elegibles: usize,
}

#[derive(Debug)]
pub struct DocenteCandidato<'a> {
    pub docente: &'a Docente,
    pub preferido: bool,
    pub aulas: Vec<&'a Aula>,
}

impl<'a> PoolCandidatos<'a> {
    pub fn construir(grupo: &'a Grupo, catalogo: &'a Catalogo, solicitud: &SolicitudValidada) -> PoolCandidatos<'a> {
        let aulas: Vec<&Aula> = catalogo
            .aulas_por_ajuste()
            .into_iter()
            .filter(|a| a.capacidad >= grupo.cupo_maximo)
            .filter(|a| grupo.modalidad.is_none_or(|m| a.admite(m)))
            .collect();

        let mut orden: Vec<(&Docente, bool)> = Vec::new();
        for id in solicitud.preferidos(grupo.id) {
            if let Some(d) = catalogo.docentes.get(id).filter(|d| d.activo) {
                orden.push((d, true));
            }
        }
        for d in catalogo.docentes_elegibles(grupo) {
            if !orden.iter().any(|(o, _)| o.id == d.id) {
                orden.push((d, false));
            }
        }

        let docentes = orden
            .into_iter()
            .map(|(docente, preferido)| DocenteCandidato {
                docente,
                preferido,
                aulas: aulas
                    .iter()
                    .copied()
                    .filter(|a| solicitud.restricciones.permite(docente.id, a.piso))
                    .collect(),
            })
            .collect();

        PoolCandidatos {
            grupo,
            docentes,
            bloques: catalogo.bloques_ordenados(),
            aulas_elegibles: aulas.len(),
        }
    }

    /// Motivo por el que el pool no produce ninguna candidata, si es el caso.
    pub fn motivo_vacio(&self) -> Option<MotivoNoResuelto> {
        match (self.aulas_elegibles == 0, self.docentes.is_empty()) {
            (true, true) => return Some(MotivoNoResuelto::SinAulaNiDocente),
            (true, false) => return Some(MotivoNoResuelto::SinAulaElegible),
            (false, true) => return Some(MotivoNoResuelto::SinDocenteElegible),
            (false, false) => {}
        }
        if self.bloques.is_empty() {
            return Some(MotivoNoResuelto::SinBloqueDisponible);
        }
        if self.docentes.iter().all(|d| d.aulas.is_empty()) {
            return Some(MotivoNoResuelto::RestriccionDePiso);
        }
        None
    }

    /// Número de candidatas que genera el pool; sirve para ordenar los grupos
    /// del más restringido al menos restringido.
    pub fn tamano(&self) -> usize {
        self.docentes.iter().map(|d| d.aulas.len()).sum::<usize>() * self.bloques.len()
    }

    /// Candidatas en orden de prioridad.
    pub fn candidatas(&self, periodo_id: i64) -> impl Iterator<Item = Asignacion> + '_ {
        let grupo = self.grupo;
        self.docentes.iter().flat_map(move |dc| {
            dc.aulas.iter().flat_map(move |aula| {
                self.bloques.iter().map(move |bloque| Asignacion {
                    id: None,
                    grupo_id: grupo.id,
                    docente_id: dc.docente.id,
                    aula_id: aula.id,
                    bloque_id: bloque.id,
                    periodo_id,
                    modalidad: modalidad_para(grupo, aula),
                    origen: Origen::Automatica,
                })
            })
        })
    }
}

/// La modalidad fija del grupo o, si no la tiene, la que corresponde al aula.
pub fn modalidad_para(grupo: &Grupo, aula: &Aula) -> Modalidad {
    grupo.modalidad.unwrap_or_else(|| aula.modalidad_natural())
}
