//! Arma el resultado que consume la capa de servicio a partir de la salida
//! del solver, resolviendo ids a datos legibles.

use serde::Serialize;

use crate::algorithm::solver::{MotivoNoResuelto, Reubicacion, ResultadoSolver};
use crate::api_json::SolicitudValidada;
use crate::models::{
    Asignacion, AsignacionId, AulaId, BloqueId, Catalogo, Dia, DocenteId, GrupoId, Modalidad, Origen,
    PeriodoId,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsignacionDetalle {
    pub id: Option<AsignacionId>,
    pub periodo_id: PeriodoId,
    pub grupo_id: GrupoId,
    pub grupo_codigo: String,
    pub materia: String,
    pub docente_id: DocenteId,
    pub docente: String,
    pub aula_id: AulaId,
    pub aula: String,
    pub piso: i32,
    pub bloque_horario_id: BloqueId,
    /// `None` si el bloque ya no está en el catálogo.
    pub dia: Option<Dia>,
    pub horario: String,
    pub modalidad: Modalidad,
    pub origen: Origen,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrupoNoResueltoDetalle {
    pub grupo_id: GrupoId,
    pub grupo_codigo: String,
    pub materia: String,
    pub cupo_maximo: i32,
    pub motivo: MotivoNoResuelto,
    pub detalle: String,
    pub intentos: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resumen {
    pub total_grupos: usize,
    pub colocados: usize,
    pub no_resueltos: usize,
    pub preferencias_solicitadas: usize,
    pub preferencias_respetadas: usize,
    pub reubicaciones: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultadoGeneracion {
    pub periodo_id: PeriodoId,
    pub colocadas: Vec<AsignacionDetalle>,
    pub no_resueltas: Vec<GrupoNoResueltoDetalle>,
    pub reubicaciones: Vec<Reubicacion>,
    pub resumen: Resumen,
}

/// Resuelve los ids de una asignación contra el catálogo. Los ids que no
/// estén en el catálogo se muestran vacíos en lugar de fallar.
pub fn detallar(asignacion: &Asignacion, catalogo: &Catalogo) -> AsignacionDetalle {
    let grupo = catalogo.grupos.get(&asignacion.grupo_id);
    let materia = grupo.and_then(|g| catalogo.materia_de(g));
    let docente = catalogo.docentes.get(&asignacion.docente_id);
    let aula = catalogo.aulas.get(&asignacion.aula_id);
    let bloque = catalogo.bloques.get(&asignacion.bloque_id);

    AsignacionDetalle {
        id: asignacion.id,
        periodo_id: asignacion.periodo_id,
        grupo_id: asignacion.grupo_id,
        grupo_codigo: grupo.map(|g| g.codigo.clone()).unwrap_or_default(),
        materia: materia.map(|m| m.nombre.clone()).unwrap_or_default(),
        docente_id: asignacion.docente_id,
        docente: docente.map(|d| d.nombre.clone()).unwrap_or_default(),
        aula_id: asignacion.aula_id,
        aula: aula.map(|a| a.codigo.clone()).unwrap_or_default(),
        piso: aula.map(|a| a.piso).unwrap_or_default(),
        bloque_horario_id: asignacion.bloque_id,
        dia: bloque.map(|b| b.dia),
        horario: bloque.map(|b| b.franja.to_string()).unwrap_or_default(),
        modalidad: asignacion.modalidad,
        origen: asignacion.origen,
    }
}

pub fn describir_motivo(motivo: &MotivoNoResuelto) -> String {
    match motivo {
        MotivoNoResuelto::SinAulaElegible => "no hay aula activa con capacidad suficiente".to_string(),
        MotivoNoResuelto::SinDocenteElegible => "no hay docente elegible para la materia".to_string(),
        MotivoNoResuelto::SinAulaNiDocente => "no hay aula con capacidad ni docente elegible".to_string(),
        MotivoNoResuelto::RestriccionDePiso => {
            "no hay aula elegible en los pisos permitidos del docente".to_string()
        }
        MotivoNoResuelto::SinBloqueDisponible => "no hay bloques horarios activos".to_string(),
        MotivoNoResuelto::CandidatosAgotados { dominante } => {
            format!("todas las combinaciones chocan (conflicto dominante: {:?})", dominante)
        }
    }
}

/// `colocadas` se ordena por grupo para que dos corridas iguales produzcan
/// exactamente el mismo reporte, aunque una reubicación haya cambiado el
/// orden de inserción.
pub fn construir_reporte(
    catalogo: &Catalogo,
    solicitud: &SolicitudValidada,
    resultado: &ResultadoSolver,
    persistidas: &[Asignacion],
) -> ResultadoGeneracion {
    let mut colocadas: Vec<AsignacionDetalle> = persistidas.iter().map(|a| detallar(a, catalogo)).collect();
    colocadas.sort_by_key(|d| d.grupo_id);

    let no_resueltas = resultado
        .no_resueltas
        .iter()
        .map(|n| {
            let grupo = catalogo.grupos.get(&n.grupo_id);
            GrupoNoResueltoDetalle {
                grupo_id: n.grupo_id,
                grupo_codigo: grupo.map(|g| g.codigo.clone()).unwrap_or_default(),
                materia: grupo
                    .and_then(|g| catalogo.materia_de(g))
                    .map(|m| m.nombre.clone())
                    .unwrap_or_default(),
                cupo_maximo: grupo.map(|g| g.cupo_maximo).unwrap_or_default(),
                motivo: n.motivo.clone(),
                detalle: describir_motivo(&n.motivo),
                intentos: n.intentos,
            }
        })
        .collect::<Vec<_>>();

    let preferencias_respetadas = persistidas
        .iter()
        .filter(|a| solicitud.preferidos(a.grupo_id).contains(&a.docente_id))
        .count();

    let resumen = Resumen {
        total_grupos: persistidas.len() + no_resueltas.len(),
        colocados: persistidas.len(),
        no_resueltos: no_resueltas.len(),
        preferencias_solicitadas: solicitud.total_preferencias(),
        preferencias_respetadas,
        reubicaciones: resultado.reubicaciones.len(),
    };

    ResultadoGeneracion {
        periodo_id: catalogo.periodo.id,
        colocadas,
        no_resueltas,
        reubicaciones: resultado.reubicaciones.clone(),
        resumen,
    }
}
