use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::algorithm::candidatos::PoolCandidatos;
use crate::algorithm::conflict::{Conflicto, TipoConflicto, validar};
use crate::api_json::{OrdenGrupos, SolicitudValidada};
use crate::error::InputError;
use crate::models::{Asignacion, Catalogo, Grupo, GrupoId};

/// Motivo dominante por el que un grupo quedó sin asignar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "codigo", rename_all = "snake_case")]
pub enum MotivoNoResuelto {
    /// Ninguna aula activa cubre el cupo (y la modalidad fija, si la hay).
    SinAulaElegible,
    /// Ningún docente activo tiene la materia o el área del grupo.
    SinDocenteElegible,
    SinAulaNiDocente,
    /// Hay aulas con capacidad, pero ninguna en los pisos permitidos de los docentes.
    RestriccionDePiso,
    SinBloqueDisponible,
    /// Todas las candidatas chocaron; `dominante` es el conflicto más frecuente.
    CandidatosAgotados { dominante: TipoConflicto },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrupoNoResuelto {
    pub grupo_id: GrupoId,
    pub motivo: MotivoNoResuelto,
    /// Candidatas evaluadas antes de rendirse.
    pub intentos: usize,
}

/// Un grupo ya colocado que se movió para hacer lugar a otro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reubicacion {
    pub grupo_id: GrupoId,
    pub desplazado_por: GrupoId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultadoSolver {
    pub colocadas: Vec<Asignacion>,
    pub no_resueltas: Vec<GrupoNoResuelto>,
    pub reubicaciones: Vec<Reubicacion>,
}

/// Genera asignaciones para los grupos pendientes del periodo.
///
/// Estrategia: greedy por grupo en orden determinista. Para cada grupo se
/// recorren sus candidatas en orden de prioridad y se acepta la primera sin
/// conflictos contra lo comprometido hasta el momento. Si ninguna sirve, el
/// grupo queda sin resolver y se sigue con el siguiente: una corrida nunca
/// aborta por un grupo infactible.
///
/// Con `max_reubicaciones > 0` se intenta, antes de rendirse, desplazar un
/// único grupo colocado en esta misma corrida hacia otra candidata suya.
///
/// Sólo devuelve error si el catálogo es inconsistente.
pub fn generar(catalogo: &Catalogo, solicitud: &SolicitudValidada) -> Result<ResultadoSolver, InputError> {
    let periodo_id = catalogo.periodo.id;
    let mut comprometidas: Vec<Asignacion> =
        if solicitud.sobrescribir { Vec::new() } else { catalogo.asignaciones.clone() };

    let mut pendientes: Vec<(&Grupo, PoolCandidatos)> = catalogo
        .grupos
        .values()
        .filter(|g| !comprometidas.iter().any(|a| a.grupo_id == g.id))
        .map(|g| (g, PoolCandidatos::construir(g, catalogo, solicitud)))
        .collect();

    // BTreeMap ya entrega los grupos por id ascendente
    if solicitud.opciones.orden_grupos == OrdenGrupos::MasRestringidoPrimero {
        pendientes.sort_by_key(|(g, pool)| (pool.tamano(), g.id));
    }

    info!(
        periodo_id,
        pendientes = pendientes.len(),
        comprometidas = comprometidas.len(),
        "iniciando generación"
    );

    let mut resultado = ResultadoSolver::default();
    let mut reubicaciones_restantes = solicitud.opciones.max_reubicaciones;

    for (grupo, pool) in &pendientes {
        if let Some(motivo) = pool.motivo_vacio() {
            debug!(grupo_id = grupo.id, ?motivo, "grupo sin candidatas");
            resultado.no_resueltas.push(GrupoNoResuelto { grupo_id: grupo.id, motivo, intentos: 0 });
            continue;
        }

        let mut intentos = 0usize;
        let mut conteo: BTreeMap<TipoConflicto, usize> = BTreeMap::new();
        let mut bloqueadas: Vec<(Asignacion, Vec<Conflicto>)> = Vec::new();
        let mut elegida: Option<Asignacion> = None;

        for candidata in pool.candidatas(periodo_id) {
            intentos += 1;
            let v = validar(&candidata, &comprometidas, catalogo, &solicitud.restricciones)?;
            if v.ok {
                elegida = Some(candidata);
                break;
            }
            for c in &v.conflictos {
                *conteo.entry(c.tipo()).or_default() += 1;
            }
            if reubicaciones_restantes > 0 {
                bloqueadas.push((candidata, v.conflictos));
            }
        }

        if let Some(a) = elegida {
            comprometidas.push(a.clone());
            resultado.colocadas.push(a);
            continue;
        }

        if reubicaciones_restantes > 0 {
            if let Some(r) = reubicar(grupo.id, &bloqueadas, &mut comprometidas, &mut resultado, catalogo, solicitud)? {
                debug!(grupo_id = grupo.id, desplazado = r.grupo_id, "grupo colocado tras reubicación");
                resultado.reubicaciones.push(r);
                reubicaciones_restantes -= 1;
                continue;
            }
        }

        let dominante = conteo
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(tipo, _)| tipo)
            .unwrap_or(TipoConflicto::DocenteOcupado);
        debug!(grupo_id = grupo.id, intentos, ?dominante, "grupo sin resolver");
        resultado.no_resueltas.push(GrupoNoResuelto {
            grupo_id: grupo.id,
            motivo: MotivoNoResuelto::CandidatosAgotados { dominante },
            intentos,
        });
    }

    info!(
        periodo_id,
        colocadas = resultado.colocadas.len(),
        no_resueltas = resultado.no_resueltas.len(),
        reubicaciones = resultado.reubicaciones.len(),
        "generación terminada"
    );
    Ok(resultado)
}

/// Intenta colocar `grupo_id` desplazando a un solo grupo colocado en esta
/// corrida. Sólo se consideran candidatas cuyos conflictos son choques de
/// docente/aula con ese único grupo; el desplazado debe caber en otra de sus
/// propias candidatas. Las asignaciones previas a la corrida nunca se mueven.
fn reubicar(
    grupo_id: GrupoId,
    bloqueadas: &[(Asignacion, Vec<Conflicto>)],
    comprometidas: &mut Vec<Asignacion>,
    resultado: &mut ResultadoSolver,
    catalogo: &Catalogo,
    solicitud: &SolicitudValidada,
) -> Result<Option<Reubicacion>, InputError> {
    for (candidata, conflictos) in bloqueadas {
        let Some(otro) = unico_grupo_en_conflicto(conflictos) else {
            continue;
        };
        let Some(pos_colocada) = resultado.colocadas.iter().position(|a| a.grupo_id == otro) else {
            continue;
        };
        let Some(pos_comprometida) = comprometidas.iter().position(|a| a.grupo_id == otro && a.id.is_none())
        else {
            continue;
        };

        let mut tentativo = comprometidas.clone();
        tentativo.remove(pos_comprometida);
        if !validar(candidata, &tentativo, catalogo, &solicitud.restricciones)?.ok {
            continue;
        }
        tentativo.push(candidata.clone());

        let grupo_otro = catalogo.grupo(otro)?;
        let pool_otro = PoolCandidatos::construir(grupo_otro, catalogo, solicitud);
        let mut nueva = None;
        for alternativa in pool_otro.candidatas(catalogo.periodo.id) {
            if validar(&alternativa, &tentativo, catalogo, &solicitud.restricciones)?.ok {
                nueva = Some(alternativa);
                break;
            }
        }

        if let Some(nueva) = nueva {
            tentativo.push(nueva.clone());
            *comprometidas = tentativo;
            resultado.colocadas[pos_colocada] = nueva;
            resultado.colocadas.push(candidata.clone());
            return Ok(Some(Reubicacion { grupo_id: otro, desplazado_por: grupo_id }));
        }
    }
    Ok(None)
}

fn unico_grupo_en_conflicto(conflictos: &[Conflicto]) -> Option<GrupoId> {
    let mut grupo = None;
    for c in conflictos {
        let g = c.grupo_en_conflicto()?;
        match grupo {
            None => grupo = Some(g),
            Some(previo) if previo != g => return None,
            _ => {}
        }
    }
    grupo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::conflict::Conflicto;

    #[test]
    fn test_unico_grupo_en_conflicto() {
        let docente = Conflicto::DocenteOcupado { asignacion_id: None, grupo_id: 4, bloque_id: 1 };
        let aula = Conflicto::AulaOcupada { asignacion_id: None, grupo_id: 4, bloque_id: 1 };
        let otro = Conflicto::AulaOcupada { asignacion_id: None, grupo_id: 5, bloque_id: 1 };
        let capacidad = Conflicto::CapacidadInsuficiente { capacidad: 10, cupo_maximo: 20 };

        assert_eq!(unico_grupo_en_conflicto(&[docente.clone(), aula.clone()]), Some(4));
        assert_eq!(unico_grupo_en_conflicto(&[docente.clone(), otro]), None);
        assert_eq!(unico_grupo_en_conflicto(&[docente, capacidad]), None);
        assert_eq!(unico_grupo_en_conflicto(&[]), None);
    }
}
