//! Validación de una edición manual sobre una asignación existente.

use crate::algorithm::conflict::{Validacion, validar};
use crate::api_json::{CambiosAsignacion, RestriccionesDocentes};
use crate::error::InputError;
use crate::models::{Asignacion, Catalogo, Origen};

/// Superpone los `cambios` sobre `existente` y valida el resultado contra
/// `comprometidas`, excluyendo la propia fila de `existente` (mismo id).
///
/// Devuelve la asignación propuesta, marcada como manual, junto con la
/// validación completa; quien llama sólo debe persistir si `ok` es true.
pub fn validar_edicion(
    existente: &Asignacion,
    cambios: &CambiosAsignacion,
    comprometidas: &[Asignacion],
    catalogo: &Catalogo,
    restricciones: &RestriccionesDocentes,
) -> Result<(Asignacion, Validacion), InputError> {
    let propuesta = aplicar_cambios(existente, cambios)?;
    exigir_activos(cambios, catalogo)?;
    let otras: Vec<Asignacion> = comprometidas
        .iter()
        .filter(|a| !a.misma_fila(existente))
        .cloned()
        .collect();
    let validacion = validar(&propuesta, &otras, catalogo, restricciones)?;
    Ok((propuesta, validacion))
}

/// Lo que la edición cambia debe estar activo. Lo que conserva de la fila
/// existente no se vuelve a exigir.
fn exigir_activos(cambios: &CambiosAsignacion, catalogo: &Catalogo) -> Result<(), InputError> {
    if let Some(id) = cambios.docente_id {
        if !catalogo.docente(id)?.activo {
            return Err(InputError::DocenteInactivo(id));
        }
    }
    if let Some(id) = cambios.aula_id {
        if !catalogo.aula(id)?.activo {
            return Err(InputError::AulaInactiva(id));
        }
    }
    if let Some(id) = cambios.bloque_horario_id {
        if !catalogo.bloque(id)?.activo {
            return Err(InputError::BloqueInactivo(id));
        }
    }
    Ok(())
}

pub fn aplicar_cambios(existente: &Asignacion, cambios: &CambiosAsignacion) -> Result<Asignacion, InputError> {
    let mut propuesta = existente.clone();
    if let Some(d) = cambios.docente_id {
        propuesta.docente_id = d;
    }
    if let Some(a) = cambios.aula_id {
        propuesta.aula_id = a;
    }
    if let Some(b) = cambios.bloque_horario_id {
        propuesta.bloque_id = b;
    }
    if let Some(m) = cambios.modalidad()? {
        propuesta.modalidad = m;
    }
    propuesta.origen = Origen::Manual;
    Ok(propuesta)
}
