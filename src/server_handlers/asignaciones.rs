use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tokio::sync::Semaphore;

use super::{cuerpo_a_texto, ejecutar, respuesta_error};
use crate::api_json::parse_cambios;
use crate::models::{AsignacionId, PeriodoId};
use crate::error::MotorError;
use crate::motor::{Motor, ResultadoEdicion};

/// PUT /asignaciones/{id}
/// Edición manual. 200 con la asignación actualizada, 409 con
/// `{"conflictos": [...]}` si la propuesta choca con algo (no se guarda).
pub async fn editar_asignacion_handler(
    motor: web::Data<Motor>,
    limite: web::Data<Semaphore>,
    path: web::Path<AsignacionId>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let id = path.into_inner();
    let json_str = match cuerpo_a_texto(body) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let cambios = match parse_cambios(&json_str) {
        Ok(c) => c,
        Err(e) => return respuesta_error(&MotorError::from(e)),
    };

    match ejecutar(motor, limite, move |m| m.editar_asignacion(id, &cambios)).await {
        Ok(ResultadoEdicion::Actualizada(detalle)) => HttpResponse::Ok().json(json!({"asignacion": detalle})),
        Ok(ResultadoEdicion::Rechazada(conflictos)) => {
            HttpResponse::Conflict().json(json!({"conflictos": conflictos}))
        }
        Err(e) => respuesta_error(&e),
    }
}

/// POST /asignaciones/{id}/validar
/// Igual que el PUT pero sin persistir; siempre 200 con `{ok, conflictos}`.
pub async fn validar_asignacion_handler(
    motor: web::Data<Motor>,
    limite: web::Data<Semaphore>,
    path: web::Path<AsignacionId>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let id = path.into_inner();
    let json_str = match cuerpo_a_texto(body) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let cambios = match parse_cambios(&json_str) {
        Ok(c) => c,
        Err(e) => return respuesta_error(&MotorError::from(e)),
    };

    match ejecutar(motor, limite, move |m| m.validar_edicion(id, &cambios)).await {
        Ok(validacion) => HttpResponse::Ok().json(validacion),
        Err(e) => respuesta_error(&e),
    }
}

/// GET /periodos/{id}/asignaciones
pub async fn listar_asignaciones_handler(
    motor: web::Data<Motor>,
    limite: web::Data<Semaphore>,
    path: web::Path<PeriodoId>,
) -> impl Responder {
    let periodo_id = path.into_inner();
    match ejecutar(motor, limite, move |m| m.asignaciones(periodo_id)).await {
        Ok(lista) => HttpResponse::Ok().json(json!({"periodo_id": periodo_id, "asignaciones": lista})),
        Err(e) => respuesta_error(&e),
    }
}
