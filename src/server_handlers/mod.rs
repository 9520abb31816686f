pub mod asignaciones;
pub mod docs;
pub mod generar;

pub use asignaciones::*;
pub use docs::*;
pub use generar::*;

use actix_web::{HttpResponse, web};
use serde_json::json;
use tokio::sync::Semaphore;
use tracing::error;

use crate::error::{InputError, MotorError};
use crate::motor::Motor;

/// Corre `f` sobre el motor en un hilo bloqueante, respetando el límite de
/// operaciones simultáneas.
pub(crate) async fn ejecutar<T, F>(motor: web::Data<Motor>, limite: web::Data<Semaphore>, f: F) -> Result<T, MotorError>
where
    F: FnOnce(&Motor) -> Result<T, MotorError> + Send + 'static,
    T: Send + 'static,
{
    let permit = limite
        .into_inner()
        .acquire_owned()
        .await
        .map_err(|_| MotorError::Interno("failed to acquire semaphore".to_string()))?;
    let motor = motor.into_inner();

    let handle = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        f(&motor)
    });

    match handle.await {
        Ok(res) => res,
        Err(e) => Err(MotorError::Interno(format!("task join error: {}", e))),
    }
}

/// Traduce un error del motor a la respuesta HTTP correspondiente.
pub(crate) fn respuesta_error(e: &MotorError) -> HttpResponse {
    match e {
        MotorError::Entrada(InputError::AsignacionNoExiste(_)) => {
            HttpResponse::NotFound().json(json!({"error": e.to_string()}))
        }
        MotorError::Entrada(_) => HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
        MotorError::PeriodoOcupado { periodo_id } => {
            HttpResponse::Conflict().json(json!({"error": e.to_string(), "periodo_id": periodo_id}))
        }
        MotorError::Almacen(_) | MotorError::Interno(_) => {
            error!(error = %e, "fallo interno atendiendo la solicitud");
            HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
        }
    }
}

/// Reserializa el cuerpo para reutilizar los parsers de `api_json`.
pub(crate) fn cuerpo_a_texto(body: web::Json<serde_json::Value>) -> Result<String, HttpResponse> {
    serde_json::to_string(&body.into_inner())
        .map_err(|e| HttpResponse::BadRequest().json(json!({"error": format!("invalid JSON body: {}", e)})))
}
