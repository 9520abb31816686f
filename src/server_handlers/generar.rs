use actix_web::{HttpResponse, Responder, web};
use tokio::sync::Semaphore;
use tracing::info;

use super::{cuerpo_a_texto, ejecutar, respuesta_error};
use crate::api_json::parse_json_input;
use crate::error::MotorError;
use crate::motor::Motor;

/// POST /horarios/generar
/// Recibe una `SolicitudGeneracion` y devuelve el `ResultadoGeneracion`. Los
/// grupos sin resolver no son error: vienen en `no_resueltas` con 200.
pub async fn generar_handler(
    motor: web::Data<Motor>,
    limite: web::Data<Semaphore>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let json_str = match cuerpo_a_texto(body) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let solicitud = match parse_json_input(&json_str) {
        Ok(s) => s,
        Err(e) => return respuesta_error(&MotorError::from(e)),
    };

    info!(periodo_id = solicitud.periodo_id, "solicitud de generación");
    match ejecutar(motor, limite, move |m| m.generar(&solicitud)).await {
        Ok(resultado) => HttpResponse::Ok().json(resultado),
        Err(e) => respuesta_error(&e),
    }
}
