use actix_web::{HttpResponse, Responder};
use serde_json::json;

use crate::api_json::{
    CambiosAsignacion, OpcionesGeneracion, OrdenGrupos, Preferencia, RestriccionDocente, SolicitudGeneracion,
};

pub async fn help_handler() -> impl Responder {
    let generar_example = SolicitudGeneracion {
        periodo_id: 3,
        restricciones_docentes: vec![RestriccionDocente { docente_id: 7, pisos: vec![1, 2] }],
        preferencias: vec![Preferencia { docente_id: 7, grupo_id: 41 }],
        sobrescribir: false,
        opciones: OpcionesGeneracion { orden_grupos: OrdenGrupos::PorId, max_reubicaciones: 0 },
    };

    let edicion_example = CambiosAsignacion {
        docente_id: None,
        aula_id: Some(12),
        bloque_horario_id: Some(5),
        modalidad_id: None,
        restricciones_docentes: Vec::new(),
    };

    let help = json!({
        "description": "Motor de generación de horarios. POST /horarios/generar asigna aula, bloque y docente a los grupos del periodo que aún no tienen asignación; PUT /asignaciones/{id} aplica una edición manual sólo si no genera conflictos.",
        "endpoints": {
            "POST /horarios/generar": "genera asignaciones para un periodo (ver 'generar_example')",
            "PUT /asignaciones/{id}": "edición manual; 409 con la lista de conflictos si se rechaza",
            "POST /asignaciones/{id}/validar": "valida una edición sin guardarla",
            "GET /periodos/{id}/asignaciones": "lista las asignaciones del periodo",
            "GET /help": "esta ayuda"
        },
        "generar_example": generar_example,
        "edicion_example": edicion_example,
        "modalidades": {"1": "Presencial", "2": "Virtual"},
        "orden_grupos": ["por_id", "mas_restringido_primero"],
        "note": "Los horarios se comparan como intervalos semiabiertos [inicio, fin): un bloque que termina a las 10:00 no choca con uno que empieza a las 10:00. Los grupos que no se pueden colocar vienen en 'no_resueltas' con su motivo; no es un error."
    });

    HttpResponse::Ok().json(help)
}
