use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use tokio::sync::Semaphore;
use tracing::info;

use crate::config::Config;
use crate::motor::Motor;
use crate::server_handlers::{
    editar_asignacion_handler, generar_handler, help_handler, listar_asignaciones_handler,
    validar_asignacion_handler,
};

/// Registra todas las rutas; lo usan tanto `run_server` como las pruebas.
pub fn configurar(cfg: &mut web::ServiceConfig) {
    cfg.route("/horarios/generar", web::post().to(generar_handler))
        .route("/asignaciones/{id}", web::put().to(editar_asignacion_handler))
        .route("/asignaciones/{id}/validar", web::post().to(validar_asignacion_handler))
        .route("/periodos/{id}/asignaciones", web::get().to(listar_asignaciones_handler))
        .route("/help", web::get().to(help_handler));
}

fn cors(origen: Option<&str>) -> Cors {
    match origen {
        Some("*") => Cors::permissive(),
        Some(o) => Cors::default()
            .allowed_origin(o)
            .allowed_methods(vec!["GET", "POST", "PUT"])
            .allow_any_header(),
        None => Cors::default(),
    }
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let motor = Motor::abrir(&config.db_path).map_err(|e| std::io::Error::other(e.to_string()))?;
    let motor = web::Data::new(motor);
    let limite = web::Data::new(Semaphore::new(config.max_solves));
    let cors_origin = config.cors_origin.clone();

    info!(bind = %config.bind, max_solves = config.max_solves, "iniciando servidor");
    HttpServer::new(move || {
        App::new()
            .wrap(cors(cors_origin.as_deref()))
            .app_data(motor.clone())
            .app_data(limite.clone())
            .configure(configurar)
    })
    .bind(&config.bind)?
    .run()
    .await
}
