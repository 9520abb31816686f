// Biblioteca raíz del crate `horarios`.
// Motor de generación de horarios y validación de conflictos: el núcleo
// (`algorithm`) trabaja en memoria sobre un `Catalogo`; `motor` orquesta la
// carga desde SQLite, la exclusión por periodo y la persistencia.
pub mod algorithm;
pub mod api_json;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod motor;
pub mod server;
pub mod server_handlers;

pub use config::Config;
pub use error::{ConfigError, InputError, MotorError};
pub use motor::{Motor, ResultadoEdicion};

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
