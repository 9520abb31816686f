//! Configuración del servicio a partir de variables de entorno (y `.env`).
//!
//! | Variable               | Default              |
//! |------------------------|----------------------|
//! | `HORARIOS_DB_PATH`     | `data/horarios.db`   |
//! | `HORARIOS_DB_URL`      | (`sqlite://` o `file://`, alternativa a la ruta) |
//! | `HORARIOS_BIND`        | `127.0.0.1:8080`     |
//! | `HORARIOS_MAX_SOLVES`  | número de CPUs       |
//! | `HORARIOS_CORS_ORIGIN` | sin CORS             |

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

const DB_PATH_DEFAULT: &str = "data/horarios.db";
const BIND_DEFAULT: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub bind: String,
    /// Generaciones simultáneas como máximo (una por periodo en todo caso).
    pub max_solves: usize,
    pub cors_origin: Option<String>,
}

impl Config {
    /// Carga `.env` si existe y lee la configuración del entorno.
    pub fn from_env() -> Result<Config, ConfigError> {
        let _ = dotenv::dotenv();
        Config::from_lookup(|k| env::var(k).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables inyectable.
    pub fn from_lookup<F>(get: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let no_vacia = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let db_path = if let Some(p) = no_vacia("HORARIOS_DB_PATH") {
            PathBuf::from(p)
        } else if let Some(url) = no_vacia("HORARIOS_DB_URL") {
            ruta_desde_url(&url)?
        } else {
            PathBuf::from(DB_PATH_DEFAULT)
        };

        let max_solves = match no_vacia("HORARIOS_MAX_SOLVES") {
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::ValorInvalido { variable: "HORARIOS_MAX_SOLVES".into(), valor: v });
                }
            },
            None => std::cmp::max(1, num_cpus::get()),
        };

        Ok(Config {
            db_path,
            bind: no_vacia("HORARIOS_BIND").unwrap_or_else(|| BIND_DEFAULT.to_string()),
            max_solves,
            cors_origin: no_vacia("HORARIOS_CORS_ORIGIN"),
        })
    }
}

/// Acepta `sqlite:///ruta/absoluta`, `sqlite://relativa` y `file://...`.
fn ruta_desde_url(url: &str) -> Result<PathBuf, ConfigError> {
    if let Some(p) = url.strip_prefix("sqlite://") {
        Ok(PathBuf::from(p))
    } else if let Some(p) = url.strip_prefix("file://") {
        Ok(PathBuf::from(p))
    } else {
        Err(ConfigError::EsquemaNoSoportado(url.to_string()))
    }
}
