//! Errores del motor de horarios.
//!
//! Los conflictos de una asignación candidata y los grupos sin resolver no son
//! errores: viajan como datos dentro de `Validacion` y `ResultadoGeneracion`.

use thiserror::Error;

use crate::models::{AsignacionId, AulaId, BloqueId, DocenteId, GrupoId, PeriodoId};

/// La solicitud o el snapshot son inválidos; la corrida falla antes de
/// intentar cualquier colocación.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("el periodo {0} no existe")]
    PeriodoNoExiste(PeriodoId),

    #[error("el periodo {0} no está activo")]
    PeriodoInactivo(PeriodoId),

    #[error("el docente {0} no existe")]
    DocenteNoExiste(DocenteId),

    #[error("el docente {0} no está activo")]
    DocenteInactivo(DocenteId),

    #[error("el grupo {grupo_id} no pertenece al periodo {periodo_id}")]
    GrupoFueraDePeriodo { grupo_id: GrupoId, periodo_id: PeriodoId },

    #[error("el aula {0} no existe")]
    AulaNoExiste(AulaId),

    #[error("el aula {0} no está activa")]
    AulaInactiva(AulaId),

    #[error("el bloque horario {0} no existe")]
    BloqueNoExiste(BloqueId),

    #[error("el bloque horario {0} no está activo")]
    BloqueInactivo(BloqueId),

    #[error("modalidad desconocida: {0}")]
    ModalidadDesconocida(i64),

    #[error("día inválido: '{0}'")]
    DiaInvalido(String),

    #[error("hora inválida: '{0}'")]
    HoraInvalida(String),

    #[error("fecha inválida: '{0}'")]
    FechaInvalida(String),

    #[error("franja vacía o invertida ({inicio}-{fin} min)")]
    FranjaVacia { inicio: i32, fin: i32 },

    #[error("la restricción del docente {0} no declara pisos")]
    PisosVacios(DocenteId),

    #[error("la asignación {0} no existe")]
    AsignacionNoExiste(AsignacionId),

    #[error("JSON inválido: {0}")]
    Json(String),
}

/// Errores que devuelve el `Motor` a la capa de servicio.
#[derive(Debug, Error)]
pub enum MotorError {
    #[error(transparent)]
    Entrada(#[from] InputError),

    /// Otra generación o edición del mismo periodo está en curso.
    #[error("ya hay una operación en curso para el periodo {periodo_id}")]
    PeriodoOcupado { periodo_id: PeriodoId },

    #[error("error de base de datos: {0}")]
    Almacen(#[from] rusqlite::Error),

    #[error("error interno: {0}")]
    Interno(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("valor inválido para {variable}: '{valor}'")]
    ValorInvalido { variable: String, valor: String },

    #[error("esquema de URL no soportado: {0}")]
    EsquemaNoSoportado(String),
}
