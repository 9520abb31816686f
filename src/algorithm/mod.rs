// Núcleo de generación y validación de horarios.
// Todo lo de este módulo trabaja en memoria sobre un `Catalogo` ya cargado.
pub mod candidatos;
pub mod conflict;
pub mod edicion;
pub mod reporte;
pub mod solver;

pub use conflict::{Conflicto, TipoConflicto, Validacion, validar};
pub use edicion::validar_edicion;
pub use reporte::{AsignacionDetalle, ResultadoGeneracion, construir_reporte, detallar};
pub use solver::{GrupoNoResuelto, MotivoNoResuelto, ResultadoSolver, generar};
