//! Orquestación: carga del snapshot, corrida del solver o validación de una
//! edición, y persistencia, con exclusión mutua por periodo.

use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::algorithm::{
    self, AsignacionDetalle, Conflicto, ResultadoGeneracion, Validacion, construir_reporte, detallar,
};
use crate::api_json::{CambiosAsignacion, SolicitudGeneracion, armar_restricciones, validar_solicitud};
use crate::db;
use crate::error::{InputError, MotorError};
use crate::models::{Asignacion, AsignacionId, Catalogo, PeriodoId};

/// Periodos con una generación o edición en curso.
#[derive(Debug, Default)]
pub struct RegistroPeriodos {
    ocupados: Mutex<HashSet<PeriodoId>>,
}

/// Mientras exista, ningún otro llamador puede operar sobre el periodo.
#[derive(Debug)]
pub struct GuardaPeriodo<'a> {
    registro: &'a RegistroPeriodos,
    periodo_id: PeriodoId,
}

impl RegistroPeriodos {
    /// Reserva el periodo o falla de inmediato con `PeriodoOcupado`; no hay cola.
    pub fn tomar(&self, periodo_id: PeriodoId) -> Result<GuardaPeriodo<'_>, MotorError> {
        let mut ocupados = self
            .ocupados
            .lock()
            .map_err(|_| MotorError::Interno("registro de periodos envenenado".to_string()))?;
        if !ocupados.insert(periodo_id) {
            warn!(periodo_id, "periodo ocupado, se rechaza la operación");
            return Err(MotorError::PeriodoOcupado { periodo_id });
        }
        Ok(GuardaPeriodo { registro: self, periodo_id })
    }

    pub fn ocupado(&self, periodo_id: PeriodoId) -> bool {
        match self.ocupados.lock() {
            Ok(o) => o.contains(&periodo_id),
            Err(p) => p.into_inner().contains(&periodo_id),
        }
    }
}

impl Drop for GuardaPeriodo<'_> {
    fn drop(&mut self) {
        // liberar aunque otro hilo haya envenenado el mutex
        let mut ocupados = match self.registro.ocupados.lock() {
            Ok(o) => o,
            Err(p) => p.into_inner(),
        };
        ocupados.remove(&self.periodo_id);
    }
}

/// Resultado de una edición manual.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultadoEdicion {
    Actualizada(AsignacionDetalle),
    /// No se persistió nada.
    Rechazada(Vec<Conflicto>),
}

pub struct Motor {
    conn: Mutex<Connection>,
    periodos: RegistroPeriodos,
}

impl Motor {
    /// Envuelve una conexión abierta e inicializa el esquema.
    pub fn new(conn: Connection) -> Result<Motor, MotorError> {
        db::init_db(&conn)?;
        Ok(Motor { conn: Mutex::new(conn), periodos: RegistroPeriodos::default() })
    }

    pub fn abrir(path: &Path) -> Result<Motor, MotorError> {
        info!(db = %path.display(), "abriendo base de datos");
        Motor::new(db::open_connection(path)?)
    }

    pub fn periodos(&self) -> &RegistroPeriodos {
        &self.periodos
    }

    /// La conexión sólo se toma durante carga y persistencia, nunca mientras
    /// corre el solver.
    fn conexion(&self) -> Result<MutexGuard<'_, Connection>, MotorError> {
        self.conn.lock().map_err(|_| MotorError::Interno("conexión envenenada".to_string()))
    }

    fn cargar(&self, periodo_id: PeriodoId) -> Result<Catalogo, MotorError> {
        let conn = self.conexion()?;
        db::cargar_catalogo(&conn, periodo_id)
    }

    /// Ejecuta una corrida completa: carga, valida la solicitud, genera y
    /// persiste en una sola transacción.
    pub fn generar(&self, solicitud: &SolicitudGeneracion) -> Result<ResultadoGeneracion, MotorError> {
        let periodo_id = solicitud.periodo_id;
        let _guarda = self.periodos.tomar(periodo_id)?;
        let inicio = Instant::now();

        let catalogo = self.cargar(periodo_id)?;
        let validada = validar_solicitud(solicitud, &catalogo)?;
        debug!(
            periodo_id,
            grupos = catalogo.grupos.len(),
            restricciones = !validada.restricciones.is_empty(),
            "snapshot cargado"
        );

        let resultado = algorithm::generar(&catalogo, &validada)?;

        let persistidas = {
            let mut conn = self.conexion()?;
            db::guardar_generacion(&mut conn, periodo_id, &resultado.colocadas, validada.sobrescribir)?
        };

        let reporte = construir_reporte(&catalogo, &validada, &resultado, &persistidas);
        info!(
            periodo_id,
            colocados = reporte.resumen.colocados,
            no_resueltos = reporte.resumen.no_resueltos,
            ms = inicio.elapsed().as_millis() as u64,
            "generación persistida"
        );
        Ok(reporte)
    }

    /// Carga todo lo necesario para editar `id` con el periodo ya reservado.
    fn preparar_edicion(&self, id: AsignacionId) -> Result<(GuardaPeriodo<'_>, Catalogo, Asignacion), MotorError> {
        let periodo_id = {
            let conn = self.conexion()?;
            db::buscar_asignacion(&conn, id)?.ok_or(InputError::AsignacionNoExiste(id))?.periodo_id
        };
        let guarda = self.periodos.tomar(periodo_id)?;
        let catalogo = self.cargar(periodo_id)?;
        if !catalogo.periodo.activo {
            return Err(InputError::PeriodoInactivo(periodo_id).into());
        }
        // se vuelve a leer con el periodo reservado
        let existente = catalogo
            .asignaciones
            .iter()
            .find(|a| a.id == Some(id))
            .cloned()
            .ok_or(InputError::AsignacionNoExiste(id))?;
        Ok((guarda, catalogo, existente))
    }

    fn validar_cambios(
        catalogo: &Catalogo,
        existente: &Asignacion,
        cambios: &CambiosAsignacion,
    ) -> Result<(Asignacion, Validacion), MotorError> {
        let restricciones = armar_restricciones(&cambios.restricciones_docentes, catalogo)?;
        Ok(algorithm::validar_edicion(existente, cambios, &catalogo.asignaciones, catalogo, &restricciones)?)
    }

    /// Edición manual: persiste sólo si la propuesta no tiene conflictos.
    pub fn editar_asignacion(
        &self,
        id: AsignacionId,
        cambios: &CambiosAsignacion,
    ) -> Result<ResultadoEdicion, MotorError> {
        let (_guarda, catalogo, existente) = self.preparar_edicion(id)?;
        let (propuesta, validacion) = Motor::validar_cambios(&catalogo, &existente, cambios)?;

        if !validacion.ok {
            warn!(asignacion_id = id, conflictos = validacion.conflictos.len(), "edición rechazada");
            return Ok(ResultadoEdicion::Rechazada(validacion.conflictos));
        }

        {
            let conn = self.conexion()?;
            db::actualizar_asignacion(&conn, &propuesta)?;
        }
        info!(asignacion_id = id, periodo_id = propuesta.periodo_id, "asignación actualizada");
        Ok(ResultadoEdicion::Actualizada(detallar(&propuesta, &catalogo)))
    }

    /// Igual que `editar_asignacion` pero nunca persiste.
    pub fn validar_edicion(&self, id: AsignacionId, cambios: &CambiosAsignacion) -> Result<Validacion, MotorError> {
        let (_guarda, catalogo, existente) = self.preparar_edicion(id)?;
        let (_, validacion) = Motor::validar_cambios(&catalogo, &existente, cambios)?;
        Ok(validacion)
    }

    /// Asignaciones comprometidas del periodo con sus datos resueltos.
    pub fn asignaciones(&self, periodo_id: PeriodoId) -> Result<Vec<AsignacionDetalle>, MotorError> {
        let catalogo = self.cargar(periodo_id)?;
        Ok(catalogo.asignaciones.iter().map(|a| detallar(a, &catalogo)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarda_libera_al_soltar() {
        let registro = RegistroPeriodos::default();
        {
            let _g = registro.tomar(1).unwrap();
            assert!(registro.ocupado(1));
            assert!(matches!(registro.tomar(1), Err(MotorError::PeriodoOcupado { periodo_id: 1 })));
            // otro periodo es independiente
            let _h = registro.tomar(2).unwrap();
        }
        assert!(!registro.ocupado(1));
        assert!(!registro.ocupado(2));
        assert!(registro.tomar(1).is_ok());
    }
}
