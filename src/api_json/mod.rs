use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::InputError;
use crate::models::{Catalogo, DocenteId, GrupoId, Modalidad, PeriodoId};

/// Parámetros de entrada para una corrida de generación de horarios
///
/// # Estructura del JSON esperado:
/// ```json
/// {
///   "periodo_id": 3,
///   "restricciones_docentes": [
///     { "docente_id": 7, "pisos": [1, 2] }
///   ],
///   "preferencias": [
///     { "docente_id": 7, "grupo_id": 41 }
///   ],
///   "sobrescribir": false,
///   "opciones": {
///     "orden_grupos": "por_id",
///     "max_reubicaciones": 0
///   }
/// }
/// ```
///
/// # Campos:
/// - `periodo_id`: periodo académico a generar (requerido)
/// - `restricciones_docentes`: pisos permitidos por docente; un docente sin
///   entrada no tiene restricción
/// - `preferencias`: pares docente-grupo deseados (restricción blanda)
/// - `sobrescribir`: si es `true` se descartan las asignaciones existentes del
///   periodo y se vuelven a generar todos los grupos
/// - `opciones`: ajustes del solver (opcional)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolicitudGeneracion {
    pub periodo_id: PeriodoId,
    #[serde(default)]
    pub restricciones_docentes: Vec<RestriccionDocente>,
    #[serde(default)]
    pub preferencias: Vec<Preferencia>,
    #[serde(default)]
    pub sobrescribir: bool,
    #[serde(default)]
    pub opciones: OpcionesGeneracion,
}

impl SolicitudGeneracion {
    pub fn new(periodo_id: PeriodoId) -> SolicitudGeneracion {
        SolicitudGeneracion {
            periodo_id,
            restricciones_docentes: Vec::new(),
            preferencias: Vec::new(),
            sobrescribir: false,
            opciones: OpcionesGeneracion::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestriccionDocente {
    pub docente_id: DocenteId,
    pub pisos: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferencia {
    pub docente_id: DocenteId,
    pub grupo_id: GrupoId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdenGrupos {
    /// Id ascendente; reproduce exactamente la misma salida para la misma entrada.
    #[default]
    PorId,
    /// Grupos con menos aulas candidatas primero; id como desempate.
    MasRestringidoPrimero,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpcionesGeneracion {
    #[serde(default)]
    pub orden_grupos: OrdenGrupos,
    /// Cuántas veces por corrida se permite desplazar un grupo ya colocado
    /// para hacer lugar a uno sin resolver. 0 = greedy puro.
    #[serde(default)]
    pub max_reubicaciones: usize,
}

/// Cambios parciales sobre una asignación existente (edición manual).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CambiosAsignacion {
    #[serde(default)]
    pub docente_id: Option<DocenteId>,
    #[serde(default)]
    pub aula_id: Option<i64>,
    #[serde(default)]
    pub bloque_horario_id: Option<i64>,
    #[serde(default)]
    pub modalidad_id: Option<i64>,
    /// Pisos permitidos a considerar al validar la edición.
    #[serde(default)]
    pub restricciones_docentes: Vec<RestriccionDocente>,
}

impl CambiosAsignacion {
    pub fn modalidad(&self) -> Result<Option<Modalidad>, InputError> {
        self.modalidad_id.map(Modalidad::desde_id).transpose()
    }
}

/// Pisos permitidos por docente. Ausencia de entrada = sin restricción.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestriccionesDocentes(BTreeMap<DocenteId, BTreeSet<i32>>);

impl RestriccionesDocentes {
    pub fn new() -> RestriccionesDocentes {
        RestriccionesDocentes(BTreeMap::new())
    }

    /// Agrega pisos a la restricción del docente (unión si ya existía).
    pub fn permitir(&mut self, docente_id: DocenteId, pisos: impl IntoIterator<Item = i32>) {
        self.0.entry(docente_id).or_default().extend(pisos);
    }

    pub fn pisos_de(&self, docente_id: DocenteId) -> Option<&BTreeSet<i32>> {
        self.0.get(&docente_id).filter(|p| !p.is_empty())
    }

    pub fn permite(&self, docente_id: DocenteId, piso: i32) -> bool {
        self.pisos_de(docente_id).is_none_or(|p| p.contains(&piso))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Solicitud ya contrastada contra el catálogo del periodo.
#[derive(Debug, Clone)]
pub struct SolicitudValidada {
    pub periodo_id: PeriodoId,
    pub restricciones: RestriccionesDocentes,
    /// Docentes preferidos por grupo, en el orden en que llegaron.
    pub preferencias: BTreeMap<GrupoId, Vec<DocenteId>>,
    pub sobrescribir: bool,
    pub opciones: OpcionesGeneracion,
}

impl SolicitudValidada {
    pub fn preferidos(&self, grupo_id: GrupoId) -> &[DocenteId] {
        self.preferencias.get(&grupo_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_preferencias(&self) -> usize {
        self.preferencias.values().map(Vec::len).sum()
    }
}

pub fn parse_json_input(json_str: &str) -> Result<SolicitudGeneracion, InputError> {
    serde_json::from_str::<SolicitudGeneracion>(json_str).map_err(|e| InputError::Json(e.to_string()))
}

pub fn parse_cambios(json_str: &str) -> Result<CambiosAsignacion, InputError> {
    serde_json::from_str::<CambiosAsignacion>(json_str).map_err(|e| InputError::Json(e.to_string()))
}

fn docente_activo(id: DocenteId, catalogo: &Catalogo) -> Result<(), InputError> {
    if !catalogo.docente(id)?.activo {
        return Err(InputError::DocenteInactivo(id));
    }
    Ok(())
}

/// Junta las restricciones de piso por docente (unión de entradas repetidas).
/// Rechaza docentes inexistentes o inactivos y listas de pisos vacías.
pub fn armar_restricciones(
    entradas: &[RestriccionDocente],
    catalogo: &Catalogo,
) -> Result<RestriccionesDocentes, InputError> {
    let mut restricciones = RestriccionesDocentes::new();
    for r in entradas {
        docente_activo(r.docente_id, catalogo)?;
        if r.pisos.is_empty() {
            return Err(InputError::PisosVacios(r.docente_id));
        }
        restricciones.permitir(r.docente_id, r.pisos.iter().copied());
    }
    Ok(restricciones)
}

/// Valida la solicitud contra el catálogo antes de cualquier colocación:
/// todo docente referenciado debe existir y estar activo, todo grupo preferido
/// debe ser del periodo y ninguna restricción puede venir sin pisos.
pub fn validar_solicitud(
    solicitud: &SolicitudGeneracion,
    catalogo: &Catalogo,
) -> Result<SolicitudValidada, InputError> {
    if solicitud.periodo_id != catalogo.periodo.id {
        return Err(InputError::PeriodoNoExiste(solicitud.periodo_id));
    }
    if !catalogo.periodo.activo {
        return Err(InputError::PeriodoInactivo(catalogo.periodo.id));
    }

    let restricciones = armar_restricciones(&solicitud.restricciones_docentes, catalogo)?;

    let mut preferencias: BTreeMap<GrupoId, Vec<DocenteId>> = BTreeMap::new();
    for p in &solicitud.preferencias {
        docente_activo(p.docente_id, catalogo)?;
        catalogo.grupo(p.grupo_id)?;
        let lista = preferencias.entry(p.grupo_id).or_default();
        if !lista.contains(&p.docente_id) {
            lista.push(p.docente_id);
        }
    }

    Ok(SolicitudValidada {
        periodo_id: solicitud.periodo_id,
        restricciones,
        preferencias,
        sobrescribir: solicitud.sobrescribir,
        opciones: solicitud.opciones.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_completo() {
        let json_data = r#"
        {
            "periodo_id": 3,
            "restricciones_docentes": [
                { "docente_id": 7, "pisos": [1, 2] }
            ],
            "preferencias": [
                { "docente_id": 7, "grupo_id": 41 }
            ],
            "sobrescribir": true,
            "opciones": { "orden_grupos": "mas_restringido_primero", "max_reubicaciones": 2 }
        }
        "#;

        let s = parse_json_input(json_data).expect("Debe parsear JSON completo");
        assert_eq!(s.periodo_id, 3);
        assert_eq!(s.restricciones_docentes, vec![RestriccionDocente { docente_id: 7, pisos: vec![1, 2] }]);
        assert_eq!(s.preferencias, vec![Preferencia { docente_id: 7, grupo_id: 41 }]);
        assert!(s.sobrescribir);
        assert_eq!(s.opciones.orden_grupos, OrdenGrupos::MasRestringidoPrimero);
        assert_eq!(s.opciones.max_reubicaciones, 2);
    }

    #[test]
    fn test_parse_json_minimo() {
        let s = parse_json_input(r#"{ "periodo_id": 1 }"#).expect("Debe parsear JSON mínimo");
        assert!(s.restricciones_docentes.is_empty());
        assert!(s.preferencias.is_empty());
        assert!(!s.sobrescribir);
        assert_eq!(s.opciones, OpcionesGeneracion::default());
    }

    #[test]
    fn test_parse_json_sin_periodo() {
        assert!(matches!(parse_json_input(r#"{ "preferencias": [] }"#), Err(InputError::Json(_))));
    }

    #[test]
    fn test_restricciones_union_y_ausencia() {
        let mut r = RestriccionesDocentes::new();
        r.permitir(1, [1]);
        r.permitir(1, [3]);
        assert!(r.permite(1, 1));
        assert!(r.permite(1, 3));
        assert!(!r.permite(1, 2));
        // sin entrada: sin restricción
        assert!(r.permite(2, 99));
    }

    #[test]
    fn test_cambios_modalidad() {
        let c = parse_cambios(r#"{ "aula_id": 4, "modalidad_id": 2 }"#).unwrap();
        assert_eq!(c.aula_id, Some(4));
        assert_eq!(c.docente_id, None);
        assert_eq!(c.modalidad(), Ok(Some(Modalidad::Virtual)));
        let malo = CambiosAsignacion { modalidad_id: Some(5), ..Default::default() };
        assert!(malo.modalidad().is_err());
    }
}
