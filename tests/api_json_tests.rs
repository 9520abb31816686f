mod common;

use common::*;
use horarios::InputError;
use horarios::api_json::*;
use horarios::models::{Catalogo, Dia};

fn cat() -> Catalogo {
    let mut inactivo = docente(3, &[10]);
    inactivo.activo = false;
    catalogo(
        vec![grupo(1, 10, 20), grupo(2, 10, 20)],
        vec![docente(1, &[10]), docente(2, &[10]), inactivo],
        vec![aula(1, 30, 1)],
        vec![bloque(1, Dia::Lu, "08:00", "09:30")],
        Vec::new(),
    )
}

fn validar_json(json_data: &str) -> Result<SolicitudValidada, InputError> {
    let s = parse_json_input(json_data)?;
    validar_solicitud(&s, &cat())
}

#[test]
fn test_restricciones_repetidas_se_unen() {
    let v = validar_json(
        r#"{
            "periodo_id": 1,
            "restricciones_docentes": [
                { "docente_id": 1, "pisos": [1] },
                { "docente_id": 1, "pisos": [3, 1] }
            ]
        }"#,
    )
    .unwrap();
    let pisos: Vec<i32> = v.restricciones.pisos_de(1).unwrap().iter().copied().collect();
    assert_eq!(pisos, vec![1, 3]);
    assert!(v.restricciones.permite(2, 9));
    assert!(!v.restricciones.permite(1, 2));
}

#[test]
fn test_preferencias_conservan_orden_y_sin_duplicados() {
    let v = validar_json(
        r#"{
            "periodo_id": 1,
            "preferencias": [
                { "docente_id": 2, "grupo_id": 1 },
                { "docente_id": 1, "grupo_id": 1 },
                { "docente_id": 2, "grupo_id": 1 }
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(v.preferidos(1), &[2, 1]);
    assert!(v.preferidos(2).is_empty());
    assert_eq!(v.total_preferencias(), 2);
}

#[test]
fn test_rechazos_antes_de_colocar() {
    assert_eq!(
        validar_json(r#"{ "periodo_id": 1, "restricciones_docentes": [ { "docente_id": 1, "pisos": [] } ] }"#)
            .unwrap_err(),
        InputError::PisosVacios(1)
    );
    assert_eq!(
        validar_json(r#"{ "periodo_id": 1, "restricciones_docentes": [ { "docente_id": 9, "pisos": [1] } ] }"#)
            .unwrap_err(),
        InputError::DocenteNoExiste(9)
    );
    assert_eq!(
        validar_json(r#"{ "periodo_id": 1, "preferencias": [ { "docente_id": 3, "grupo_id": 1 } ] }"#).unwrap_err(),
        InputError::DocenteInactivo(3)
    );
    assert_eq!(
        validar_json(r#"{ "periodo_id": 1, "preferencias": [ { "docente_id": 1, "grupo_id": 50 } ] }"#)
            .unwrap_err(),
        InputError::GrupoFueraDePeriodo { grupo_id: 50, periodo_id: 1 }
    );
    assert_eq!(validar_json(r#"{ "periodo_id": 2 }"#).unwrap_err(), InputError::PeriodoNoExiste(2));
}

#[test]
fn test_periodo_inactivo() {
    let mut c = cat();
    c.periodo.activo = false;
    let s = SolicitudGeneracion::new(1);
    assert_eq!(validar_solicitud(&s, &c).unwrap_err(), InputError::PeriodoInactivo(1));
}

#[test]
fn test_parse_cambios() {
    let c = parse_cambios(r#"{ "aula_id": 4, "modalidad_id": 2 }"#).unwrap();
    assert_eq!(c.aula_id, Some(4));
    assert_eq!(c.docente_id, None);
    assert!(c.restricciones_docentes.is_empty());
    assert!(matches!(parse_cambios(r#"{ "aula_id": "A-4" }"#), Err(InputError::Json(_))));
}
