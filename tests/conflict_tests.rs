mod common;

use common::*;
use horarios::InputError;
use horarios::algorithm::{Conflicto, TipoConflicto, validar};
use horarios::api_json::RestriccionesDocentes;
use horarios::models::{Dia, Modalidad};

fn base() -> horarios::models::Catalogo {
    catalogo(
        vec![grupo(1, 10, 30), grupo(2, 10, 30), grupo(3, 10, 50)],
        vec![docente(1, &[10]), docente(2, &[10])],
        vec![aula(1, 40, 1), aula(2, 40, 2), aula(3, 20, 1)],
        vec![
            bloque(1, Dia::Lu, "08:00", "09:30"),
            bloque(2, Dia::Lu, "09:00", "10:00"),
            bloque(3, Dia::Lu, "09:30", "11:00"),
            bloque(4, Dia::Ma, "08:00", "09:30"),
        ],
        Vec::new(),
    )
}

#[test]
fn test_sin_conflictos() {
    let cat = base();
    let v = validar(&asignacion(None, 1, 1, 1, 1), &[], &cat, &RestriccionesDocentes::new()).unwrap();
    assert!(v.ok);
    assert!(v.conflictos.is_empty());
}

#[test]
fn test_validar_es_idempotente() {
    let cat = base();
    let comprometidas = vec![asignacion(Some(7), 2, 1, 1, 1)];
    let candidata = asignacion(None, 1, 1, 1, 2);
    let r = RestriccionesDocentes::new();
    let a = validar(&candidata, &comprometidas, &cat, &r).unwrap();
    let b = validar(&candidata, &comprometidas, &cat, &r).unwrap();
    assert_eq!(a, b);
    assert!(!a.ok);
}

#[test]
fn test_docente_ocupado_con_bloques_heterogeneos() {
    let cat = base();
    let comprometidas = vec![asignacion(Some(7), 2, 1, 2, 1)];
    let r = RestriccionesDocentes::new();

    // 08:00-09:30 vs 09:00-10:00 el mismo lunes: se solapan aunque sean bloques distintos
    let v = validar(&asignacion(None, 1, 1, 1, 2), &comprometidas, &cat, &r).unwrap();
    assert_eq!(v.conflictos, vec![Conflicto::DocenteOcupado { asignacion_id: Some(7), grupo_id: 2, bloque_id: 1 }]);

    // 09:30 es el fin exclusivo del bloque 1
    let v = validar(&asignacion(None, 1, 1, 1, 3), &comprometidas, &cat, &r).unwrap();
    assert!(v.ok);

    // mismo horario, otro día
    let v = validar(&asignacion(None, 1, 1, 1, 4), &comprometidas, &cat, &r).unwrap();
    assert!(v.ok);
}

#[test]
fn test_aula_ocupada() {
    let cat = base();
    let comprometidas = vec![asignacion(Some(3), 2, 2, 1, 1)];
    let v = validar(&asignacion(None, 1, 1, 1, 1), &comprometidas, &cat, &RestriccionesDocentes::new()).unwrap();
    assert_eq!(v.conflictos, vec![Conflicto::AulaOcupada { asignacion_id: Some(3), grupo_id: 2, bloque_id: 1 }]);
}

#[test]
fn test_capacidad_insuficiente() {
    let cat = base();
    let v = validar(&asignacion(None, 3, 1, 1, 1), &[], &cat, &RestriccionesDocentes::new()).unwrap();
    assert_eq!(v.conflictos, vec![Conflicto::CapacidadInsuficiente { capacidad: 40, cupo_maximo: 50 }]);
}

#[test]
fn test_piso_no_permitido() {
    let cat = base();
    let mut r = RestriccionesDocentes::new();
    r.permitir(1, [1]);

    let v = validar(&asignacion(None, 1, 1, 2, 1), &[], &cat, &r).unwrap();
    assert_eq!(v.conflictos.len(), 1);
    assert_eq!(v.conflictos[0].tipo(), TipoConflicto::PisoNoPermitido);

    // el docente 2 no tiene restricción
    assert!(validar(&asignacion(None, 1, 2, 2, 1), &[], &cat, &r).unwrap().ok);
}

#[test]
fn test_modalidad_incompatible() {
    let mut g = grupo(1, 10, 30);
    g.modalidad = Some(Modalidad::Virtual);
    let mut virtual_ = aula(9, 200, 0);
    virtual_.es_virtual = true;
    let cat = catalogo(
        vec![g],
        vec![docente(1, &[10])],
        vec![aula(1, 40, 1), virtual_],
        vec![bloque(1, Dia::Lu, "08:00", "09:30")],
        Vec::new(),
    );
    let r = RestriccionesDocentes::new();

    let v = validar(&asignacion(None, 1, 1, 1, 1), &[], &cat, &r).unwrap();
    assert_eq!(
        v.conflictos,
        vec![Conflicto::ModalidadIncompatible { requerida: Modalidad::Virtual, aula_virtual: false }]
    );

    let mut ok = asignacion(None, 1, 1, 9, 1);
    ok.modalidad = Modalidad::Virtual;
    assert!(validar(&ok, &[], &cat, &r).unwrap().ok);
}

#[test]
fn test_grupo_ya_asignado() {
    let cat = base();
    let comprometidas = vec![asignacion(Some(11), 1, 2, 2, 4)];
    let v = validar(&asignacion(None, 1, 1, 1, 1), &comprometidas, &cat, &RestriccionesDocentes::new()).unwrap();
    assert_eq!(v.conflictos, vec![Conflicto::GrupoYaAsignado { asignacion_id: Some(11) }]);
}

#[test]
fn test_reporta_todos_los_conflictos() {
    let cat = base();
    let comprometidas = vec![asignacion(Some(5), 2, 1, 1, 1)];
    let v = validar(&asignacion(None, 3, 1, 1, 2), &comprometidas, &cat, &RestriccionesDocentes::new()).unwrap();
    let tipos: Vec<TipoConflicto> = v.conflictos.iter().map(|c| c.tipo()).collect();
    assert_eq!(
        tipos,
        vec![TipoConflicto::DocenteOcupado, TipoConflicto::AulaOcupada, TipoConflicto::CapacidadInsuficiente]
    );
}

#[test]
fn test_edicion_ignora_su_propia_fila() {
    let cat = base();
    let comprometidas = vec![asignacion(Some(5), 1, 1, 1, 1)];
    // misma fila, mismo lugar: no choca consigo misma
    let v = validar(&asignacion(Some(5), 1, 1, 1, 1), &comprometidas, &cat, &RestriccionesDocentes::new()).unwrap();
    assert!(v.ok);
}

#[test]
fn test_otros_periodos_se_ignoran() {
    let cat = base();
    let mut otra = asignacion(Some(5), 2, 1, 1, 1);
    otra.periodo_id = 99;
    let v = validar(&asignacion(None, 1, 1, 1, 1), &[otra], &cat, &RestriccionesDocentes::new()).unwrap();
    assert!(v.ok);
}

#[test]
fn test_referencia_desconocida_es_error_de_entrada() {
    let cat = base();
    let r = RestriccionesDocentes::new();
    assert_eq!(validar(&asignacion(None, 1, 1, 77, 1), &[], &cat, &r), Err(InputError::AulaNoExiste(77)));
    assert_eq!(validar(&asignacion(None, 1, 1, 1, 77), &[], &cat, &r), Err(InputError::BloqueNoExiste(77)));
}
