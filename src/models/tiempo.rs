//! Normalización de horas y franjas horarias.
//!
//! Todas las horas se manejan como minutos desde medianoche y las franjas son
//! intervalos semiabiertos `[inicio, fin)`. Nunca se comparan horas como texto.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InputError;

/// Día de la semana, con los códigos cortos usados en la oferta académica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dia {
    #[serde(rename = "LU")]
    Lu,
    #[serde(rename = "MA")]
    Ma,
    #[serde(rename = "MI")]
    Mi,
    #[serde(rename = "JU")]
    Ju,
    #[serde(rename = "VI")]
    Vi,
    #[serde(rename = "SA")]
    Sa,
    #[serde(rename = "DO")]
    Do,
}

impl Dia {
    /// Acepta "LU", "LUN", "Lunes", "lunes", el número ISO (1 = lunes) y los
    /// nombres en inglés que a veces vienen de la base de datos.
    pub fn parse(s: &str) -> Option<Dia> {
        let token = s.trim().to_uppercase();
        if let Ok(n) = token.parse::<u8>() {
            return match n {
                1 => Some(Dia::Lu),
                2 => Some(Dia::Ma),
                3 => Some(Dia::Mi),
                4 => Some(Dia::Ju),
                5 => Some(Dia::Vi),
                6 => Some(Dia::Sa),
                7 => Some(Dia::Do),
                _ => None,
            };
        }
        let prefijo: String = token.chars().take(2).collect();
        match prefijo.as_str() {
            "LU" | "MO" => Some(Dia::Lu),
            "MA" | "TU" => Some(Dia::Ma),
            "MI" | "WE" => Some(Dia::Mi),
            "JU" | "TH" => Some(Dia::Ju),
            "VI" | "FR" => Some(Dia::Vi),
            "SA" | "SÁ" => Some(Dia::Sa),
            "DO" | "SU" => Some(Dia::Do),
            _ => None,
        }
    }

    pub fn codigo(&self) -> &'static str {
        match self {
            Dia::Lu => "LU",
            Dia::Ma => "MA",
            Dia::Mi => "MI",
            Dia::Ju => "JU",
            Dia::Vi => "VI",
            Dia::Sa => "SA",
            Dia::Do => "DO",
        }
    }
}

impl fmt::Display for Dia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.codigo())
    }
}

/// Rango horario `[inicio, fin)` en minutos desde medianoche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Franja {
    pub inicio: i32,
    pub fin: i32,
}

impl Franja {
    pub fn new(inicio: i32, fin: i32) -> Result<Franja, InputError> {
        if fin <= inicio {
            return Err(InputError::FranjaVacia { inicio, fin });
        }
        Ok(Franja { inicio, fin })
    }

    /// Construye la franja desde las columnas `hora_inicio`/`hora_fin`.
    pub fn desde_texto(inicio: &str, fin: &str) -> Result<Franja, InputError> {
        let i = hora_a_minutos(inicio).ok_or_else(|| InputError::HoraInvalida(inicio.to_string()))?;
        let f = hora_a_minutos(fin).ok_or_else(|| InputError::HoraInvalida(fin.to_string()))?;
        Franja::new(i, f)
    }

    /// Dos franjas se solapan si sus intervalos semiabiertos se intersectan;
    /// 08:00-09:00 y 09:00-10:00 no se solapan.
    pub fn se_solapa(&self, otra: &Franja) -> bool {
        self.inicio < otra.fin && otra.inicio < self.fin
    }

    pub fn duracion(&self) -> i32 {
        self.fin - self.inicio
    }
}

impl fmt::Display for Franja {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", minutos_a_hora(self.inicio), minutos_a_hora(self.fin))
    }
}

/// Convierte "08:30", "8:30", "08.30" o "08:30:00" a minutos desde medianoche.
pub fn hora_a_minutos(hora: &str) -> Option<i32> {
    let tok = hora.trim().replace('.', ":");
    let partes: Vec<&str> = tok.split(':').collect();
    if partes.len() < 2 || partes.len() > 3 {
        return None;
    }
    let hh = partes[0].parse::<i32>().ok()?;
    let mm = partes[1].parse::<i32>().ok()?;
    if partes.len() == 3 {
        // segundos: se aceptan pero deben ser válidos
        let ss = partes[2].parse::<i32>().ok()?;
        if !(0..60).contains(&ss) {
            return None;
        }
    }
    // 24:00 se admite como fin de día
    if !(0..=24).contains(&hh) || !(0..60).contains(&mm) || (hh == 24 && mm != 0) {
        return None;
    }
    Some(hh * 60 + mm)
}

pub fn minutos_a_hora(minutos: i32) -> String {
    format!("{:02}:{:02}", minutos / 60, minutos % 60)
}
