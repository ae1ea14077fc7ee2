use crate::store::Record;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Represents a single row of `veiculos.csv`. The plate is the key.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "Placa")]
    pub plate: String,
    #[serde(rename = "Marca")]
    pub make: String,
    #[serde(rename = "Modelo")]
    pub model: String,
    #[serde(rename = "Ano")]
    pub year: u16,
    #[serde(rename = "Cor")]
    pub color: String,
}

impl Vehicle {
    /// Plates are stored trimmed and uppercased; lookups by plate go through this as well.
    pub fn normalize_plate(plate: &str) -> String {
        plate.trim().to_uppercase()
    }

    pub fn normalized(self) -> Self {
        Self {
            plate: Self::normalize_plate(&self.plate),
            make: self.make.trim().to_string(),
            model: self.model.trim().to_string(),
            year: self.year,
            color: self.color.trim().to_string(),
        }
    }
}

/// e.g. `ABC1D23 (Fiat Mobi)`
impl Display for Vehicle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} {})", self.plate, self.make, self.model)
    }
}

impl Record for Vehicle {
    const HEADERS: &'static [&'static str] = &["Placa", "Marca", "Modelo", "Ano", "Cor"];
}
