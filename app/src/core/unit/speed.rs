use std::fmt::Display;

use derive_more::derive::AsRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsRef, Serialize, Deserialize)]
pub struct KilometersPerHour(pub f64);

impl From<f64> for KilometersPerHour {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<&KilometersPerHour> for f64 {
    fn from(value: &KilometersPerHour) -> Self {
        value.0
    }
}

impl Display for KilometersPerHour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} km/h", self.0)
    }
}
