use std::fmt::Display;

use derive_more::derive::AsRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsRef, Serialize, Deserialize)]
pub struct KiloPascal(pub f64);

impl From<f64> for KiloPascal {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<&KiloPascal> for f64 {
    fn from(value: &KiloPascal) -> Self {
        value.0
    }
}

impl Display for KiloPascal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} kPa", self.0)
    }
}
