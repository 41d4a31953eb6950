use std::fmt::Display;

use derive_more::derive::AsRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsRef, Serialize, Deserialize)]
pub struct Kilometers(pub f64);

impl From<f64> for Kilometers {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<&Kilometers> for f64 {
    fn from(value: &Kilometers) -> Self {
        value.0
    }
}

impl Display for Kilometers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} km", self.0)
    }
}
