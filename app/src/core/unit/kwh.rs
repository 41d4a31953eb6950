use std::{fmt::Display, ops::Mul};

use derive_more::derive::AsRef;
use serde::{Deserialize, Serialize};

use super::Percent;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsRef, Serialize, Deserialize)]
pub struct KiloWattHours(pub f64);

impl Display for KiloWattHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} kWh", self.0)
    }
}

impl From<&KiloWattHours> for f64 {
    fn from(value: &KiloWattHours) -> Self {
        value.0
    }
}

impl From<f64> for KiloWattHours {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Mul<Percent> for KiloWattHours {
    type Output = KiloWattHours;

    fn mul(self, rhs: Percent) -> Self::Output {
        KiloWattHours(self.0 * rhs.as_fraction())
    }
}
