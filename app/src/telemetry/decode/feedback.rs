use std::ops::RangeInclusive;

use crate::core::unit::KilometersPerHour;

use super::{DecodeError, parse_number};

pub fn speed(text: &str) -> Result<KilometersPerHour, DecodeError> {
    let value = parse_number(text)?;

    if value < 0.0 {
        return Err(DecodeError::OutOfRange {
            value,
            min: 0.0,
            max: f64::INFINITY,
        });
    }

    Ok(KilometersPerHour(value))
}

//Accepts "3" as well as "3.0", but only whole values inside the control's range
pub fn level(text: &str, range: &RangeInclusive<u8>) -> Result<u8, DecodeError> {
    let value = parse_number(text)?;

    if value.fract() != 0.0 {
        return Err(DecodeError::NotWholeNumber { value });
    }

    let (min, max) = (f64::from(*range.start()), f64::from(*range.end()));
    if value < min || value > max {
        return Err(DecodeError::OutOfRange { value, min, max });
    }

    Ok(value as u8)
}
