mod feedback;
mod soc;
mod status_report;

use derive_more::derive::{Display, Error};

use crate::{
    command::{AC_TEMPERATURE_RANGE, FAN_SPEED_RANGE, SUNROOF_POSITION_RANGE, VENT_LEVEL_RANGE},
    core::unit::DegreeCelsius,
    telemetry::domain::{RawReading, TopicClass},
};

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum DecodeError {
    #[display("Payload is not valid UTF-8")]
    NotUtf8,

    #[display("Payload is empty")]
    Empty,

    #[display("{value:?} is not a number")]
    NotANumber { value: String },

    #[display("{value} is not a whole number")]
    NotWholeNumber { value: f64 },

    #[display("{value} is outside of {min}..={max}")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[display("Required label {label} is missing")]
    MissingLabel { label: &'static str },

    #[display("Label {label} has invalid value {value:?}")]
    InvalidValue { label: &'static str, value: String },
}

//Atomic per message: either every field of the reading is decoded or the whole message is rejected
pub fn decode(class: TopicClass, payload: &[u8]) -> Result<RawReading, DecodeError> {
    let text = std::str::from_utf8(payload).map_err(|_| DecodeError::NotUtf8)?;

    match class {
        TopicClass::RealTimeSoc => soc::decode(text).map(RawReading::Soc),
        TopicClass::StatusReport => status_report::decode(text).map(|report| RawReading::StatusReport(Box::new(report))),
        TopicClass::VehicleSpeed => feedback::speed(text).map(RawReading::VehicleSpeed),
        TopicClass::AcTemperature => feedback::level(text, &AC_TEMPERATURE_RANGE)
            .map(|t| RawReading::AcTemperature(DegreeCelsius(f64::from(t)))),
        TopicClass::FanSpeed => feedback::level(text, &FAN_SPEED_RANGE).map(RawReading::FanSpeed),
        TopicClass::DriverVent => feedback::level(text, &VENT_LEVEL_RANGE).map(RawReading::DriverVent),
        TopicClass::PassengerVent => feedback::level(text, &VENT_LEVEL_RANGE).map(RawReading::PassengerVent),
        TopicClass::SunroofPosition => {
            feedback::level(text, &SUNROOF_POSITION_RANGE).map(RawReading::SunroofPosition)
        }
    }
}

fn parse_number(text: &str) -> Result<f64, DecodeError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }

    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DecodeError::NotANumber { value: text.to_string() })
}
