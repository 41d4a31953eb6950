use std::ops::RangeInclusive;

use derive_more::derive::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::{car::VentEquipment, telemetry::TopicClass};

pub const AC_TEMPERATURE_RANGE: RangeInclusive<u8> = 17..=33;
pub const FAN_SPEED_RANGE: RangeInclusive<u8> = 0..=7;
pub const VENT_LEVEL_RANGE: RangeInclusive<u8> = 0..=2;
pub const SUNROOF_POSITION_RANGE: RangeInclusive<u8> = 0..=100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    #[display("ac_temperature")]
    AcTemperature,
    #[display("fan_speed")]
    FanSpeed,
    #[display("driver_vent")]
    DriverVent,
    #[display("passenger_vent")]
    PassengerVent,
    #[display("sunroof_position")]
    SunroofPosition,
}

impl CommandKind {
    const ALL: [CommandKind; 5] = [
        CommandKind::AcTemperature,
        CommandKind::FanSpeed,
        CommandKind::DriverVent,
        CommandKind::PassengerVent,
        CommandKind::SunroofPosition,
    ];

    //Vent commands only exist for cars with ventilated seats
    pub fn resolve(name: &str, vents: VentEquipment) -> Result<Self, CommandError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == name)
            .filter(|kind| match kind {
                CommandKind::DriverVent => vents.driver,
                CommandKind::PassengerVent => vents.passenger,
                CommandKind::AcTemperature | CommandKind::FanSpeed | CommandKind::SunroofPosition => true,
            })
            .ok_or_else(|| CommandError::UnknownCommand { name: name.to_string() })
    }

    pub fn range(&self) -> RangeInclusive<u8> {
        match self {
            CommandKind::AcTemperature => AC_TEMPERATURE_RANGE,
            CommandKind::FanSpeed => FAN_SPEED_RANGE,
            CommandKind::DriverVent | CommandKind::PassengerVent => VENT_LEVEL_RANGE,
            CommandKind::SunroofPosition => SUNROOF_POSITION_RANGE,
        }
    }

    //Topic class the launcher reports the applied value back on
    pub fn feedback(&self) -> TopicClass {
        match self {
            CommandKind::AcTemperature => TopicClass::AcTemperature,
            CommandKind::FanSpeed => TopicClass::FanSpeed,
            CommandKind::DriverVent => TopicClass::DriverVent,
            CommandKind::PassengerVent => TopicClass::PassengerVent,
            CommandKind::SunroofPosition => TopicClass::SunroofPosition,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum CommandError {
    #[display("Unknown command {name}")]
    UnknownCommand { name: String },

    #[display("Invalid value {value} for {kind}, expected a whole number in {min}..={max}")]
    InvalidValue { kind: CommandKind, value: f64, min: u8, max: u8 },
}

//Only constructible with a value inside the command's range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Command {
    kind: CommandKind,
    value: u8,
}

impl Command {
    pub fn new(kind: CommandKind, value: f64) -> Result<Self, CommandError> {
        let range = kind.range();
        let invalid = || CommandError::InvalidValue {
            kind,
            value,
            min: *range.start(),
            max: *range.end(),
        };

        if !value.is_finite() || value.fract() != 0.0 {
            return Err(invalid());
        }

        if value < f64::from(*range.start()) || value > f64::from(*range.end()) {
            return Err(invalid());
        }

        Ok(Self {
            kind,
            value: value as u8,
        })
    }

    //Every valid command of the kind in ascending order of value
    pub fn all_of(kind: CommandKind) -> impl Iterator<Item = Command> {
        kind.range().map(move |value| Self { kind, value })
    }

    #[cfg(test)]
    pub fn ac_temperature(celsius: f64) -> Result<Self, CommandError> {
        Self::new(CommandKind::AcTemperature, celsius)
    }

    #[cfg(test)]
    pub fn fan_speed(level: f64) -> Result<Self, CommandError> {
        Self::new(CommandKind::FanSpeed, level)
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    //ASCII integer as understood by the launcher and reported back on the feedback topic
    pub fn native_value(&self) -> String {
        self.value.to_string()
    }

    pub fn body(&self) -> String {
        match self.kind {
            CommandKind::AcTemperature => format!("温度:{}", self.value),
            CommandKind::FanSpeed => format!("风量:{}", self.value),
            CommandKind::DriverVent => vent_body("主驾", self.value),
            CommandKind::PassengerVent => vent_body("副驾", self.value),
            CommandKind::SunroofPosition => format!("开遮阳帘{}%", self.value),
        }
    }
}

fn vent_body(seat: &str, level: u8) -> String {
    match level {
        0 => format!("关{}", seat),
        1 => format!("{}通风一档", seat),
        _ => format!("{}通风", seat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VENTS: VentEquipment = VentEquipment {
        driver: true,
        passenger: true,
    };

    #[test]
    fn range_boundaries() {
        assert!(Command::fan_speed(0.0).is_ok());
        assert!(Command::fan_speed(7.0).is_ok());
        assert!(Command::ac_temperature(17.0).is_ok());
        assert!(Command::ac_temperature(33.0).is_ok());

        assert_eq!(
            Command::fan_speed(8.0),
            Err(CommandError::InvalidValue {
                kind: CommandKind::FanSpeed,
                value: 8.0,
                min: 0,
                max: 7
            })
        );
        assert_eq!(
            Command::ac_temperature(16.0),
            Err(CommandError::InvalidValue {
                kind: CommandKind::AcTemperature,
                value: 16.0,
                min: 17,
                max: 33
            })
        );
    }

    #[test]
    fn fractional_and_non_finite_values_are_invalid() {
        assert!(matches!(Command::fan_speed(2.5), Err(CommandError::InvalidValue { .. })));
        assert!(matches!(Command::ac_temperature(f64::NAN), Err(CommandError::InvalidValue { .. })));
        assert!(matches!(Command::fan_speed(-1.0), Err(CommandError::InvalidValue { .. })));
    }

    #[test]
    fn bodies() {
        assert_eq!(Command::ac_temperature(30.0).unwrap().body(), "温度:30");
        assert_eq!(Command::fan_speed(3.0).unwrap().body(), "风量:3");
        assert_eq!(Command::new(CommandKind::DriverVent, 0.0).unwrap().body(), "关主驾");
        assert_eq!(Command::new(CommandKind::DriverVent, 1.0).unwrap().body(), "主驾通风一档");
        assert_eq!(Command::new(CommandKind::PassengerVent, 2.0).unwrap().body(), "副驾通风");
    }

    #[test]
    fn vent_commands_need_equipment() {
        assert_eq!(
            CommandKind::resolve("driver_vent", VentEquipment::default()),
            Err(CommandError::UnknownCommand {
                name: "driver_vent".to_string()
            })
        );
        assert_eq!(CommandKind::resolve("driver_vent", ALL_VENTS), Ok(CommandKind::DriverVent));
        assert_eq!(
            CommandKind::resolve("fan_speed", VentEquipment::default()),
            Ok(CommandKind::FanSpeed)
        );
        assert!(CommandKind::resolve("sunroof", ALL_VENTS).is_err());
    }

    #[test]
    fn sunroof_position_boundaries() {
        let position = |value| Command::new(CommandKind::SunroofPosition, value);

        assert_eq!(position(0.0).map(|c| c.body()), Ok("开遮阳帘0%".to_string()));
        assert_eq!(position(100.0).map(|c| c.body()), Ok("开遮阳帘100%".to_string()));
        assert_eq!(position(55.0).map(|c| c.native_value()), Ok("55".to_string()));
        assert_eq!(
            position(101.0),
            Err(CommandError::InvalidValue {
                kind: CommandKind::SunroofPosition,
                value: 101.0,
                min: 0,
                max: 100
            })
        );
        assert!(matches!(position(-1.0), Err(CommandError::InvalidValue { .. })));
        assert_eq!(
            CommandKind::resolve("sunroof_position", VentEquipment::default()),
            Ok(CommandKind::SunroofPosition)
        );
    }

    #[test]
    fn all_of_enumerates_valid_commands() {
        let fan: Vec<Command> = Command::all_of(CommandKind::FanSpeed).collect();
        assert_eq!(fan.len(), 8);
        assert_eq!(fan[0], Command::fan_speed(0.0).unwrap());
        assert_eq!(fan[7], Command::fan_speed(7.0).unwrap());

        for kind in CommandKind::ALL {
            for command in Command::all_of(kind) {
                assert_eq!(Command::new(kind, f64::from(command.value())), Ok(command));
            }
        }
    }
}
