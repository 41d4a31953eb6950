use serde::Serialize;

use crate::core::{time::DateTime, unit::*};

use super::{CarStatus, TopicClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    #[display("soc_percent")]
    SocPercent,
    #[display("battery_energy_kwh")]
    BatteryEnergyKwh,
    #[display("car_status")]
    CarStatus,
    #[display("odometer_km")]
    OdometerKm,
    #[display("remaining_range_km")]
    RemainingRangeKm,
    #[display("tire_pressure_fl_kpa")]
    TirePressureFlKpa,
    #[display("tire_pressure_fr_kpa")]
    TirePressureFrKpa,
    #[display("tire_pressure_rl_kpa")]
    TirePressureRlKpa,
    #[display("tire_pressure_rr_kpa")]
    TirePressureRrKpa,
    #[display("tire_temperature_fl_c")]
    TireTemperatureFlC,
    #[display("tire_temperature_fr_c")]
    TireTemperatureFrC,
    #[display("tire_temperature_rl_c")]
    TireTemperatureRlC,
    #[display("tire_temperature_rr_c")]
    TireTemperatureRrC,
    #[display("ambient_temperature_c")]
    AmbientTemperatureC,
    #[display("report_battery_percent")]
    ReportBatteryPercent,
    #[display("report_battery_energy_kwh")]
    ReportBatteryEnergyKwh,
    #[display("battery_health_percent")]
    BatteryHealthPercent,
    #[serde(rename = "consumption_last_50km_kwh")]
    #[display("consumption_last_50km_kwh")]
    ConsumptionLast50KmKwh,
    #[display("window_fl_open")]
    WindowFlOpen,
    #[display("window_fr_open")]
    WindowFrOpen,
    #[display("window_rl_open")]
    WindowRlOpen,
    #[display("window_rr_open")]
    WindowRrOpen,
    #[display("sunroof_open")]
    SunroofOpen,
    #[display("detected_at")]
    DetectedAt,
    #[display("last_charged_at")]
    LastChargedAt,
    #[display("charge_start_percent")]
    ChargeStartPercent,
    #[display("charge_end_percent")]
    ChargeEndPercent,
    #[display("charged_percent")]
    ChargedPercent,
    #[display("charged_energy_kwh")]
    ChargedEnergyKwh,
    #[display("charged_range_km")]
    ChargedRangeKm,
    #[display("vehicle_speed_kmh")]
    VehicleSpeedKmh,
    #[display("ac_temperature_c")]
    AcTemperatureC,
    #[display("fan_speed_level")]
    FanSpeedLevel,
    #[display("driver_vent_level")]
    DriverVentLevel,
    #[display("passenger_vent_level")]
    PassengerVentLevel,
    #[display("sunroof_position_percent")]
    SunroofPositionPercent,
}

impl FieldId {
    pub const TIRE_PRESSURES: [FieldId; 4] = [
        FieldId::TirePressureFlKpa,
        FieldId::TirePressureFrKpa,
        FieldId::TirePressureRlKpa,
        FieldId::TirePressureRrKpa,
    ];

    pub const TIRE_TEMPERATURES: [FieldId; 4] = [
        FieldId::TireTemperatureFlC,
        FieldId::TireTemperatureFrC,
        FieldId::TireTemperatureRlC,
        FieldId::TireTemperatureRrC,
    ];

    pub const WINDOWS: [FieldId; 4] = [
        FieldId::WindowFlOpen,
        FieldId::WindowFrOpen,
        FieldId::WindowRlOpen,
        FieldId::WindowRrOpen,
    ];

    //The only topic class allowed to write the field
    pub fn producer(&self) -> TopicClass {
        match self {
            FieldId::SocPercent | FieldId::BatteryEnergyKwh => TopicClass::RealTimeSoc,
            FieldId::VehicleSpeedKmh => TopicClass::VehicleSpeed,
            FieldId::AcTemperatureC => TopicClass::AcTemperature,
            FieldId::FanSpeedLevel => TopicClass::FanSpeed,
            FieldId::DriverVentLevel => TopicClass::DriverVent,
            FieldId::PassengerVentLevel => TopicClass::PassengerVent,
            FieldId::SunroofPositionPercent => TopicClass::SunroofPosition,
            FieldId::CarStatus
            | FieldId::OdometerKm
            | FieldId::RemainingRangeKm
            | FieldId::TirePressureFlKpa
            | FieldId::TirePressureFrKpa
            | FieldId::TirePressureRlKpa
            | FieldId::TirePressureRrKpa
            | FieldId::TireTemperatureFlC
            | FieldId::TireTemperatureFrC
            | FieldId::TireTemperatureRlC
            | FieldId::TireTemperatureRrC
            | FieldId::AmbientTemperatureC
            | FieldId::ReportBatteryPercent
            | FieldId::ReportBatteryEnergyKwh
            | FieldId::BatteryHealthPercent
            | FieldId::ConsumptionLast50KmKwh
            | FieldId::WindowFlOpen
            | FieldId::WindowFrOpen
            | FieldId::WindowRlOpen
            | FieldId::WindowRrOpen
            | FieldId::SunroofOpen
            | FieldId::DetectedAt
            | FieldId::LastChargedAt
            | FieldId::ChargeStartPercent
            | FieldId::ChargeEndPercent
            | FieldId::ChargedPercent
            | FieldId::ChargedEnergyKwh
            | FieldId::ChargedRangeKm => TopicClass::StatusReport,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, derive_more::From, derive_more::Display)]
#[serde(untagged)]
pub enum FieldValue {
    Percent(Percent),
    Energy(KiloWattHours),
    Distance(Kilometers),
    Pressure(KiloPascal),
    Temperature(DegreeCelsius),
    Speed(KilometersPerHour),
    Status(CarStatus),
    Timestamp(DateTime),
    #[from(skip)]
    Level(u8),
    #[from(skip)]
    Open(bool),
}

impl FieldValue {
    //Numeric form for metrics, None where a number has no meaning
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Percent(percent) => Some(f64::from(percent)),
            FieldValue::Energy(kwh) => Some(f64::from(kwh)),
            FieldValue::Distance(km) => Some(f64::from(km)),
            FieldValue::Pressure(kpa) => Some(f64::from(kpa)),
            FieldValue::Temperature(celsius) => Some(f64::from(celsius)),
            FieldValue::Speed(kmh) => Some(f64::from(kmh)),
            FieldValue::Level(level) => Some(f64::from(*level)),
            FieldValue::Open(open) => Some(if *open { 1.0 } else { 0.0 }),
            FieldValue::Status(_) | FieldValue::Timestamp(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_are_snake_case() {
        assert_eq!(FieldId::SocPercent.to_string(), "soc_percent");
        assert_eq!(FieldId::TirePressureFlKpa.to_string(), "tire_pressure_fl_kpa");
        assert_eq!(FieldId::ConsumptionLast50KmKwh.to_string(), "consumption_last_50km_kwh");
        assert_eq!(FieldId::SunroofPositionPercent.to_string(), "sunroof_position_percent");
    }

    #[test]
    fn display_matches_serialized_name() {
        for field in [
            FieldId::CarStatus,
            FieldId::TireTemperatureRrC,
            FieldId::ConsumptionLast50KmKwh,
            FieldId::VehicleSpeedKmh,
            FieldId::SunroofPositionPercent,
        ] {
            assert_eq!(serde_json::to_value(field).unwrap(), serde_json::json!(field.to_string()));
        }
    }

    #[test]
    fn numeric_values_for_metrics() {
        assert_eq!(FieldValue::Percent(Percent(80.0)).as_f64(), Some(80.0));
        assert_eq!(FieldValue::Level(3).as_f64(), Some(3.0));
        assert_eq!(FieldValue::Open(true).as_f64(), Some(1.0));
        assert_eq!(FieldValue::Status(CarStatus::Driving).as_f64(), None);
    }

    #[test]
    fn soc_and_report_fields_have_distinct_producers() {
        assert_eq!(FieldId::SocPercent.producer(), TopicClass::RealTimeSoc);
        assert_eq!(FieldId::BatteryEnergyKwh.producer(), TopicClass::RealTimeSoc);
        assert_eq!(FieldId::ReportBatteryPercent.producer(), TopicClass::StatusReport);
        assert_eq!(FieldId::OdometerKm.producer(), TopicClass::StatusReport);
    }
}
