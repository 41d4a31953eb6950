use crate::core::{time::DateTime, unit::*};

use super::CarStatus;

//Tire and window positions are ordered front left, front right, rear left, rear right
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub status: CarStatus,
    pub odometer: Kilometers,
    pub remaining_range: Kilometers,
    pub tire_pressures: [KiloPascal; 4],
    pub tire_temperatures: [DegreeCelsius; 4],
    pub ambient_temperature: DegreeCelsius,
    pub battery: Option<Percent>,
    pub battery_energy: Option<KiloWattHours>,
    pub battery_health: Option<Percent>,
    pub consumption_last_50km: Option<KiloWattHours>,
    pub windows: Option<WindowState>,
    pub detected_at: Option<DateTime>,
    pub last_charged_at: Option<DateTime>,
    pub charge: ChargeSession,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowState {
    pub windows_open: [bool; 4],
    pub sunroof_open: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeSession {
    pub start: Option<Percent>,
    pub end: Option<Percent>,
    pub charged: Option<Percent>,
    pub charged_energy: Option<KiloWattHours>,
    pub charged_range: Option<Kilometers>,
}

//Decoded message content before any derivation
#[derive(Debug, Clone, PartialEq)]
pub enum RawReading {
    Soc(Percent),
    StatusReport(Box<StatusReport>),
    VehicleSpeed(KilometersPerHour),
    AcTemperature(DegreeCelsius),
    FanSpeed(u8),
    DriverVent(u8),
    PassengerVent(u8),
    SunroofPosition(u8),
}
