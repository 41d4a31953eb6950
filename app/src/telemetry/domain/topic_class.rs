use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum TopicClass {
    #[display("real_time_soc")]
    RealTimeSoc,
    #[display("status_report")]
    StatusReport,
    #[display("vehicle_speed")]
    VehicleSpeed,
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

impl TopicClass {
    //None for the class published on the bare base topic
    pub fn subtopic(&self) -> Option<&'static str> {
        match self {
            TopicClass::RealTimeSoc => Some("SOC"),
            TopicClass::StatusReport => None,
            TopicClass::VehicleSpeed => Some("speed"),
            TopicClass::AcTemperature => Some("actemp"),
            TopicClass::FanSpeed => Some("fanspeed"),
            TopicClass::DriverVent => Some("drivervent"),
            TopicClass::PassengerVent => Some("passengervent"),
            TopicClass::SunroofPosition => Some("sunroof/position"),
        }
    }

    pub fn topic(&self, base: &str) -> String {
        match self.subtopic() {
            Some(subtopic) => format!("{}/{}", base, subtopic),
            None => base.to_string(),
        }
    }
}
