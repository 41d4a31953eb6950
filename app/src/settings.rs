use config::{Config, ConfigError, Environment, File};
use infrastructure::{HttpServerConfig, MonitoringConfig, MqttConfig};
use serde::Deserialize;

use crate::{automation::AutomationSettings, car::CarSettings};

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub mqtt: MqttConfig,
    pub http_server: HttpServerConfig,
    pub monitoring: MonitoringConfig,
    pub automation: AutomationSettings,
    #[serde(default)]
    pub cars: Vec<CarSettings>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config.toml"))
            .add_source(Environment::default().separator("_").list_separator(","));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    const SAMPLE: &str = r#"
        [mqtt]
        host = "localhost"
        port = 1883
        client_id = "car-bridge"

        [http_server]
        port = 8080

        [monitoring]
        service_name = "car-bridge"

        [monitoring.logs]
        default_level = "info"

        [automation]
        output_dir = "/var/lib/car-bridge"

        [[cars]]
        name = "BYD Dolphin"
        subscribe_topic = "/dolphinc"
        command_topic = "/dolphinc/cmd"
        car_id = "1734645381137"
        max_battery_capacity_kwh = 60.48
        enable_driver_vent = true

        [cars.automation]
        revision = "soc_feedback"
        soc_task_type = 12
    "#;

    #[test]
    fn sample_config_is_valid() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(SAMPLE, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.http_server.bind_address, "0.0.0.0");
        assert_eq!(settings.cars.len(), 1);

        let car = settings.cars[0].validate().unwrap();
        assert_eq!(car.subscribe_topic, "/dolphinc");
        assert!(car.vents.driver);
        assert!(!car.vents.passenger);
        assert_eq!(car.generator.soc_task_type, Some(12));
    }
}
