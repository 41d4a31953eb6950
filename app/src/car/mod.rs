mod validation;

pub use validation::{base_topic, capacity};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use derive_more::derive::{Display, Error};
use serde::Deserialize;

use crate::{
    automation::{AutomationService, GeneratorConfig, GeneratorSettings, Revision},
    command::CommandClient,
    core::unit::KiloWattHours,
    telemetry::TelemetryClient,
};

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum ConfigError {
    #[display("{key} must not be empty")]
    Empty { key: &'static str },

    #[display("{key} must not contain MQTT wildcards: {value}")]
    Wildcard { key: &'static str, value: String },

    #[display("Max battery capacity must be a positive number of kWh, got {value}")]
    InvalidCapacity { value: f64 },

    #[display("Car id {car_id} is configured more than once")]
    DuplicateCarId { car_id: String },

    #[display("Car {car_id} uses generator revision soc_feedback without soc_task_type")]
    MissingSocTaskType { car_id: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarSettings {
    pub name: String,
    pub subscribe_topic: String,
    pub command_topic: String,
    pub car_id: String,
    pub max_battery_capacity_kwh: f64,
    #[serde(default)]
    pub enable_driver_vent: bool,
    #[serde(default)]
    pub enable_passenger_vent: bool,
    #[serde(default)]
    pub automation: GeneratorSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VentEquipment {
    pub driver: bool,
    pub passenger: bool,
}

//Validated once at startup and never changed afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct CarConfig {
    pub name: String,
    pub car_id: String,
    pub subscribe_topic: String,
    pub command_topic: String,
    pub max_battery_capacity: KiloWattHours,
    pub vents: VentEquipment,
    pub generator: GeneratorConfig,
}

impl CarSettings {
    pub fn validate(&self) -> Result<CarConfig, ConfigError> {
        let name = validation::non_empty("name", &self.name)?;
        let car_id = validation::non_empty("car_id", &self.car_id)?;
        let subscribe_topic = validation::base_topic("subscribe_topic", &self.subscribe_topic)?;
        let command_topic = validation::topic("command_topic", &self.command_topic)?;
        let max_battery_capacity = validation::capacity(self.max_battery_capacity_kwh)?;

        let vents = VentEquipment {
            driver: self.enable_driver_vent,
            passenger: self.enable_passenger_vent,
        };

        let soc_task_type = match self.automation.revision {
            Revision::Climate => None,
            Revision::SocFeedback => Some(
                self.automation
                    .soc_task_type
                    .ok_or_else(|| ConfigError::MissingSocTaskType { car_id: car_id.clone() })?,
            ),
        };

        let generator = GeneratorConfig {
            base_topic: subscribe_topic.clone(),
            vents,
            soc_task_type,
            driver_vent_task_type: self.automation.driver_vent_task_type.filter(|_| vents.driver),
            passenger_vent_task_type: self.automation.passenger_vent_task_type.filter(|_| vents.passenger),
        };

        Ok(CarConfig {
            name,
            car_id,
            subscribe_topic,
            command_topic,
            max_battery_capacity,
            vents,
            generator,
        })
    }
}

pub fn validate_all(cars: &[CarSettings]) -> Result<Vec<CarConfig>, ConfigError> {
    let mut seen = HashSet::new();
    let mut configs = Vec::with_capacity(cars.len());

    for car in cars {
        let config = car.validate()?;

        if !seen.insert(config.car_id.clone()) {
            return Err(ConfigError::DuplicateCarId { car_id: config.car_id });
        }

        configs.push(config);
    }

    Ok(configs)
}

//Everything the HTTP layer needs to serve one car
#[derive(Clone)]
pub struct Car {
    pub config: Arc<CarConfig>,
    pub telemetry: TelemetryClient,
    pub commands: CommandClient,
    pub automations: AutomationService,
}

#[derive(Clone, Default)]
pub struct CarRegistry {
    cars: Arc<HashMap<String, Car>>,
}

impl CarRegistry {
    pub fn new(cars: Vec<Car>) -> Self {
        let cars = cars.into_iter().map(|car| (car.config.car_id.clone(), car)).collect();
        Self { cars: Arc::new(cars) }
    }

    pub fn get(&self, car_id: &str) -> Option<&Car> {
        self.cars.get(car_id)
    }
}

#[cfg(test)]
pub fn test_car() -> CarConfig {
    CarConfig {
        name: "BYD Dolphin".to_string(),
        car_id: "1734645381137".to_string(),
        subscribe_topic: "/dolphinc".to_string(),
        command_topic: "/dolphinc/cmd".to_string(),
        max_battery_capacity: KiloWattHours(60.48),
        vents: VentEquipment::default(),
        generator: GeneratorConfig::baseline("/dolphinc"),
    }
}
