use serde::{Deserialize, Serialize};

use crate::car::VentEquipment;

//Launcher condition comparing the task value for equality
pub const COMPARE_EQUALS: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationTask {
    pub name: String,
    pub state: u8,
    pub delay_time: u32,
    pub run_task: String,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub task_type: u32,
    pub compare_type: u8,
    pub expect: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Revision {
    //AC temperature and fan speed only
    #[default]
    #[display("climate")]
    Climate,
    //climate plus state of charge feedback
    #[display("soc_feedback")]
    SocFeedback,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default)]
    pub revision: Revision,
    #[serde(default)]
    pub soc_task_type: Option<u32>,
    #[serde(default)]
    pub driver_vent_task_type: Option<u32>,
    #[serde(default)]
    pub passenger_vent_task_type: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub base_topic: String,
    pub vents: VentEquipment,
    pub soc_task_type: Option<u32>,
    pub driver_vent_task_type: Option<u32>,
    pub passenger_vent_task_type: Option<u32>,
}

#[cfg(test)]
impl GeneratorConfig {
    pub fn baseline(base_topic: impl Into<String>) -> Self {
        Self {
            base_topic: base_topic.into(),
            vents: VentEquipment::default(),
            soc_task_type: None,
            driver_vent_task_type: None,
            passenger_vent_task_type: None,
        }
    }
}
