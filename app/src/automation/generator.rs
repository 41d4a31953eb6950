use std::ops::RangeInclusive;

use crate::{
    command::{Command, CommandKind},
    telemetry::TopicClass,
};

use super::domain::{AutomationTask, COMPARE_EQUALS, Condition, GeneratorConfig};

const AC_TEMPERATURE_TASK_TYPE: u32 = 54;
const FAN_SPEED_TASK_TYPE: u32 = 35;
const SOC_RANGE: RangeInclusive<u8> = 0..=100;

enum Source {
    Command(CommandKind),
    Soc,
}

//One launcher condition type, enumerated over all its values
struct Domain {
    name: &'static str,
    task_type: u32,
    source: Source,
}

impl Domain {
    //Condition value and the action value that goes with it
    fn entries(&self) -> Vec<(u8, String)> {
        match &self.source {
            Source::Command(kind) => Command::all_of(*kind)
                .map(|command| (command.value(), command.native_value()))
                .collect(),
            Source::Soc => SOC_RANGE.map(|value| (value, value.to_string())).collect(),
        }
    }

    fn feedback(&self) -> TopicClass {
        match &self.source {
            Source::Command(kind) => kind.feedback(),
            Source::Soc => TopicClass::RealTimeSoc,
        }
    }

    fn tasks(&self, base_topic: &str) -> impl Iterator<Item = AutomationTask> {
        let topic = self.feedback().topic(base_topic);

        self.entries().into_iter().map(move |(value, native)| AutomationTask {
            name: format!("{} {}", self.name, value),
            state: 1,
            delay_time: 1,
            run_task: format!("MQTT:{}+{}", topic, native),
            conditions: vec![Condition {
                task_type: self.task_type,
                compare_type: COMPARE_EQUALS,
                expect: i64::from(value),
            }],
        })
    }
}

fn domains(config: &GeneratorConfig) -> Vec<Domain> {
    let mut domains = vec![
        Domain {
            name: "AC temperature",
            task_type: AC_TEMPERATURE_TASK_TYPE,
            source: Source::Command(CommandKind::AcTemperature),
        },
        Domain {
            name: "fan speed",
            task_type: FAN_SPEED_TASK_TYPE,
            source: Source::Command(CommandKind::FanSpeed),
        },
    ];

    if let Some(task_type) = config.driver_vent_task_type.filter(|_| config.vents.driver) {
        domains.push(Domain {
            name: "driver vent",
            task_type,
            source: Source::Command(CommandKind::DriverVent),
        });
    }

    if let Some(task_type) = config.passenger_vent_task_type.filter(|_| config.vents.passenger) {
        domains.push(Domain {
            name: "passenger vent",
            task_type,
            source: Source::Command(CommandKind::PassengerVent),
        });
    }

    if let Some(task_type) = config.soc_task_type {
        domains.push(Domain {
            name: "SoC",
            task_type,
            source: Source::Soc,
        });
    }

    domains
}

//Pure function of the config, same input gives the same sequence
pub fn generate(config: &GeneratorConfig) -> Vec<AutomationTask> {
    domains(config)
        .iter()
        .flat_map(|domain| domain.tasks(&config.base_topic))
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    use super::*;
    use crate::car::VentEquipment;

    fn expect_of(task: &AutomationTask) -> i64 {
        task.conditions[0].expect
    }

    #[test]
    fn baseline_has_temperature_then_fan_entries() {
        let tasks = generate(&GeneratorConfig::baseline("/dolphinc"));

        assert_eq!(tasks.len(), 25);

        let (temperatures, fans) = tasks.split_at(17);
        assert_eq!(temperatures.iter().map(expect_of).collect::<Vec<_>>(), (17..=33).collect::<Vec<_>>());
        assert_eq!(fans.iter().map(expect_of).collect::<Vec<_>>(), (0..=7).collect::<Vec<_>>());
        assert!(temperatures.iter().all(|t| t.conditions[0].task_type == 54));
        assert!(fans.iter().all(|t| t.conditions[0].task_type == 35));
    }

    #[test]
    fn command_domains_cover_whole_range() {
        for kind in [
            CommandKind::AcTemperature,
            CommandKind::FanSpeed,
            CommandKind::DriverVent,
            CommandKind::PassengerVent,
        ] {
            let domain = Domain {
                name: "test",
                task_type: 1,
                source: Source::Command(kind),
            };
            let values: Vec<u8> = domain.entries().into_iter().map(|(value, _)| value).collect();

            assert_eq!(values, kind.range().collect::<Vec<_>>(), "{}", kind);
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let config = GeneratorConfig::baseline("/dolphinc");

        assert_eq!(generate(&config), generate(&config));
    }

    #[test]
    fn actions_carry_live_command_value() {
        let tasks = generate(&GeneratorConfig::baseline("/dolphinc"));

        for task in &tasks[..17] {
            let command = Command::ac_temperature(expect_of(task) as f64).unwrap();
            assert_eq!(task.run_task, format!("MQTT:/dolphinc/actemp+{}", command.native_value()));
        }
        for task in &tasks[17..] {
            let command = Command::fan_speed(expect_of(task) as f64).unwrap();
            assert_eq!(task.run_task, format!("MQTT:/dolphinc/fanspeed+{}", command.native_value()));
        }
    }

    #[test]
    fn launcher_json_shape() {
        let tasks = generate(&GeneratorConfig::baseline("/dolphinc"));

        assert_json_eq!(
            serde_json::to_value(&tasks[0]).unwrap(),
            json!({
                "name": "AC temperature 17",
                "state": 1,
                "delayTime": 1,
                "runTask": "MQTT:/dolphinc/actemp+17",
                "conditions": [{
                    "taskType": 54,
                    "compareType": 4,
                    "expect": 17
                }]
            })
        );

        assert_json_eq!(
            serde_json::to_value(&tasks[24]).unwrap(),
            json!({
                "name": "fan speed 7",
                "state": 1,
                "delayTime": 1,
                "runTask": "MQTT:/dolphinc/fanspeed+7",
                "conditions": [{
                    "taskType": 35,
                    "compareType": 4,
                    "expect": 7
                }]
            })
        );
    }

    #[test]
    fn vent_domains_extend_table() {
        let config = GeneratorConfig {
            vents: VentEquipment {
                driver: true,
                passenger: false,
            },
            driver_vent_task_type: Some(40),
            passenger_vent_task_type: Some(41),
            ..GeneratorConfig::baseline("/dolphinc")
        };

        let tasks = generate(&config);

        assert_eq!(tasks.len(), 25 + 3);
        assert_eq!(tasks[25].name, "driver vent 0");
        assert_eq!(tasks[27].run_task, "MQTT:/dolphinc/drivervent+2");
        assert_eq!(tasks[27].conditions[0].task_type, 40);
    }

    #[test]
    fn soc_feedback_revision_adds_soc_entries() {
        let config = GeneratorConfig {
            soc_task_type: Some(12),
            ..GeneratorConfig::baseline("/dolphinc")
        };

        let tasks = generate(&config);

        assert_eq!(tasks.len(), 25 + 101);
        assert_eq!(tasks[25].run_task, "MQTT:/dolphinc/SOC+0");
        assert_eq!(tasks[125].run_task, "MQTT:/dolphinc/SOC+100");
        assert_eq!(expect_of(&tasks[125]), 100);
    }
}
