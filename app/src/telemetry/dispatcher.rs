use std::collections::HashMap;

use derive_more::derive::{Display, Error};

use crate::{
    car::{self, ConfigError, VentEquipment},
    core::{time::DateTime, unit::KiloWattHours},
    telemetry::{
        decode::{DecodeError, decode},
        derive::{DerivationConfig, derive},
        domain::{FieldId, TopicClass},
        store::StateStore,
    },
};

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum DispatchError {
    #[display("No decoder for topic {topic}")]
    UnknownTopic { topic: String },

    #[display("Malformed payload: {_0}")]
    MalformedPayload(DecodeError),
}

//Exact topic to class mapping, fixed when the car is set up
#[derive(Debug, Clone)]
pub struct TopicRouter {
    base_topic: String,
    routes: HashMap<String, TopicClass>,
    command_topic: Option<String>,
}

impl TopicRouter {
    pub fn new(base_topic: &str, vents: VentEquipment) -> Result<Self, ConfigError> {
        let base_topic = car::base_topic("subscribe_topic", base_topic)?;

        let mut classes = vec![
            TopicClass::RealTimeSoc,
            TopicClass::StatusReport,
            TopicClass::VehicleSpeed,
            TopicClass::AcTemperature,
            TopicClass::FanSpeed,
            TopicClass::SunroofPosition,
        ];
        if vents.driver {
            classes.push(TopicClass::DriverVent);
        }
        if vents.passenger {
            classes.push(TopicClass::PassengerVent);
        }

        let routes = classes
            .into_iter()
            .map(|class| (class.topic(&base_topic), class))
            .collect();

        Ok(Self {
            base_topic,
            routes,
            command_topic: None,
        })
    }

    //The command topic may live below the base topic, our own commands then come back on the subscription
    pub fn with_command_topic(mut self, command_topic: &str) -> Self {
        self.command_topic = Some(command_topic.to_string());
        self
    }

    //Telemetry routes win if the command topic collides with one
    pub fn is_command_echo(&self, topic: &str) -> bool {
        self.command_topic.as_deref() == Some(topic) && !self.routes.contains_key(topic)
    }

    pub fn classify(&self, topic: &str) -> Option<TopicClass> {
        self.routes.get(topic).copied()
    }

    //Matches the bare base topic as well as every subtopic
    pub fn subscription(&self) -> String {
        format!("{}/#", self.base_topic)
    }
}

pub struct Dispatcher {
    router: TopicRouter,
    derivation: DerivationConfig,
    store: StateStore,
}

impl Dispatcher {
    pub fn new(base_topic: &str, vents: VentEquipment, max_battery_capacity: KiloWattHours) -> Result<Self, ConfigError> {
        Ok(Self {
            router: TopicRouter::new(base_topic, vents)?,
            derivation: DerivationConfig {
                max_battery_capacity: car::capacity(max_battery_capacity.0)?,
            },
            store: StateStore::new(),
        })
    }

    pub fn with_command_topic(mut self, command_topic: &str) -> Self {
        self.router = self.router.with_command_topic(command_topic);
        self
    }

    pub fn router(&self) -> &TopicRouter {
        &self.router
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn route(&mut self, topic: &str, payload: &[u8]) -> Result<Vec<FieldId>, DispatchError> {
        self.route_at(topic, payload, DateTime::now())
    }

    //Decode, derive and write happen without yielding, so a message is applied completely or not at all
    pub fn route_at(&mut self, topic: &str, payload: &[u8], now: DateTime) -> Result<Vec<FieldId>, DispatchError> {
        let class = self
            .router
            .classify(topic)
            .ok_or_else(|| DispatchError::UnknownTopic { topic: topic.to_string() })?;

        let reading = decode(class, payload).map_err(DispatchError::MalformedPayload)?;
        let fields = derive(&reading, &self.derivation);

        Ok(self.store.apply(class, fields, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::unit::*;
    use crate::telemetry::domain::FieldValue;

    const REPORT: &str = "熄火提醒
总里程(km)：12345
电量剩余里程(km)：350
各项胎压(kpa)：左前：250 右前：251 左后：248 右后：249
轮胎温度(℃)：左前：30 右前：31 左后：29 右后：30
车外温度：25℃";

    fn dispatcher() -> Dispatcher {
        Dispatcher::new("/dolphinc/", VentEquipment::default(), KiloWattHours(60.0)).unwrap()
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        assert!(matches!(
            Dispatcher::new("/dolphinc", VentEquipment::default(), KiloWattHours(0.0)),
            Err(ConfigError::InvalidCapacity { .. })
        ));
        assert!(matches!(
            Dispatcher::new("", VentEquipment::default(), KiloWattHours(60.0)),
            Err(ConfigError::Empty { .. })
        ));
    }

    #[test]
    fn routes_by_exact_topic() {
        let router = TopicRouter::new("/dolphinc/", VentEquipment::default()).unwrap();

        assert_eq!(router.classify("/dolphinc/SOC"), Some(TopicClass::RealTimeSoc));
        assert_eq!(router.classify("/dolphinc"), Some(TopicClass::StatusReport));
        assert_eq!(router.classify("/dolphinc/fanspeed"), Some(TopicClass::FanSpeed));
        assert_eq!(router.classify("/dolphinc/sunroof/position"), Some(TopicClass::SunroofPosition));
        assert_eq!(router.classify("/dolphinc/soc"), None);
        assert_eq!(router.classify("/dolphinc/drivervent"), None);
        assert_eq!(router.subscription(), "/dolphinc/#");
    }

    #[test]
    fn command_topic_below_base_is_recognized() {
        let router = TopicRouter::new("/dolphinc", VentEquipment::default())
            .unwrap()
            .with_command_topic("/dolphinc/command");

        assert!(router.is_command_echo("/dolphinc/command"));
        assert!(!router.is_command_echo("/dolphinc/SOC"));
        assert_eq!(router.classify("/dolphinc/command"), None);
    }

    #[test]
    fn vent_topics_are_routed_when_equipped() {
        let router = TopicRouter::new(
            "/dolphinc",
            VentEquipment {
                driver: true,
                passenger: false,
            },
        )
        .unwrap();

        assert_eq!(router.classify("/dolphinc/drivervent"), Some(TopicClass::DriverVent));
        assert_eq!(router.classify("/dolphinc/passengervent"), None);
    }

    #[test]
    fn soc_energy_matches_capacity_share() {
        let mut dispatcher = dispatcher();

        dispatcher.route("/dolphinc/SOC", b"45.5").unwrap();

        let energy = dispatcher.store().get(FieldId::BatteryEnergyKwh).map(|dp| dp.value.clone());
        match energy {
            Some(FieldValue::Energy(kwh)) => assert!((kwh.0 - 45.5 / 100.0 * 60.0).abs() < 1e-9),
            other => panic!("unexpected energy {:?}", other),
        }
    }

    #[test]
    fn unknown_topic_does_not_mutate() {
        let mut dispatcher = dispatcher();
        dispatcher.route("/dolphinc/SOC", b"50").unwrap();
        let before = dispatcher.store().snapshot();

        let result = dispatcher.route("/dolphinc/foo", b"50");

        assert_eq!(
            result,
            Err(DispatchError::UnknownTopic {
                topic: "/dolphinc/foo".to_string()
            })
        );
        assert_eq!(dispatcher.store().snapshot(), before);
    }

    #[test]
    fn malformed_report_leaves_store_untouched() {
        let mut dispatcher = dispatcher();
        dispatcher.route("/dolphinc", REPORT.as_bytes()).unwrap();
        let before = dispatcher.store().snapshot();

        let incomplete = REPORT.replace("车外温度：25℃", "").replace("总里程(km)：12345", "总里程(km)：99999");
        let result = dispatcher.route("/dolphinc", incomplete.as_bytes());

        assert!(matches!(
            result,
            Err(DispatchError::MalformedPayload(DecodeError::MissingLabel { .. }))
        ));
        assert_eq!(dispatcher.store().snapshot(), before);
    }

    #[test]
    fn same_message_twice_changes_nothing_the_second_time() {
        let mut dispatcher = dispatcher();

        assert!(!dispatcher.route("/dolphinc", REPORT.as_bytes()).unwrap().is_empty());
        assert!(dispatcher.route("/dolphinc", REPORT.as_bytes()).unwrap().is_empty());

        assert_eq!(dispatcher.route("/dolphinc/SOC", b"80").unwrap().len(), 2);
        assert!(dispatcher.route("/dolphinc/SOC", b"80").unwrap().is_empty());
    }

    #[test]
    fn topic_classes_are_isolated() {
        let mut dispatcher = dispatcher();
        dispatcher.route("/dolphinc/SOC", b"80").unwrap();
        let soc_before = dispatcher.store().get(FieldId::SocPercent).cloned();

        let changed = dispatcher.route("/dolphinc", REPORT.as_bytes()).unwrap();

        assert!(!changed.contains(&FieldId::SocPercent));
        assert!(!changed.contains(&FieldId::BatteryEnergyKwh));
        assert_eq!(dispatcher.store().get(FieldId::SocPercent).cloned(), soc_before);

        let report_before = dispatcher.store().get(FieldId::OdometerKm).cloned();
        let changed = dispatcher.route("/dolphinc/SOC", b"20").unwrap();

        assert_eq!(changed, vec![FieldId::SocPercent, FieldId::BatteryEnergyKwh]);
        assert_eq!(dispatcher.store().get(FieldId::OdometerKm).cloned(), report_before);
        assert_eq!(
            dispatcher.store().get(FieldId::OdometerKm).map(|dp| dp.value.clone()),
            Some(FieldValue::Distance(Kilometers(12345.0)))
        );
    }
}
