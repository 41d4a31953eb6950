mod decode;
mod derive;
mod dispatcher;
mod domain;
mod store;

pub use domain::*;
pub use store::StateSnapshot;

use dispatcher::{DispatchError, Dispatcher};

use std::sync::Arc;

use infrastructure::{EventBus, EventEmitter, EventListener, MqttInMessage, MqttSubscription, meter};
use tokio::sync::watch;

use crate::{
    car::{CarConfig, ConfigError},
    core::timeseries::DataPoint,
};

#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    Changed {
        car_id: String,
        field: FieldId,
        value: DataPoint<FieldValue>,
    },
}

//Read side of one car's state, cheap to clone
#[derive(Clone)]
pub struct TelemetryClient {
    snapshot_rx: watch::Receiver<StateSnapshot>,
    event_bus: Arc<EventBus<TelemetryEvent>>,
}

pub struct TelemetryRunner {
    car_id: String,
    dispatcher: Dispatcher,
    snapshot_tx: watch::Sender<StateSnapshot>,
    event_bus: Arc<EventBus<TelemetryEvent>>,
    event_tx: EventEmitter<TelemetryEvent>,
}

impl TelemetryRunner {
    pub fn new(car: &CarConfig) -> Result<Self, ConfigError> {
        let dispatcher = Dispatcher::new(&car.subscribe_topic, car.vents, car.max_battery_capacity)?
            .with_command_topic(&car.command_topic);
        let (snapshot_tx, _) = watch::channel(StateSnapshot::default());
        let event_bus = Arc::new(EventBus::new(64));
        let event_tx = event_bus.emitter();

        Ok(Self {
            car_id: car.car_id.clone(),
            dispatcher,
            snapshot_tx,
            event_bus,
            event_tx,
        })
    }

    pub fn client(&self) -> TelemetryClient {
        TelemetryClient {
            snapshot_rx: self.snapshot_tx.subscribe(),
            event_bus: self.event_bus.clone(),
        }
    }

    pub fn subscription_topic(&self) -> String {
        self.dispatcher.router().subscription()
    }

    //Messages of one car are handled strictly one after the other
    pub async fn run(mut self, mut subscription: MqttSubscription) {
        while let Some(msg) = subscription.recv().await {
            self.handle(&msg);
        }

        tracing::warn!("Telemetry subscription of car {} closed", self.car_id);
    }

    pub fn handle(&mut self, msg: &MqttInMessage) {
        if self.dispatcher.router().is_command_echo(&msg.topic) {
            tracing::trace!("Ignoring own command of car {}: {}", self.car_id, msg.payload_lossy());
            return;
        }

        let class = self.dispatcher.router().classify(&msg.topic);
        let class_label = class.map(|c| c.to_string()).unwrap_or_else(|| "unknown".to_string());

        let result = match self.dispatcher.route(&msg.topic, &msg.payload) {
            Ok(changed) => {
                self.publish_changes(&changed);
                "ok"
            }
            Err(e @ DispatchError::UnknownTopic { .. }) => {
                tracing::warn!("Dropping message of car {}: {}", self.car_id, e);
                "unknown_topic"
            }
            Err(e @ DispatchError::MalformedPayload(_)) => {
                tracing::error!(
                    "Dropping message of car {} on {}: {} (payload {:?})",
                    self.car_id,
                    msg.topic,
                    e,
                    msg.payload_lossy()
                );
                "malformed_payload"
            }
        };

        meter::increment(
            "telemetry_messages_total",
            &[
                ("car", self.car_id.as_str()),
                ("topic_class", class_label.as_str()),
                ("result", result),
            ],
        );
    }

    fn publish_changes(&self, changed: &[FieldId]) {
        let store = self.dispatcher.store();

        //timestamps move even without value changes
        self.snapshot_tx.send_replace(store.snapshot());

        for field in changed {
            if let Some(dp) = store.get(*field) {
                tracing::debug!("Car {} field {} changed to {}", self.car_id, field, dp.value);

                self.event_tx.send(TelemetryEvent::Changed {
                    car_id: self.car_id.clone(),
                    field: *field,
                    value: dp.clone(),
                });
            }
        }
    }
}

impl TelemetryClient {
    pub fn get(&self, field: FieldId) -> Option<DataPoint<FieldValue>> {
        self.snapshot_rx.borrow().get(field).cloned()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> EventListener<TelemetryEvent> {
        self.event_bus.subscribe()
    }
}
