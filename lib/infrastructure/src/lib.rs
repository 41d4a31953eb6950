mod bus;
mod http;
mod monitoring;
mod mqtt;

pub use bus::{EventBus, EventEmitter, EventListener};

pub use monitoring::MonitoringConfig;

pub use http::server::HttpServerConfig;
pub use mqtt::{Mqtt, MqttConfig, MqttInMessage, MqttOutMessage, MqttSender, MqttSubscription};

pub mod meter {
    pub use super::monitoring::meter::{increment, set};
}
