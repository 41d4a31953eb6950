mod domain;
mod encoder;

pub use domain::*;
pub use encoder::{CommandEncoder, EncodedCommand};

use std::sync::Arc;

use derive_more::derive::{Display, Error};
use infrastructure::{MqttOutMessage, MqttSender, meter};

use crate::car::CarConfig;

pub trait Publisher {
    async fn publish(&self, msg: MqttOutMessage) -> anyhow::Result<()>;
}

impl Publisher for MqttSender {
    async fn publish(&self, msg: MqttOutMessage) -> anyhow::Result<()> {
        self.send(msg).await
    }
}

#[derive(Debug, Display, Error)]
pub enum CommandExecutionError {
    #[display("Command rejected: {_0}")]
    Rejected(CommandError),

    #[display("Error publishing command")]
    PublishFailed(anyhow::Error),
}

#[derive(Clone)]
pub struct CommandClient<P: Publisher = MqttSender> {
    car_id: String,
    encoder: Arc<CommandEncoder>,
    publisher: P,
}

impl<P: Publisher> CommandClient<P> {
    pub fn new(car: &CarConfig, publisher: P) -> Self {
        Self {
            car_id: car.car_id.clone(),
            encoder: Arc::new(CommandEncoder::new(car)),
            publisher,
        }
    }

    //Nothing is published unless the command is valid for this car
    #[tracing::instrument(skip(self), fields(car = %self.car_id))]
    pub async fn execute(&self, name: &str, value: f64) -> Result<Command, CommandExecutionError> {
        let EncodedCommand { command, message } = self
            .encoder
            .encode(name, value)
            .map_err(CommandExecutionError::Rejected)?;

        tracing::info!("Sending {} command with value {}", command.kind(), command.value());

        self.publisher
            .publish(message)
            .await
            .map_err(CommandExecutionError::PublishFailed)?;

        let kind = command.kind().to_string();
        meter::increment(
            "commands_published_total",
            &[("car", self.car_id.as_str()), ("command", kind.as_str())],
        );

        Ok(command)
    }
}


#[cfg(test)]
mod tests {
    use super::test::RecordingPublisher;
    use super::*;
    use crate::car::test_car;

    #[tokio::test]
    async fn valid_command_is_published() {
        let publisher = RecordingPublisher::default();
        let client = CommandClient::new(&test_car(), publisher.clone());

        let command = client.execute("fan_speed", 3.0).await.unwrap();

        assert_eq!(command, Command::fan_speed(3.0).unwrap());
        assert_eq!(
            publisher.sent(),
            vec![MqttOutMessage::transient(
                "/dolphinc/cmd",
                "BYD Dolphin=1734645381137联动=风量:3"
            )]
        );
    }

    #[tokio::test]
    async fn sunroof_position_is_published() {
        let publisher = RecordingPublisher::default();
        let client = CommandClient::new(&test_car(), publisher.clone());

        client.execute("sunroof_position", 100.0).await.unwrap();
        assert!(client.execute("sunroof_position", 101.0).await.is_err());

        assert_eq!(
            publisher.sent(),
            vec![MqttOutMessage::transient(
                "/dolphinc/cmd",
                "BYD Dolphin=1734645381137联动=开遮阳帘100%"
            )]
        );
    }

    #[tokio::test]
    async fn invalid_command_is_not_published() {
        let publisher = RecordingPublisher::default();
        let client = CommandClient::new(&test_car(), publisher.clone());

        let result = client.execute("ac_temperature", 16.0).await;

        assert!(matches!(
            result,
            Err(CommandExecutionError::Rejected(CommandError::InvalidValue { .. }))
        ));
        assert!(publisher.sent().is_empty());
    }
}
