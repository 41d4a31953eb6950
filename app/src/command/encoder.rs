use infrastructure::MqttOutMessage;

use crate::car::{CarConfig, VentEquipment};

use super::{Command, CommandError, CommandKind};

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedCommand {
    pub command: Command,
    pub message: MqttOutMessage,
}

//Every command goes to the same topic, the kind is part of the payload
#[derive(Debug, Clone)]
pub struct CommandEncoder {
    car_name: String,
    car_id: String,
    command_topic: String,
    vents: VentEquipment,
}

impl CommandEncoder {
    pub fn new(car: &CarConfig) -> Self {
        Self {
            car_name: car.name.clone(),
            car_id: car.car_id.clone(),
            command_topic: car.command_topic.clone(),
            vents: car.vents,
        }
    }

    pub fn encode(&self, name: &str, value: f64) -> Result<EncodedCommand, CommandError> {
        let kind = CommandKind::resolve(name, self.vents)?;
        let command = Command::new(kind, value)?;

        Ok(EncodedCommand {
            message: self.frame(&command),
            command,
        })
    }

    fn frame(&self, command: &Command) -> MqttOutMessage {
        MqttOutMessage::transient(
            self.command_topic.clone(),
            format!("{}={}联动={}", self.car_name, self.car_id, command.body()),
        )
    }
}
