use infrastructure::{EventListener, meter::set};

use crate::telemetry::TelemetryEvent;

const CAR: &str = "car";
const FIELD: &str = "field";

pub struct TelemetryMetricsExporter {
    listener: EventListener<TelemetryEvent>,
}

impl TelemetryMetricsExporter {
    pub fn new(listener: EventListener<TelemetryEvent>) -> Self {
        Self { listener }
    }

    //Runs until the car's event bus is gone
    pub async fn run(mut self) {
        while let Some(event) = self.listener.recv().await {
            match event {
                TelemetryEvent::Changed { car_id, field, value } => {
                    let Some(number) = value.value.as_f64() else {
                        continue;
                    };

                    let field = field.to_string();
                    set("car_field_value", number, &[(CAR, car_id.as_str()), (FIELD, field.as_str())]);
                }
            }
        }

        tracing::debug!("Telemetry event bus closed, stopping metrics export");
    }
}
