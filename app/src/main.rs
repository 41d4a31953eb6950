use std::sync::Arc;

use anyhow::Context as _;
use futures::future::join_all;
use infrastructure::{Mqtt, MqttSubscription};
use settings::Settings;

use crate::{
    adapter::metrics_export::TelemetryMetricsExporter,
    automation::AutomationService,
    car::{Car, CarConfig, CarRegistry},
    command::CommandClient,
    telemetry::TelemetryRunner,
};

mod adapter;
mod automation;
mod car;
mod command;
mod core;
mod settings;
mod telemetry;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() {
    let settings = Settings::new().expect("Error reading configuration");

    settings.monitoring.init().expect("Error initializing monitoring");

    //invalid car setup aborts before anything is subscribed
    let car_configs = car::validate_all(&settings.cars).expect("Invalid car configuration");
    if car_configs.is_empty() {
        tracing::warn!("No cars configured");
    }

    let mut mqtt_client = settings.mqtt.new_client();

    let mut cars = vec![];
    let mut telemetry_runners = vec![];
    let mut metrics_exporters = vec![];

    for config in car_configs {
        let (car, runner, subscription) =
            setup_car(config, &settings, &mut mqtt_client).expect("Error setting up car");

        metrics_exporters.push(TelemetryMetricsExporter::new(car.telemetry.subscribe()).run());
        cars.push(car);
        telemetry_runners.push(runner.run(subscription));
    }

    let registry = CarRegistry::new(cars);

    let http_server_exec = {
        let registry = registry.clone();

        async move {
            settings
                .http_server
                .run_server(move || vec![adapter::http::new_routes(registry.clone())])
                .await
                .expect("HTTP server execution failed");
        }
    };

    tracing::info!("Starting main loop");

    tokio::select!(
        _ = mqtt_client.run() => {},
        _ = join_all(telemetry_runners) => {},
        _ = join_all(metrics_exporters) => {},
        _ = http_server_exec => {},
    );
}

fn setup_car(
    config: CarConfig,
    settings: &Settings,
    mqtt_client: &mut Mqtt,
) -> anyhow::Result<(Car, TelemetryRunner, MqttSubscription)> {
    let runner = TelemetryRunner::new(&config).with_context(|| format!("Error routing topics of car {}", config.car_id))?;
    let subscription = mqtt_client.subscribe(runner.subscription_topic());

    tracing::info!(
        "Car {} ({}) listening on {}, commands to {}",
        config.name,
        config.car_id,
        runner.subscription_topic(),
        config.command_topic
    );

    let car = Car {
        telemetry: runner.client(),
        commands: CommandClient::new(&config, mqtt_client.sender()),
        automations: AutomationService::new(config.generator.clone(), &settings.automation),
        config: Arc::new(config),
    };

    Ok((car, runner, subscription))
}
