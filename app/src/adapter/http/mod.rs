use std::path::PathBuf;

use actix_web::{
    HttpResponse, ResponseError,
    web::{self, Json},
};
use derive_more::derive::{Display, Error};
use serde::Deserialize;

use crate::{
    automation::ArtifactWriteError,
    car::{Car, CarRegistry},
    command::{CommandError, CommandExecutionError},
};

pub fn new_routes(cars: CarRegistry) -> actix_web::Scope {
    web::scope("/api/cars/{car_id}")
        .route("/state", web::get().to(get_state))
        .route("/commands", web::post().to(post_command))
        .route("/automations", web::get().to(get_automations))
        .route("/automations", web::post().to(post_automations))
        .app_data(web::Data::new(cars))
}

type CarApiResponse = Result<HttpResponse, CarApiError>;

#[derive(Debug, Error, Display)]
enum CarApiError {
    #[display("Unknown car {car_id}")]
    NotFound { car_id: String },

    #[display("{_0}")]
    InvalidCommand(CommandError),

    #[display("Invalid request body: {_0}")]
    InvalidBody(serde_json::Error),

    #[display("Error publishing command")]
    PublishFailed(anyhow::Error),

    #[display("{_0}")]
    ArtifactWrite(ArtifactWriteError),
}

impl ResponseError for CarApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        tracing::warn!("CarApiError: {:?}", self);

        match self {
            CarApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            CarApiError::InvalidCommand(_) | CarApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            CarApiError::PublishFailed(_) | CarApiError::ArtifactWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CommandExecutionError> for CarApiError {
    fn from(e: CommandExecutionError) -> Self {
        match e {
            CommandExecutionError::Rejected(e) => CarApiError::InvalidCommand(e),
            CommandExecutionError::PublishFailed(e) => CarApiError::PublishFailed(e),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CommandRequest {
    command: String,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    output_path: Option<PathBuf>,
}

fn find_car<'a>(cars: &'a CarRegistry, car_id: &str) -> Result<&'a Car, CarApiError> {
    cars.get(car_id).ok_or_else(|| CarApiError::NotFound {
        car_id: car_id.to_string(),
    })
}

async fn get_state(cars: web::Data<CarRegistry>, car_id: web::Path<String>) -> CarApiResponse {
    let car = find_car(&cars, &car_id)?;

    Ok(HttpResponse::Ok().json(car.telemetry.snapshot()))
}

async fn post_command(
    cars: web::Data<CarRegistry>,
    car_id: web::Path<String>,
    Json(request): Json<CommandRequest>,
) -> CarApiResponse {
    let car = find_car(&cars, &car_id)?;

    let command = car.commands.execute(&request.command, request.value).await?;

    Ok(HttpResponse::Ok().json(command))
}

async fn get_automations(cars: web::Data<CarRegistry>, car_id: web::Path<String>) -> CarApiResponse {
    let car = find_car(&cars, &car_id)?;

    Ok(HttpResponse::Ok().json(car.automations.generate()))
}

async fn post_automations(
    cars: web::Data<CarRegistry>,
    car_id: web::Path<String>,
    body: web::Bytes,
) -> CarApiResponse {
    let car = find_car(&cars, &car_id)?;

    //no body means default location, a body that is not a valid request is rejected
    let output_path = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<GenerateRequest>(&body)
            .map_err(CarApiError::InvalidBody)?
            .output_path
    };

    let written = car
        .automations
        .write(output_path.as_deref())
        .await
        .map_err(CarApiError::ArtifactWrite)?;

    Ok(HttpResponse::Ok().json(written))
}
