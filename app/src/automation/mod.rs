mod domain;
mod generator;
mod writer;

pub use domain::*;
pub use generator::generate;
pub use writer::ArtifactWriteError;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct AutomationSettings {
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrittenArtifact {
    pub path: PathBuf,
    pub entries: usize,
}

#[derive(Clone)]
pub struct AutomationService {
    config: Arc<GeneratorConfig>,
    output_dir: PathBuf,
}

impl AutomationService {
    pub fn new(config: GeneratorConfig, settings: &AutomationSettings) -> Self {
        Self {
            config: Arc::new(config),
            output_dir: settings.output_dir.clone(),
        }
    }

    pub fn generate(&self) -> Vec<AutomationTask> {
        generate(&self.config)
    }

    //Safe to repeat, every call rewrites the whole file
    #[tracing::instrument(skip(self), fields(base_topic = %self.config.base_topic))]
    pub async fn write(&self, path_override: Option<&Path>) -> Result<WrittenArtifact, ArtifactWriteError> {
        let tasks = self.generate();
        let content = serde_json::to_vec_pretty(&tasks).map_err(ArtifactWriteError::Serialize)?;
        let path = writer::resolve_path(&self.output_dir, path_override);

        let target = path.clone();
        tokio::task::spawn_blocking(move || writer::write_atomically(&target, &content))
            .await
            .map_err(ArtifactWriteError::Join)??;

        tracing::info!("Wrote {} automations to {}", tasks.len(), path.display());

        Ok(WrittenArtifact {
            path,
            entries: tasks.len(),
        })
    }
}
