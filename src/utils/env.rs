// src/utils/env.rs
use log::{info, warn};
use std::path::Path;

const ENV_PATHS: [&str; 3] = [".env", ".env.local", "../.env"];

/// What [`load_env`] did. It runs before the logger exists (so `RUST_LOG`
/// can come from the file); call [`EnvLoad::log`] once logging is up.
#[derive(Debug, Default)]
pub struct EnvLoad {
    pub loaded_from: Option<String>,
    pub failures: Vec<(String, String)>,
}

impl EnvLoad {
    pub fn log(&self) {
        for (path, error) in &self.failures {
            warn!("Failed to load environment from {}: {}", path, error);
        }
        match &self.loaded_from {
            Some(path) => info!("Loaded environment variables from {}", path),
            None => info!("No .env file found, using environment variables from system"),
        }
    }
}

/// Load the first env file found. Variables already set in the process win.
pub fn load_env() -> EnvLoad {
    load_env_from(&ENV_PATHS)
}

pub fn load_env_from<P: AsRef<Path>>(paths: &[P]) -> EnvLoad {
    let mut outcome = EnvLoad::default();
    for path in paths.iter().map(AsRef::as_ref) {
        if !path.exists() {
            continue;
        }
        match dotenv::from_path(path) {
            Ok(()) => {
                outcome.loaded_from = Some(path.display().to_string());
                break;
            }
            Err(e) => outcome
                .failures
                .push((path.display().to_string(), e.to_string())),
        }
    }
    outcome
}
