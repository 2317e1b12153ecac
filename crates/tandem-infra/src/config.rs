//! Orchestrator configuration loading.

use std::io::ErrorKind;
use std::path::Path;

use tandem_types::config::OrchestratorConfig;
use tokio::fs;
use tracing::{debug, warn};

/// Load `tandem.toml` from the data directory.
///
/// A missing file is normal and yields the default configuration; an
/// unreadable or malformed file is logged and also falls back to the
/// defaults rather than taking the service down.
pub async fn load_config(data_dir: &Path) -> OrchestratorConfig {
    let path = data_dir.join("tandem.toml");

    match fs::read_to_string(&path).await {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to parse config file, using defaults");
                OrchestratorConfig::default()
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No config file found, using defaults");
            OrchestratorConfig::default()
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Failed to read config file, using defaults");
            OrchestratorConfig::default()
        }
    }
}
