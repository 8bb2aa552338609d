use std::path::Path;
use thiserror::Error;

use super::types::PipelineConfig;
use agora_core::AgoraError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read or write file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse or encode JSON: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error(transparent)]
    Agora(#[from] AgoraError),
}

/// Load pipeline configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, PipelineError> {
    let content = std::fs::read_to_string(path)?;
    let config: PipelineConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<PipelineConfig, PipelineError> {
    let config: PipelineConfig = serde_json::from_str(json)?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<PipelineConfig, PipelineError> {
    let default_config = include_str!("pipeline_config.json");
    load_config_from_str(default_config)
}

impl PipelineConfig {
    /// Validate every stage before any work starts
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.population.validate()?;
        self.network.validate()?;
        self.simulation.validate()?;
        self.spillover.validate()?;
        self.contagion.validate()?;

        if self.spillover.window_size > self.simulation.n_periods {
            return Err(AgoraError::configuration(format!(
                "spillover window {} exceeds the {} simulated returns",
                self.spillover.window_size, self.simulation.n_periods
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = load_default_config().unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config =
            load_config_from_str(r#"{"seed": 7, "population": {"n_agents": 12}}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.population.n_agents, 12);
        assert_eq!(config.population.n_assets, 3);
        assert_eq!(config.spillover, agora_spillover::SpilloverConfig::default());
    }

    #[test]
    fn test_malformed_json() {
        let err = load_config_from_str("{ seed: ").unwrap_err();
        assert!(matches!(err, PipelineError::ParseError(_)));
    }

    #[test]
    fn test_window_longer_than_run() {
        let config = load_config_from_str(
            r#"{"simulation": {"n_periods": 10}, "spillover": {"window_size": 20}}"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(PipelineError::Agora(AgoraError::Configuration(_)))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/nonexistent/pipeline.json").unwrap_err();
        assert!(matches!(err, PipelineError::IoError(_)));
    }
}
