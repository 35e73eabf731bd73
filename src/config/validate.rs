//! Configuration validation.

use crate::config::{Config, ModelConfig};
use crate::constants::MAX_INPUT_SIZE;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_input_size(config.model.input_size)?;
    Ok(())
}

/// Validate the model input size.
pub fn validate_input_size(input_size: u32) -> Result<()> {
    if !(1..=MAX_INPUT_SIZE).contains(&input_size) {
        return Err(Error::ConfigValidation {
            message: format!("input_size must be between 1 and {MAX_INPUT_SIZE}, got {input_size}"),
        });
    }
    Ok(())
}

/// Validate a model configuration and check configured files exist.
pub fn validate_model_config(model: &ModelConfig) -> Result<()> {
    validate_input_size(model.input_size)?;

    if let Some(path) = &model.path
        && !path.exists()
    {
        return Err(Error::ModelFileNotFound { path: path.clone() });
    }

    if let Some(labels) = &model.labels
        && !labels.exists()
    {
        return Err(Error::LabelsFileNotFound {
            path: labels.clone(),
        });
    }

    Ok(())
}
