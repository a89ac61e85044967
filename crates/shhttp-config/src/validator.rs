//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, MAX_CLEAN_INTERVAL_HOURS};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Fold every error into one [`ConfigError`], or hand back the warnings.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        if self.is_valid() {
            return Ok(self.warnings);
        }
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(ConfigError::Invalid(joined))
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration, collecting every problem.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_storage(config, &mut result);
        Self::validate_engine(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        if config.storage.dir.as_os_str().is_empty() {
            result.add_error(ValidationError::new(
                "storage.dir",
                "Storage directory cannot be empty",
            ));
        }
    }

    fn validate_engine(config: &Config, result: &mut ValidationResult) {
        let Some(hours) = config.engine.clean_interval_hours else {
            return;
        };
        if hours > MAX_CLEAN_INTERVAL_HOURS {
            result.add_error(ValidationError::new(
                "engine.clean_interval_hours",
                format!(
                    "Clean interval of {} hours exceeds the maximum of {}",
                    hours, MAX_CLEAN_INTERVAL_HOURS
                ),
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.trim().to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ValidationError::new(
                "logging.level",
                format!(
                    "Unknown level '{}' (expected one of {})",
                    config.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }

        if let Some(dir) = &config.logging.dir {
            let jobs = config.storage.jobs_dir();
            let saved = config.storage.saved_dir();
            if dir.starts_with(&jobs) || dir.starts_with(&saved) {
                result.add_warning(ValidationWarning::new(
                    "logging.dir",
                    "Log directory is inside a job store; it will be ignored by listings but clutters the store",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
