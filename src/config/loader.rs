//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::LeaveType;

use super::types::{AttendanceConfig, HrConfig, LeaveTypesConfig, PayrollConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── payroll.yaml      # Tax, deduction and overtime settings
/// ├── attendance.yaml   # Daily overtime threshold
/// └── leave_types.yaml  # Leave categories and allotments
/// ```
///
/// `attendance.yaml` and `leave_types.yaml` are optional; missing files fall
/// back to the defaults. `payroll.yaml` is required.
///
/// # Example
///
/// ```no_run
/// use hr_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// let annual = loader.leave_type("annual")?;
/// println!("{} days of {}", annual.annual_allotment, annual.name);
/// # Ok::<(), hr_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: HrConfig,
}

impl ConfigLoader {
    /// Loads and validates configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - `ConfigNotFound` if `payroll.yaml` is missing
    /// - `ConfigParseError` if any present file holds invalid YAML
    /// - `InvalidConfig` if a value fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let defaults = HrConfig::default();

        let payroll = Self::load_yaml::<PayrollConfig>(&path.join("payroll.yaml"))?;

        let attendance_path = path.join("attendance.yaml");
        let attendance = if attendance_path.exists() {
            Self::load_yaml::<AttendanceConfig>(&attendance_path)?
        } else {
            defaults.attendance
        };

        let leave_types_path = path.join("leave_types.yaml");
        let leave_types = if leave_types_path.exists() {
            Self::load_yaml::<LeaveTypesConfig>(&leave_types_path)?.leave_types
        } else {
            defaults.leave_types
        };

        Self::from_config(HrConfig {
            payroll,
            attendance,
            leave_types,
        })
    }

    /// Wraps an in-memory configuration after validating it.
    pub fn from_config(config: HrConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &HrConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> HrConfig {
        self.config
    }

    /// Gets a leave type by its ID.
    pub fn leave_type(&self, id: &str) -> EngineResult<&LeaveType> {
        self.config.leave_type(id)
    }
}
