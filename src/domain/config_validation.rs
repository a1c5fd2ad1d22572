//! Configuration validation.
//!
//! Validates all config fields before a simulation runs. Everything
//! here is fatal: a run never starts on a config the loop cannot
//! trust. Recoverable conditions (unknown stop-loss mode text, an
//! out-of-range percent factor) are deliberately NOT validated here;
//! the loop reports them per bar and continues.

use crate::domain::error::SmacrossError;
use crate::ports::config_port::ConfigPort;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    validate_initial_equity(config)?;
    validate_commission_rate(config)?;
    validate_minimum_commission(config)?;
    validate_stop_loss_percent(config)?;
    validate_window(config, "fast_window")?;
    validate_window(config, "slow_window")?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    validate_directory(config)?;
    validate_code(config)?;
    Ok(())
}

fn validate_initial_equity(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let value = config.get_double("simulation", "initial_equity", 1000.0);
    if value <= 0.0 {
        return Err(SmacrossError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "initial_equity".to_string(),
            reason: "initial_equity must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_commission_rate(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let value = config.get_double("simulation", "commission_rate", 0.0039);
    if !(0.0..1.0).contains(&value) {
        return Err(SmacrossError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "commission_rate".to_string(),
            reason: "commission_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_minimum_commission(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let value = config.get_double("simulation", "minimum_commission", 3.0);
    if value < 0.0 {
        return Err(SmacrossError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "minimum_commission".to_string(),
            reason: "minimum_commission must be non-negative".to_string(),
        });
    }
    Ok(())
}

/// Only rejects non-numeric text. An out-of-range numeric factor is a
/// runtime condition the loop reports, not a config error.
fn validate_stop_loss_percent(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    match config.get_string("simulation", "stop_loss_percent") {
        None => Ok(()),
        Some(s) => match s.trim().parse::<f64>() {
            Ok(_) => Ok(()),
            Err(_) => Err(SmacrossError::ConfigInvalid {
                section: "simulation".to_string(),
                key: "stop_loss_percent".to_string(),
                reason: format!("expected a number, got '{}'", s.trim()),
            }),
        },
    }
}

fn validate_window(config: &dyn ConfigPort, key: &str) -> Result<(), SmacrossError> {
    let default = if key == "fast_window" { 10 } else { 30 };
    let value = config.get_int("simulation", key, default);
    if value < 1 {
        return Err(SmacrossError::ConfigInvalid {
            section: "simulation".to_string(),
            key: key.to_string(),
            reason: format!("{} must be at least 1", key),
        });
    }
    Ok(())
}

fn validate_directory(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    match config.get_string("data", "directory") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SmacrossError::ConfigMissing {
            section: "data".to_string(),
            key: "directory".to_string(),
        }),
    }
}

fn validate_code(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    match config.get_string("data", "code") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SmacrossError::ConfigMissing {
            section: "data".to_string(),
            key: "code".to_string(),
        }),
    }
}
