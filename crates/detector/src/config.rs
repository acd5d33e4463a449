// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Detector Configuration
//!
//! This module selects and parameterizes an error detector.
//!
//! ## Configuration Sources
//!
//! - JSON or YAML documents, tagged by `kind`
//! - The short form used on interactive-session command lines
//!
//! | short form    | detector                                   |
//! |---------------|--------------------------------------------|
//! | `sim`         | simulated (oracle) detector                |
//! | `any`         | probability detector flagging every unit   |
//! | `prob=0.95`   | probability detector, threshold 0.95       |
//! | `stddev=0.03` | dropout detector, stddev threshold 0.03    |
//! | `fnn=<path>`  | learned detector loaded from a model file  |
//!
//! ## Example
//!
//! ```rust
//! use misp_sql_detector::DetectorConfig;
//!
//! let config = DetectorConfig::from_yaml_str("kind: prob\nthreshold: 0.95\n").unwrap();
//! assert_eq!(config, "prob=0.95".parse().unwrap());
//! let detector = config.build().unwrap();
//! assert_eq!(detector.policy().name(), "probability");
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::detector::ErrorDetector;
use crate::error::DetectorError;
use crate::fnn::SerializedModelInfo;

/// Probability threshold above every possible probability
pub const ASK_ANY_THRESHOLD: f64 = 1.1;

/// Which detector to build and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectorConfig {
    /// Oracle detector; ground truth is supplied per call
    Sim,
    /// Probability-threshold detector
    Prob { threshold: f64 },
    /// Bayesian-dropout detector
    BayesDropout { threshold: f64 },
    /// Learned detector with a serialized feed-forward model
    Fnn { model_path: PathBuf },
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig::Prob { threshold: 0.95 }
    }
}

impl DetectorConfig {
    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Decode(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML configuration document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Decode(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, choosing the format by extension
    ///
    /// Relative model paths are resolved against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = match extension.as_str() {
            "json" => Self::from_json_str(&content)?,
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        Ok(match config {
            DetectorConfig::Fnn { model_path } if model_path.is_relative() => {
                let base = path.parent().unwrap_or_else(|| Path::new(""));
                DetectorConfig::Fnn {
                    model_path: base.join(model_path),
                }
            }
            other => other,
        })
    }

    /// Validate the configuration
    ///
    /// Checks that thresholds are finite and non-negative and that a model
    /// path is given for the learned detector.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            DetectorConfig::Sim => Ok(()),
            DetectorConfig::Prob { threshold } => check_threshold("prob", *threshold),
            DetectorConfig::BayesDropout { threshold } => check_threshold("bayes_dropout", *threshold),
            DetectorConfig::Fnn { model_path } => {
                if model_path.as_os_str().is_empty() {
                    Err(ConfigError::InvalidSpec("fnn detector needs a model path".to_string()))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Build the configured detector
    ///
    /// The learned detector's model file is read here.
    pub fn build(&self) -> Result<ErrorDetector, ConfigError> {
        self.validate()?;
        let detector = match self {
            DetectorConfig::Sim => ErrorDetector::simulated(),
            DetectorConfig::Prob { threshold } => ErrorDetector::probability(*threshold)?,
            DetectorConfig::BayesDropout { threshold } => ErrorDetector::bayes_dropout(*threshold)?,
            DetectorConfig::Fnn { model_path } => {
                let mi = SerializedModelInfo::from_file(model_path)?;
                ErrorDetector::learned(&mi)?
            }
        };
        tracing::info!(detector = detector.policy().name(), "built error detector");
        Ok(detector)
    }
}

fn check_threshold(kind: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { kind, value })
    }
}

impl FromStr for DetectorConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let config = match s {
            "sim" => DetectorConfig::Sim,
            "any" => DetectorConfig::Prob {
                threshold: ASK_ANY_THRESHOLD,
            },
            _ => {
                let (name, value) = s
                    .split_once('=')
                    .ok_or_else(|| ConfigError::InvalidSpec(s.to_string()))?;
                let parse = |v: &str| {
                    v.trim()
                        .parse::<f64>()
                        .map_err(|_| ConfigError::InvalidSpec(s.to_string()))
                };
                match name.trim() {
                    "prob" => DetectorConfig::Prob {
                        threshold: parse(value)?,
                    },
                    "stddev" => DetectorConfig::BayesDropout {
                        threshold: parse(value)?,
                    },
                    "fnn" => DetectorConfig::Fnn {
                        model_path: PathBuf::from(value.trim()),
                    },
                    _ => return Err(ConfigError::InvalidSpec(s.to_string())),
                }
            }
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Threshold is negative or not a number
    #[error("Invalid {kind} threshold: {value}")]
    InvalidThreshold { kind: &'static str, value: f64 },

    /// Unrecognized detector specification
    #[error("Invalid detector specification: '{0}'")]
    InvalidSpec(String),

    /// Configuration file extension is not json, yaml or yml
    #[error("Unsupported configuration format: '{0}'")]
    UnsupportedFormat(String),

    /// Failed to read a file
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// Failed to decode a configuration or model document
    #[error("Failed to decode: {0}")]
    Decode(String),

    /// Model file describes an unusable network
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Detector construction failed
    #[error("Detector error: {0}")]
    Detector(#[from] DetectorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_forms() {
        assert_eq!("sim".parse::<DetectorConfig>().unwrap(), DetectorConfig::Sim);
        assert_eq!(
            "any".parse::<DetectorConfig>().unwrap(),
            DetectorConfig::Prob { threshold: 1.1 }
        );
        assert_eq!(
            "prob=0.95".parse::<DetectorConfig>().unwrap(),
            DetectorConfig::Prob { threshold: 0.95 }
        );
        assert_eq!(
            " stddev=0.03 ".parse::<DetectorConfig>().unwrap(),
            DetectorConfig::BayesDropout { threshold: 0.03 }
        );
        assert_eq!(
            "fnn=models/detector.json".parse::<DetectorConfig>().unwrap(),
            DetectorConfig::Fnn {
                model_path: PathBuf::from("models/detector.json")
            }
        );
    }

    #[test]
    fn test_short_form_errors() {
        assert!(matches!("oracle".parse::<DetectorConfig>(), Err(ConfigError::InvalidSpec(_))));
        assert!(matches!("prob=high".parse::<DetectorConfig>(), Err(ConfigError::InvalidSpec(_))));
        assert!(matches!("fnn=".parse::<DetectorConfig>(), Err(ConfigError::InvalidSpec(_))));
        assert!(matches!(
            "stddev=-0.1".parse::<DetectorConfig>(),
            Err(ConfigError::InvalidThreshold { kind: "bayes_dropout", .. })
        ));
    }

    #[test]
    fn test_json_config() {
        let config = DetectorConfig::from_json_str(r#"{"kind": "bayes_dropout", "threshold": 0.05}"#).unwrap();
        assert_eq!(config, DetectorConfig::BayesDropout { threshold: 0.05 });
    }

    #[test]
    fn test_yaml_config() {
        let config = DetectorConfig::from_yaml_str("kind: sim\n").unwrap();
        assert_eq!(config, DetectorConfig::Sim);
    }

    #[test]
    fn test_decode_error() {
        assert!(matches!(
            DetectorConfig::from_json_str(r#"{"kind": "oracle"}"#),
            Err(ConfigError::Decode(_))
        ));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let config = DetectorConfig::Prob { threshold: f64::NAN };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidThreshold { .. })));
        assert!(config.build().is_err());
    }

    #[test]
    fn test_build_threshold_detectors() {
        assert_eq!(DetectorConfig::Sim.build().unwrap().policy().name(), "simulated");
        assert_eq!(DetectorConfig::default().build().unwrap().policy().name(), "probability");
        assert_eq!(
            DetectorConfig::BayesDropout { threshold: 0.1 }.build().unwrap().policy().name(),
            "dropout"
        );
    }

    #[test]
    fn test_build_missing_model_file() {
        let config = DetectorConfig::Fnn {
            model_path: PathBuf::from("/nonexistent/detector.json"),
        };
        assert!(matches!(config.build(), Err(ConfigError::Io { .. })));
    }
}
