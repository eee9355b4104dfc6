//! Odometry configuration
//!
//! Two deployments ship as presets:
//!
//! | Preset       | wheelbase | zero delta  | reset channel |
//! |--------------|-----------|-------------|---------------|
//! | `Resettable` | 0.428 m   | republish   | yes           |
//! | `Streaming`  | 0.43 m    | integrate   | no            |
//!
//! A config can also be loaded from a YAML file shaped like the struct, or
//! from the `odometry.*` keys of [`RuntimeParams`].

use crate::algorithms::differential_drive::WheelGeometry;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tread_core::error::{TreadError, TreadResult};
use tread_core::params::RuntimeParams;

pub use crate::algorithms::odometry::ZeroDeltaPolicy;

pub const DEFAULT_ENCODER_TOPIC: &str = "rss/encoder";
pub const DEFAULT_ODOMETRY_TOPIC: &str = "rss/odometry";
pub const DEFAULT_RESET_TOPIC: &str = "rss/odometry_update";

/// Named deployment variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigPreset {
    /// Accepts reset commands, republishes on zero motion
    #[default]
    Resettable,
    /// No reset channel, integrates every sample
    Streaming,
}

impl FromStr for ConfigPreset {
    type Err = TreadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "resettable" => Ok(Self::Resettable),
            "streaming" => Ok(Self::Streaming),
            other => Err(TreadError::config(format!(
                "unknown preset '{}' (expected 'resettable' or 'streaming')",
                other
            ))),
        }
    }
}

/// Topic names the odometry node connects to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicNames {
    pub encoder: String,
    pub odometry: String,
    pub reset: String,
}

impl Default for TopicNames {
    fn default() -> Self {
        Self {
            encoder: DEFAULT_ENCODER_TOPIC.to_string(),
            odometry: DEFAULT_ODOMETRY_TOPIC.to_string(),
            reset: DEFAULT_RESET_TOPIC.to_string(),
        }
    }
}

/// Everything needed to build an `OdometryNode`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OdometryConfig {
    pub geometry: WheelGeometry,
    pub zero_delta_policy: ZeroDeltaPolicy,
    /// Subscribe to reset commands
    pub reset_channel: bool,
    pub topics: TopicNames,
}

impl Default for OdometryConfig {
    fn default() -> Self {
        Self::preset(ConfigPreset::default())
    }
}

impl OdometryConfig {
    pub fn preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Resettable => Self {
                geometry: WheelGeometry::new(0.0625, 2000.0, 65.5, 0.428),
                zero_delta_policy: ZeroDeltaPolicy::Republish,
                reset_channel: true,
                topics: TopicNames::default(),
            },
            ConfigPreset::Streaming => Self {
                geometry: WheelGeometry::new(0.0625, 2000.0, 65.5, 0.43),
                zero_delta_policy: ZeroDeltaPolicy::Integrate,
                reset_channel: false,
                topics: TopicNames::default(),
            },
        }
    }

    /// Check kinematic constants and topic names
    pub fn validate(&self) -> TreadResult<()> {
        self.geometry.validate()?;

        let mut topics = vec![&self.topics.encoder, &self.topics.odometry];
        if self.reset_channel {
            topics.push(&self.topics.reset);
        }
        if topics.iter().any(|topic| topic.is_empty()) {
            return Err(TreadError::config("topic names must not be empty"));
        }
        for (i, topic) in topics.iter().enumerate() {
            if topics[i + 1..].contains(topic) {
                return Err(TreadError::config(format!(
                    "topic '{}' is used for more than one channel",
                    topic
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a YAML document. Missing fields take the
    /// `Resettable` defaults.
    pub fn from_yaml_str(yaml: &str) -> TreadResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> TreadResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&yaml)?;
        log::debug!("loaded odometry config from {}", path.display());
        Ok(config)
    }

    /// Overlay the `odometry.*` parameters on a preset.
    ///
    /// Recognized keys: `wheel_radius`, `encoder_resolution`, `gear_ratio`,
    /// `wheelbase`, `zero_delta_policy`, `reset_channel`, `encoder_topic`,
    /// `odometry_topic`, `reset_topic`. A present key of the wrong type is a
    /// configuration error.
    pub fn from_params(params: &RuntimeParams, preset: ConfigPreset) -> TreadResult<Self> {
        let mut config = Self::preset(preset);

        overlay(params, "odometry.wheel_radius", &mut config.geometry.wheel_radius)?;
        overlay(
            params,
            "odometry.encoder_resolution",
            &mut config.geometry.encoder_resolution,
        )?;
        overlay(params, "odometry.gear_ratio", &mut config.geometry.gear_ratio)?;
        overlay(params, "odometry.wheelbase", &mut config.geometry.wheelbase)?;
        overlay(
            params,
            "odometry.zero_delta_policy",
            &mut config.zero_delta_policy,
        )?;
        overlay(params, "odometry.reset_channel", &mut config.reset_channel)?;
        overlay(params, "odometry.encoder_topic", &mut config.topics.encoder)?;
        overlay(params, "odometry.odometry_topic", &mut config.topics.odometry)?;
        overlay(params, "odometry.reset_topic", &mut config.topics.reset)?;

        config.validate()?;
        Ok(config)
    }
}

fn overlay<T: for<'de> Deserialize<'de>>(
    params: &RuntimeParams,
    key: &str,
    target: &mut T,
) -> TreadResult<()> {
    if params.has(key) {
        *target = params.require(key)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let resettable = OdometryConfig::preset(ConfigPreset::Resettable);
        assert_eq!(resettable.geometry.wheelbase, 0.428);
        assert_eq!(resettable.zero_delta_policy, ZeroDeltaPolicy::Republish);
        assert!(resettable.reset_channel);
        assert_eq!(OdometryConfig::default(), resettable);

        let streaming = OdometryConfig::preset(ConfigPreset::Streaming);
        assert_eq!(streaming.geometry.wheelbase, 0.43);
        assert_eq!(streaming.zero_delta_policy, ZeroDeltaPolicy::Integrate);
        assert!(!streaming.reset_channel);
        assert_eq!(streaming.topics.encoder, "rss/encoder");
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(
            "Streaming".parse::<ConfigPreset>().unwrap(),
            ConfigPreset::Streaming
        );
        assert!("turbo".parse::<ConfigPreset>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_constants() {
        let mut config = OdometryConfig::default();
        config.geometry.gear_ratio = -65.5;
        assert!(matches!(config.validate(), Err(TreadError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_shared_topics() {
        let mut config = OdometryConfig::default();
        config.topics.reset = config.topics.odometry.clone();
        assert!(config.validate().is_err());

        // The reset topic is irrelevant without the reset channel
        config.reset_channel = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_document() {
        let yaml = "geometry:\n  wheel_radius: 0.05\n  encoder_resolution: 1024\n  gear_ratio: 30\n  wheelbase: 0.3\nzero_delta_policy: integrate\n";
        let config = OdometryConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.geometry, WheelGeometry::new(0.05, 1024.0, 30.0, 0.3));
        assert_eq!(config.zero_delta_policy, ZeroDeltaPolicy::Integrate);
        assert!(config.reset_channel);
        assert_eq!(config.topics, TopicNames::default());
    }

    #[test]
    fn test_yaml_file_with_invalid_constant() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odometry.yaml");
        std::fs::write(
            &path,
            "geometry:\n  wheel_radius: 0.0\n  encoder_resolution: 2000\n  gear_ratio: 65.5\n  wheelbase: 0.43\n",
        )
        .unwrap();

        assert!(matches!(
            OdometryConfig::from_yaml_file(&path),
            Err(TreadError::Config(_))
        ));
    }

    #[test]
    fn test_from_params_overlays_preset() {
        let params = RuntimeParams::with_defaults();
        params.set("odometry.wheelbase", 0.5).unwrap();
        params.set("odometry.zero_delta_policy", "integrate").unwrap();
        params.set("odometry.reset_topic", "robot/reset").unwrap();

        let config = OdometryConfig::from_params(&params, ConfigPreset::Resettable).unwrap();

        assert_eq!(config.geometry.wheelbase, 0.5);
        assert_eq!(config.geometry.wheel_radius, 0.0625);
        assert_eq!(config.zero_delta_policy, ZeroDeltaPolicy::Integrate);
        assert_eq!(config.topics.reset, "robot/reset");
    }

    #[test]
    fn test_from_params_wrong_type() {
        let params = RuntimeParams::with_defaults();
        params.set("odometry.reset_channel", "sometimes").unwrap();

        assert!(matches!(
            OdometryConfig::from_params(&params, ConfigPreset::Resettable),
            Err(TreadError::Config(_))
        ));
    }
}
