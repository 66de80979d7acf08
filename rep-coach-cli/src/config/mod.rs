use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rep_coach::models::ExerciseType;
use rep_coach::{PipelineConfig, ThresholdTable};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Per-exercise threshold overrides keyed by exercise (`squat`, `push-up`, ...)
    #[serde(default)]
    pub thresholds: BTreeMap<String, BTreeMap<String, f32>>,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            color: default_true(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.rep-coach/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".rep-coach"))
    }

    /// Get config file path, honouring an explicit override
    pub fn config_file(custom: Option<&Path>) -> Result<PathBuf> {
        match custom {
            Some(path) => Ok(path.to_path_buf()),
            None => Ok(Self::config_dir()?.join("config.toml")),
        }
    }

    /// Load configuration from file, falling back to defaults when it is absent
    pub fn load(custom: Option<&Path>) -> Result<Self> {
        let config_file = Self::config_file(custom)?;

        if !config_file.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_file)
            .with_context(|| format!("Failed to read config file {}", config_file.display()))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        config
            .pipeline
            .validate()
            .context("Invalid [pipeline] section")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, custom: Option<&Path>) -> Result<PathBuf> {
        let config_file = Self::config_file(custom)?;
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_file, contents).context("Failed to write config file")?;

        Ok(config_file)
    }

    /// Pipeline settings with `REP_COACH_*` environment overrides applied
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        self.pipeline.clone().with_env_overrides()
    }

    /// Threshold table for an exercise: defaults, then config file, then `extra`
    pub fn threshold_table(
        &self,
        exercise: &ExerciseType,
        extra: &[(String, f32)],
    ) -> Result<ThresholdTable> {
        let mut overrides = self
            .thresholds
            .get(exercise.config_key())
            .cloned()
            .unwrap_or_default();
        overrides.extend(extra.iter().cloned());

        ThresholdTable::with_overrides(exercise, &overrides)
            .with_context(|| format!("Invalid thresholds for {}", exercise))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pipeline.reset_delay_frames, 10);
        assert!(config.pipeline.use_filtered_angles);
        assert!(config.thresholds.is_empty());
        assert!(config.ui.color);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config
            .thresholds
            .entry("squat".to_string())
            .or_default()
            .insert("kneeAngleStart".to_string(), 110.0);

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [pipeline]
            reset_delay_frames = 20

            [thresholds.push-up]
            elbowAngleStart = 85.0
            "#,
        )
        .unwrap();

        assert_eq!(config.pipeline.reset_delay_frames, 20);
        assert_eq!(config.pipeline.min_landmark_confidence, 0.5);
        assert!(config.ui.color);

        let table = config
            .threshold_table(&ExerciseType::PushUp, &[])
            .unwrap();
        assert_eq!(table.get("elbowAngleStart").unwrap(), 85.0);
        assert_eq!(table.get("elbowAngleEnd").unwrap(), 110.0);
    }

    #[test]
    fn test_command_line_overrides_win() {
        let mut config = Config::default();
        config
            .thresholds
            .entry("squat".to_string())
            .or_default()
            .insert("kneeAngleStart".to_string(), 110.0);

        let table = config
            .threshold_table(
                &ExerciseType::Squat,
                &[("kneeAngleStart".to_string(), 100.0)],
            )
            .unwrap();
        assert_eq!(table.get("kneeAngleStart").unwrap(), 100.0);
    }

    #[test]
    fn test_unknown_key_in_file_is_rejected() {
        let mut config = Config::default();
        config
            .thresholds
            .entry("lunge".to_string())
            .or_default()
            .insert("kneeAngle".to_string(), 90.0);

        assert!(config.threshold_table(&ExerciseType::Lunge, &[]).is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }
}
