//! Game and training settings.
//!
//! Settings are resolved once at start-up: built-in defaults, then an
//! optional JSON file, then `FLAPPY_<FIELD>` environment overrides. The
//! result is validated before the first generation runs and never changes
//! afterwards.

use crate::trainer::TrainerConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix of environment variables that override top-level settings.
pub const ENV_PREFIX: &str = "FLAPPY_";

/// File name looked up in the platform config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("environment override {var}={value:?} does not fit that setting")]
    EnvOverride { var: String, value: String },

    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{low_field} ({low}) must be below {high_field} ({high})")]
    InvertedRange {
        low_field: &'static str,
        low: f64,
        high_field: &'static str,
        high: f64,
    },

    #[error("{field} must lie in [0, 1] (got {value})")]
    NotAProbability { field: &'static str, value: f64 },

    #[error("elitism ({elitism}) cannot exceed the population size ({population})")]
    ElitismTooLarge { elitism: usize, population: usize },
}

/// Every tunable constant of the game and of training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Frame rate used for pacing and for the fitness clock.
    pub fps: u32,
    /// A generation ends once the lead bird has passed this many pipes.
    pub max_score: u32,
    pub max_generations: u32,
    pub screen_width: u32,
    pub screen_height: u32,

    // Floor
    pub floor_velocity: f64,
    pub floor_y: f64,

    // Pipes
    pub pipe_count: usize,
    pub pipe_vertical_gap: f64,
    /// Distance between the left edges of consecutive pipes.
    pub pipe_horizontal_gap: f64,
    pub pipe_velocity: f64,
    /// Lower bound (inclusive) of the top pipe height.
    pub pipe_top_min_height: i32,
    /// Upper bound (exclusive) of the top pipe height.
    pub pipe_top_max_height: i32,
    pub pipe_start_x: f64,
    /// Move pipes that scrolled off-screen back in front of the others.
    /// Off by default: the pool is fixed and a run ends when it is used up.
    pub pipe_recycle: bool,

    // Bird
    pub bird_max_up_angle: f64,
    pub bird_max_down_angle: f64,
    pub bird_min_incremental_angle: f64,
    pub bird_angular_acceleration: f64,
    /// Frames each flap sprite is shown.
    pub bird_animation_time: u32,
    pub bird_jump_velocity: f64,
    pub bird_acceleration: f64,
    pub bird_max_displacement: f64,
    pub bird_start_x: f64,
    pub bird_start_y: f64,

    // Agents
    /// A controller output above this value makes the bird jump.
    pub jump_threshold: f64,
    /// Subtracted from the fitness of a bird on the frame it fails.
    pub failed_penalty: f64,

    pub trainer: TrainerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: 60,
            max_score: 1000,
            max_generations: 50,
            screen_width: 1000,
            screen_height: 600,

            floor_velocity: 5.0,
            floor_y: 500.0,

            pipe_count: 500,
            pipe_vertical_gap: 200.0,
            pipe_horizontal_gap: 200.0,
            pipe_velocity: 5.0,
            pipe_top_min_height: 100,
            pipe_top_max_height: 300,
            pipe_start_x: 500.0,
            pipe_recycle: false,

            bird_max_up_angle: 35.0,
            bird_max_down_angle: -90.0,
            bird_min_incremental_angle: 5.0,
            bird_angular_acceleration: 0.3,
            bird_animation_time: 1,
            bird_jump_velocity: -8.0,
            bird_acceleration: 3.0,
            bird_max_displacement: 12.0,
            bird_start_x: 150.0,
            bird_start_y: 250.0,

            jump_threshold: 0.8,
            failed_penalty: 10.0,

            trainer: TrainerConfig::default(),
        }
    }
}

impl Settings {
    /// Resolve settings from `path` (or the platform default file, if it
    /// exists) and the process environment, then validate them.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_settings_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        settings.apply_env(std::env::vars())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading settings from {}", path.display());
        Self::from_json(&text)
    }

    /// Parse a (possibly partial) JSON document; missing keys keep defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply `FLAPPY_<FIELD>` overrides from `vars`.
    ///
    /// Only top-level scalar fields can be overridden; unknown names are
    /// ignored. Values are parsed as JSON scalars (`60`, `0.5`, `true`).
    pub fn apply_env<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut current = serde_json::to_value(&*self)?;

        for (var, raw) in vars {
            let Some(name) = var.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = name.to_ascii_lowercase();
            let slot_is_scalar = matches!(
                current.get(&key),
                Some(Value::Number(_) | Value::Bool(_))
            );
            if !slot_is_scalar {
                log::debug!("Ignoring unknown setting override {var}");
                continue;
            }

            let rejected = || ConfigError::EnvOverride {
                var: var.clone(),
                value: raw.clone(),
            };
            let parsed: Value = serde_json::from_str(raw.trim()).map_err(|_| rejected())?;

            let mut candidate = current.clone();
            candidate[key.as_str()] = parsed;
            serde_json::from_value::<Settings>(candidate.clone()).map_err(|_| rejected())?;

            log::info!("Setting {key} overridden from environment: {raw}");
            current = candidate;
        }

        *self = serde_json::from_value(current)?;
        Ok(())
    }

    /// Reject settings the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("fps", self.fps as f64)?;
        positive("max_score", self.max_score as f64)?;
        positive("max_generations", self.max_generations as f64)?;
        positive("screen_width", self.screen_width as f64)?;
        positive("screen_height", self.screen_height as f64)?;
        positive("floor_y", self.floor_y)?;
        positive("pipe_count", self.pipe_count as f64)?;
        positive("pipe_vertical_gap", self.pipe_vertical_gap)?;
        positive("pipe_horizontal_gap", self.pipe_horizontal_gap)?;
        positive("bird_max_displacement", self.bird_max_displacement)?;
        positive("bird_animation_time", self.bird_animation_time as f64)?;
        positive("floor_velocity", self.floor_velocity)?;
        positive("pipe_velocity", self.pipe_velocity)?;
        positive("bird_acceleration", self.bird_acceleration)?;
        positive("bird_min_incremental_angle", self.bird_min_incremental_angle)?;
        non_negative("bird_angular_acceleration", self.bird_angular_acceleration)?;

        if self.pipe_top_min_height >= self.pipe_top_max_height {
            return Err(ConfigError::InvertedRange {
                low_field: "pipe_top_min_height",
                low: self.pipe_top_min_height as f64,
                high_field: "pipe_top_max_height",
                high: self.pipe_top_max_height as f64,
            });
        }
        if self.bird_max_down_angle >= self.bird_max_up_angle {
            return Err(ConfigError::InvertedRange {
                low_field: "bird_max_down_angle",
                low: self.bird_max_down_angle,
                high_field: "bird_max_up_angle",
                high: self.bird_max_up_angle,
            });
        }

        self.trainer.validate()
    }

    /// Seconds of simulated time per frame.
    pub fn frame_seconds(&self) -> f64 {
        1.0 / self.fps as f64
    }
}

/// `<platform config dir>/settings.json`, if the platform has one.
pub fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "flappy-neuro").map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

pub(crate) fn probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotAProbability { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.fps, 60);
        assert_eq!(settings.pipe_count, 500);
        assert!((settings.jump_threshold - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "fps": 30, "trainer": { "population_size": 8 } }"#)
            .unwrap();
        assert_eq!(settings.fps, 30);
        assert_eq!(settings.trainer.population_size, 8);
        assert_eq!(settings.max_score, 1000);
        assert_eq!(settings.trainer.elitism, TrainerConfig::default().elitism);
    }

    #[test]
    fn test_misspelled_key_is_rejected() {
        let err = Settings::from_json(r#"{ "fsp": 30 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("fsp"));

        let err = Settings::from_json(r#"{ "trainer": { "populaton_size": 8 } }"#).unwrap_err();
        assert!(err.to_string().contains("populaton_size"));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = Settings::from_json("{ fps: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_inverted_pipe_band_rejected() {
        let settings = Settings {
            pipe_top_min_height: 300,
            pipe_top_max_height: 100,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvertedRange {
                low_field: "pipe_top_min_height",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_pipe_band_rejected() {
        let settings = Settings {
            pipe_top_min_height: 200,
            pipe_top_max_height: 200,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_inverted_angles_rejected() {
        let settings = Settings {
            bird_max_up_angle: -90.0,
            bird_max_down_angle: 35.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvertedRange {
                low_field: "bird_max_down_angle",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_easing_rejected() {
        let settings = Settings {
            bird_angular_acceleration: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Negative {
                field: "bird_angular_acceleration",
                ..
            })
        ));

        let settings = Settings {
            bird_min_incremental_angle: -50.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NotPositive {
                field: "bird_min_incremental_angle",
                ..
            })
        ));
    }

    #[test]
    fn test_backwards_scrolling_rejected() {
        for (field, settings) in [
            (
                "floor_velocity",
                Settings {
                    floor_velocity: -5.0,
                    ..Default::default()
                },
            ),
            (
                "pipe_velocity",
                Settings {
                    pipe_velocity: 0.0,
                    ..Default::default()
                },
            ),
            (
                "bird_acceleration",
                Settings {
                    bird_acceleration: -3.0,
                    ..Default::default()
                },
            ),
        ] {
            match settings.validate() {
                Err(ConfigError::NotPositive { field: f, .. }) => assert_eq!(f, field),
                other => panic!("{field}: expected NotPositive, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_zero_fps_rejected() {
        let settings = Settings {
            fps: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NotPositive { field: "fps", .. })
        ));
    }

    #[test]
    fn test_env_override_applies() {
        let mut settings = Settings::default();
        settings
            .apply_env(env(&[
                ("FLAPPY_FPS", "30"),
                ("FLAPPY_PIPE_RECYCLE", "true"),
                ("FLAPPY_FAILED_PENALTY", "2.5"),
                ("HOME", "/root"),
            ]))
            .unwrap();
        assert_eq!(settings.fps, 30);
        assert!(settings.pipe_recycle);
        assert!((settings.failed_penalty - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_env_override_ignores_unknown_and_nested_keys() {
        let mut settings = Settings::default();
        settings
            .apply_env(env(&[("FLAPPY_NOT_A_SETTING", "1"), ("FLAPPY_TRAINER", "3")]))
            .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_env_override_with_wrong_type_rejected() {
        let mut settings = Settings::default();
        let err = settings
            .apply_env(env(&[("FLAPPY_FPS", "fast")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvOverride { .. }));

        let err = settings
            .apply_env(env(&[("FLAPPY_FPS", "-3")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvOverride { .. }));
    }

    #[test]
    fn test_from_missing_file_reports_path() {
        let path = Path::new("/definitely/not/here/settings.json");
        let err = Settings::from_file(path).unwrap_err();
        assert!(err.to_string().contains("settings.json"));
    }

    #[test]
    fn test_frame_seconds() {
        let settings = Settings::default();
        assert!((settings.frame_seconds() - 1.0 / 60.0).abs() < 1e-12);
    }
}
