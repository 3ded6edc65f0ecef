//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use rela_core::{Error, Result};
use rela_signal::VoltageCurve;
use rela_spiral::RenderConfig;

/// Complete pipeline configuration: signal derivation plus rendering.
///
/// Defaults live in code; a file or the `RELA_*` environment only has to
/// name the settings it overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaConfig {
    /// Voltage curve for the signal deriver.
    pub signal: VoltageCurve,

    /// Spiral renderer settings.
    pub spiral: RenderConfig,
}

impl RelaConfig {
    /// Load configuration from a file, with `RELA_*` environment overrides.
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("RELA"))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        let cfg: RelaConfig = settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from environment variables only.
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("RELA"))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        let cfg: RelaConfig = settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.signal.epsilon > 0.0) {
            return Err(Error::Config(format!(
                "epsilon must be positive, got {}",
                self.signal.epsilon
            )));
        }
        if !(self.signal.scale > 0.0) {
            return Err(Error::Config(format!(
                "scale must be positive, got {}",
                self.signal.scale
            )));
        }
        self.spiral.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rela_signal::VoltageScaling;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = RelaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.signal.epsilon, 0.1);
        assert_eq!(config.signal.scaling, VoltageScaling::Unscaled);
        assert_eq!(config.spiral.frame_start, 10);
        assert_eq!(config.spiral.frame_stride, 5);
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rela.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[signal]\nepsilon = 0.2\n\n[spiral]\nsweep_turns = 2.0\nframe_start = 5\n"
        )
        .unwrap();

        let config = RelaConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.signal.epsilon, 0.2);
        assert_eq!(config.spiral.sweep_turns, 2.0);
        assert_eq!(config.spiral.frame_start, 5);
        // Untouched settings keep their defaults.
        assert_eq!(config.spiral.frame_stride, 5);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let mut config = RelaConfig::default();
        config.signal.epsilon = 0.0;
        assert!(config.validate().is_err());

        let mut config = RelaConfig::default();
        config.spiral.playback_fps = -1.0;
        assert!(config.validate().is_err());
    }
}
