//! Comparison settings: tolerance tiers and where the two case files live.
//!
//! Every field has a default, so an empty YAML document is a valid config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CompareError;

/// Print and alarm tolerances for the three error metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub ulp_print: u64,
    pub ulp_alarm: u64,
    pub abs_print: f64,
    pub abs_alarm: f64,
    pub rel_print: f64,
    pub rel_alarm: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ulp_print: 4000,
            ulp_alarm: 100_000,
            abs_print: 1e-7,
            abs_alarm: 1e-5,
            rel_print: 1e-4,
            rel_alarm: 1e-2,
        }
    }
}

impl Thresholds {
    /// Check that each tier is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::InvalidThresholds`] if a float threshold is
    /// negative or not finite, or a print threshold exceeds its alarm
    /// threshold.
    pub fn validate(&self) -> Result<(), CompareError> {
        for (name, v) in [
            ("abs_print", self.abs_print),
            ("abs_alarm", self.abs_alarm),
            ("rel_print", self.rel_print),
            ("rel_alarm", self.rel_alarm),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(CompareError::InvalidThresholds(format!(
                    "{name} must be finite and non-negative, got {v}"
                )));
            }
        }
        if self.ulp_print > self.ulp_alarm {
            return Err(CompareError::InvalidThresholds(format!(
                "ulp_print {} exceeds ulp_alarm {}",
                self.ulp_print, self.ulp_alarm
            )));
        }
        if self.abs_print > self.abs_alarm {
            return Err(CompareError::InvalidThresholds(format!(
                "abs_print {} exceeds abs_alarm {}",
                self.abs_print, self.abs_alarm
            )));
        }
        if self.rel_print > self.rel_alarm {
            return Err(CompareError::InvalidThresholds(format!(
                "rel_print {} exceeds rel_alarm {}",
                self.rel_print, self.rel_alarm
            )));
        }
        Ok(())
    }
}

/// Full run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    /// Directory holding the implementation under test's output.
    pub left_dir: PathBuf,
    /// Directory holding the reference implementation's output.
    pub right_dir: PathBuf,
    /// File extension, without the dot.
    pub extension: String,
    /// Label used for the left file in header diffs.
    pub left_label: String,
    /// Label used for the right file in header diffs.
    pub right_label: String,
    pub thresholds: Thresholds,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            left_dir: PathBuf::from("temp/cxx"),
            right_dir: PathBuf::from("temp/FORTRAN"),
            extension: "shd".to_string(),
            left_label: "CXX".to_string(),
            right_label: "FOR".to_string(),
            thresholds: Thresholds::default(),
        }
    }
}

/// Load a config file.
///
/// # Errors
///
/// Returns [`CompareError::Io`] if the file cannot be read, or any error
/// from [`parse_config_str`].
pub fn parse_config(path: &Path) -> Result<CompareConfig, CompareError> {
    let content = std::fs::read_to_string(path).map_err(|source| CompareError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_str(&content)
}

/// Parse a config from YAML and validate its thresholds.
///
/// # Errors
///
/// Returns [`CompareError::Config`] for malformed YAML or unknown keys,
/// or [`CompareError::InvalidThresholds`].
pub fn parse_config_str(yaml: &str) -> Result<CompareConfig, CompareError> {
    let config: CompareConfig = if yaml.trim().is_empty() {
        CompareConfig::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    config.thresholds.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds_match_tiers() {
        let t = Thresholds::default();
        assert_eq!(t.ulp_print, 4000);
        assert_eq!(t.ulp_alarm, 100_000);
        assert!((t.abs_print - 1e-7).abs() < f64::EPSILON);
        assert!((t.rel_alarm - 1e-2).abs() < f64::EPSILON);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = parse_config_str("").unwrap();
        assert_eq!(config, CompareConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = parse_config_str(
            r#"
left_dir: "out/gpu"
thresholds:
  ulp_print: 16
"#,
        )
        .unwrap();
        assert_eq!(config.left_dir, PathBuf::from("out/gpu"));
        assert_eq!(config.right_dir, PathBuf::from("temp/FORTRAN"));
        assert_eq!(config.thresholds.ulp_print, 16);
        assert_eq!(config.thresholds.ulp_alarm, 100_000);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = parse_config_str("tolerance: 3\n").unwrap_err();
        assert!(matches!(err, CompareError::Config(_)));
    }

    #[test]
    fn inverted_tier_is_rejected() {
        let err = parse_config_str(
            r"
thresholds:
  abs_print: 1.0e-3
  abs_alarm: 1.0e-5
",
        )
        .unwrap_err();
        assert!(err.to_string().contains("abs_print"));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let t = Thresholds {
            rel_print: -1.0,
            ..Thresholds::default()
        };
        assert!(matches!(
            t.validate(),
            Err(CompareError::InvalidThresholds(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_config(Path::new("/nonexistent/shdcmp.yaml")).unwrap_err();
        assert!(matches!(err, CompareError::Io { .. }));
    }

    #[test]
    fn config_file_round_trips_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shdcmp.yaml");
        std::fs::write(&path, "extension: bin\nright_label: REF\n").unwrap();
        let config = parse_config(&path).unwrap();
        assert_eq!(config.extension, "bin");
        assert_eq!(config.right_label, "REF");
    }
}
