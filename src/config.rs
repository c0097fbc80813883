use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

fn default_start_money() -> u32 {
    50
}

fn default_start_solar_panels() -> u32 {
    3
}

fn default_start_green_spaces() -> u32 {
    3
}

fn default_citizen_count() -> usize {
    20
}

fn default_round_seconds() -> f64 {
    120.0
}

fn default_frame_seconds() -> f64 {
    1.0 / 30.0
}

fn default_scrap_count() -> usize {
    10
}

fn default_snapshot_interval_frames() -> u64 {
    150
}

fn default_solar_price() -> u32 {
    15
}

fn default_green_price() -> u32 {
    10
}

fn default_bin_price() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

/// A playable district: map layout, starting metrics, economy constants and
/// feature toggles, loaded from YAML. The reduced game variant is a scenario
/// with `missions`/`pollution`/`tutorial` switched off, not a separate code
/// path.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    pub grid: GridConfig,
    #[serde(default = "default_citizen_count")]
    pub citizens: usize,
    pub start_carbon: f64,
    pub start_happiness: f64,
    #[serde(default = "default_start_money")]
    pub start_money: u32,
    #[serde(default = "default_start_solar_panels")]
    pub start_solar_panels: u32,
    #[serde(default = "default_start_green_spaces")]
    pub start_green_spaces: u32,
    #[serde(default = "default_round_seconds")]
    pub round_seconds: f64,
    #[serde(default = "default_frame_seconds")]
    pub frame_seconds: f64,
    #[serde(default = "default_scrap_count")]
    pub scrap_count: usize,
    #[serde(default = "default_snapshot_interval_frames")]
    pub snapshot_interval_frames: u64,
    #[serde(default)]
    pub prices: PriceTable,
    #[serde(default)]
    pub features: FeatureToggles,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    /// Row indices carrying a horizontal road lane.
    #[serde(default)]
    pub road_rows: Vec<usize>,
    /// Column indices carrying a vertical road lane.
    #[serde(default)]
    pub road_cols: Vec<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceTable {
    #[serde(default = "default_solar_price")]
    pub solar_panel: u32,
    #[serde(default = "default_green_price")]
    pub green_space: u32,
    #[serde(default = "default_bin_price")]
    pub rubbish_bin: u32,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            solar_panel: default_solar_price(),
            green_space: default_green_price(),
            rubbish_bin: default_bin_price(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureToggles {
    #[serde(default = "default_true")]
    pub missions: bool,
    #[serde(default = "default_true")]
    pub pollution: bool,
    #[serde(default = "default_true")]
    pub tutorial: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            missions: true,
            pollution: true,
            tutorial: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("scenario parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("scenario validation error: {0}")]
    Validation(String),
}

impl Scenario {
    pub fn from_str(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_yaml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)?;
        Self::from_str(&text)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(ScenarioError::Validation(
                "grid dimensions must be non-zero".into(),
            ));
        }
        for &row in &self.grid.road_rows {
            if row >= self.grid.height {
                return Err(ScenarioError::Validation(format!(
                    "road row {row} outside grid height {}",
                    self.grid.height
                )));
            }
        }
        for &col in &self.grid.road_cols {
            if col >= self.grid.width {
                return Err(ScenarioError::Validation(format!(
                    "road column {col} outside grid width {}",
                    self.grid.width
                )));
            }
        }
        if !(0.0..=100.0).contains(&self.start_carbon) {
            return Err(ScenarioError::Validation(
                "start_carbon must lie in 0..=100".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.start_happiness) {
            return Err(ScenarioError::Validation(
                "start_happiness must lie in 0..=100".into(),
            ));
        }
        if self.round_seconds <= 0.0 {
            return Err(ScenarioError::Validation(
                "round_seconds must be positive".into(),
            ));
        }
        if self.frame_seconds <= 0.0 {
            return Err(ScenarioError::Validation(
                "frame_seconds must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Number of simulated frames in one full round.
    pub fn frames_per_round(&self) -> u64 {
        (self.round_seconds / self.frame_seconds).ceil() as u64
    }
}

/// Resolves scenario paths relative to a root directory, so tests and the
/// CLI agree on where fixtures live.
pub struct ScenarioLoader {
    root: PathBuf,
}

impl ScenarioLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Scenario, ScenarioError> {
        let path = path.as_ref();
        if path.is_absolute() {
            Scenario::load_from_path(path)
        } else {
            Scenario::load_from_path(self.root.join(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name: test_block
seed: 7
grid:
  width: 6
  height: 8
  road_rows: [3]
  road_cols: [2]
start_carbon: 62
start_happiness: 38
"#;

    #[test]
    fn minimal_scenario_fills_defaults() {
        let scenario = Scenario::from_str(MINIMAL).expect("scenario parses");
        assert_eq!(scenario.name, "test_block");
        assert_eq!(scenario.start_money, 50);
        assert_eq!(scenario.start_solar_panels, 3);
        assert_eq!(scenario.prices.solar_panel, 15);
        assert!(scenario.features.missions);
        assert!(scenario.features.pollution);
        assert_eq!(scenario.frames_per_round(), 3600);
    }

    #[test]
    fn road_lane_outside_grid_is_rejected() {
        let text = MINIMAL.replace("road_rows: [3]", "road_rows: [8]");
        let err = Scenario::from_str(&text).unwrap_err();
        assert!(matches!(err, ScenarioError::Validation(_)));
    }

    #[test]
    fn carbon_outside_range_is_rejected() {
        let text = MINIMAL.replace("start_carbon: 62", "start_carbon: 130");
        assert!(Scenario::from_str(&text).is_err());
    }
}
