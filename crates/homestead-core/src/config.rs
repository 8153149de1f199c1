//! Configuration loading and typed config structures for the Homestead engine.
//!
//! The canonical configuration lives in `homestead-config.yaml` at the
//! project root. Every field has a default, so an empty document (or no
//! file at all) yields the stock game. The raw [`GameConfig`] is validated
//! once at startup and turned into the immutable [`GameRules`] that every
//! component receives by reference.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use homestead_farm::{CropCatalog, CropSpec, FarmError, MAX_DIMENSION, StageGlyphs};
use homestead_farm::catalog::stock_specs;
use homestead_player::ProgressionConfig;

/// Environment variable overriding `save.path`.
pub const SAVE_PATH_ENV: &str = "HOMESTEAD_SAVE_PATH";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but is not playable.
    #[error("invalid configuration: {}", issues.join("; "))]
    Invalid {
        /// Every problem found, one message each.
        issues: Vec<String>,
    },

    /// The crop catalog could not be built.
    #[error("invalid crop catalog: {0}")]
    Catalog(#[from] FarmError),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Top-level game configuration.
///
/// Mirrors the structure of `homestead-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Starting values and the experience curve.
    #[serde(default)]
    pub progression: ProgressionConfig,

    /// Starting farm size.
    #[serde(default)]
    pub farm: FarmConfig,

    /// Tick intervals and offline reconciliation tunables.
    #[serde(default)]
    pub timing: TimingConfig,

    /// The crop catalog, in display order.
    #[serde(default = "stock_specs")]
    pub crops: Vec<CropSpec>,

    /// Presentation settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Save file location.
    #[serde(default)]
    pub save: SaveConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            progression: ProgressionConfig::default(),
            farm: FarmConfig::default(),
            timing: TimingConfig::default(),
            crops: stock_specs(),
            display: DisplayConfig::default(),
            save: SaveConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `HOMESTEAD_SAVE_PATH` overrides `save.path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.save.apply_env_overrides();
        Ok(config)
    }

    /// Check the configuration, returning every hard issue at once.
    ///
    /// On success, returns the soft warnings (currently: crops that lose
    /// money on a manual harvest).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] listing every hard issue.
    pub fn validate(&self) -> Result<Vec<String>, ConfigError> {
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        if self.crops.is_empty() {
            issues.push("the crop catalog is empty".to_owned());
        }
        let mut seen = BTreeSet::new();
        for spec in &self.crops {
            issues.extend(spec.validation_issues());
            if !seen.insert(&spec.kind) {
                issues.push(format!("crop {} is listed more than once", spec.kind));
            }
            if spec.is_unprofitable() {
                warnings.push(format!(
                    "crop {} sells for {} but its seed costs {}",
                    spec.kind, spec.sell_price, spec.seed_cost
                ));
            }
        }
        for kind in &self.progression.starting_unlocked_crops {
            if !seen.contains(kind) {
                issues.push(format!("starting crop {kind} is not in the catalog"));
            }
        }

        if self.progression.xp_per_level == 0 {
            issues.push("progression.xp_per_level must be positive".to_owned());
        }

        let FarmConfig {
            starting_width,
            starting_height,
        } = self.farm;
        if starting_width == 0
            || starting_height == 0
            || starting_width > MAX_DIMENSION
            || starting_height > MAX_DIMENSION
        {
            issues.push(format!(
                "farm size {starting_width}x{starting_height} must be between 1 and {MAX_DIMENSION} on each side"
            ));
        }

        issues.extend(self.timing.validation_issues());

        if issues.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigError::Invalid { issues })
        }
    }

    /// Validate and build the immutable rule set.
    ///
    /// Warnings are logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if validation fails.
    pub fn into_rules(self) -> Result<GameRules, ConfigError> {
        for warning in self.validate()? {
            tracing::warn!(warning = %warning, "Questionable configuration");
        }
        let catalog = CropCatalog::new(self.crops)?;
        tracing::debug!(crops = catalog.len(), "Crop catalog built");
        Ok(GameRules {
            catalog,
            progression: self.progression,
            timing: self.timing,
            farm: self.farm,
            glyphs: self.display.stage_glyphs,
        })
    }
}

// ---------------------------------------------------------------------------
// GameRules
// ---------------------------------------------------------------------------

/// The validated, immutable configuration shared by every component.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRules {
    /// Crop species.
    pub catalog: CropCatalog,
    /// Starting values and the experience curve.
    pub progression: ProgressionConfig,
    /// Tick intervals and offline tunables.
    pub timing: TimingConfig,
    /// Starting farm size.
    pub farm: FarmConfig,
    /// Glyph per growth stage.
    pub glyphs: StageGlyphs,
}

impl GameRules {
    /// The stock rules, identical to an empty configuration file.
    pub fn stock() -> Self {
        Self {
            catalog: CropCatalog::stock(),
            progression: ProgressionConfig::default(),
            timing: TimingConfig::default(),
            farm: FarmConfig::default(),
            glyphs: StageGlyphs::default(),
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self::stock()
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Starting farm size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FarmConfig {
    /// Columns of a new farm (default: 4).
    #[serde(default = "default_farm_side")]
    pub starting_width: u32,

    /// Rows of a new farm (default: 4).
    #[serde(default = "default_farm_side")]
    pub starting_height: u32,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            starting_width: default_farm_side(),
            starting_height: default_farm_side(),
        }
    }
}

/// Tick intervals and offline reconciliation tunables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimingConfig {
    /// Seconds between autosaves (default: 30).
    #[serde(default = "default_auto_save_interval_secs")]
    pub auto_save_interval_secs: u64,

    /// Seconds between growth display refreshes (default: 1).
    #[serde(default = "default_growth_update_interval_secs")]
    pub growth_update_interval_secs: u64,

    /// Share of the sell price paid for an offline auto-harvest, in
    /// `[0, 1]` (default: 0.7).
    #[serde(default = "default_offline_reward_multiplier")]
    pub offline_reward_multiplier: f64,

    /// Cap on the offline gap in seconds (default: 86400, one day).
    #[serde(default = "default_max_offline_secs")]
    pub max_offline_secs: u64,

    /// Offline gaps shorter than this many seconds are ignored
    /// (default: 10).
    #[serde(default = "default_min_offline_secs_to_process")]
    pub min_offline_secs_to_process: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            auto_save_interval_secs: default_auto_save_interval_secs(),
            growth_update_interval_secs: default_growth_update_interval_secs(),
            offline_reward_multiplier: default_offline_reward_multiplier(),
            max_offline_secs: default_max_offline_secs(),
            min_offline_secs_to_process: default_min_offline_secs_to_process(),
        }
    }
}

impl TimingConfig {
    /// Autosave period.
    pub const fn auto_save_interval(&self) -> Duration {
        Duration::from_secs(self.auto_save_interval_secs)
    }

    /// Growth refresh period.
    pub const fn growth_update_interval(&self) -> Duration {
        Duration::from_secs(self.growth_update_interval_secs)
    }

    fn validation_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.auto_save_interval_secs == 0 {
            issues.push("timing.auto_save_interval_secs must be positive".to_owned());
        }
        if self.growth_update_interval_secs == 0 {
            issues.push("timing.growth_update_interval_secs must be positive".to_owned());
        }
        if !(0.0..=1.0).contains(&self.offline_reward_multiplier) {
            issues.push(format!(
                "timing.offline_reward_multiplier must be within [0, 1], got {}",
                self.offline_reward_multiplier
            ));
        }
        if self.min_offline_secs_to_process > self.max_offline_secs {
            issues.push(format!(
                "timing.min_offline_secs_to_process ({}) exceeds timing.max_offline_secs ({})",
                self.min_offline_secs_to_process, self.max_offline_secs
            ));
        }
        issues
    }
}

/// Presentation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    /// Glyph overrides per growth stage, e.g. `READY: "*"`.
    #[serde(default)]
    pub stage_glyphs: StageGlyphs,
}

/// Save file location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SaveConfig {
    /// Save file path. Defaults to `~/.farmgame/savegame.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl SaveConfig {
    /// Apply `HOMESTEAD_SAVE_PATH` if set.
    pub fn apply_env_overrides(&mut self) {
        if let Some(val) = std::env::var_os(SAVE_PATH_ENV).filter(|v| !v.is_empty()) {
            self.path = Some(PathBuf::from(val));
        }
    }

    /// The configured path, or the default under the home directory.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_save_path)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset (default: `info`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_farm_side() -> u32 {
    4
}

const fn default_auto_save_interval_secs() -> u64 {
    30
}

const fn default_growth_update_interval_secs() -> u64 {
    1
}

const fn default_offline_reward_multiplier() -> f64 {
    0.7
}

const fn default_max_offline_secs() -> u64 {
    86_400
}

const fn default_min_offline_secs_to_process() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_save_path() -> PathBuf {
    let home = std::env::var_os("HOME").map_or_else(PathBuf::new, PathBuf::from);
    home.join(".farmgame").join("savegame.json")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::float_cmp)]
mod tests {
    use homestead_types::CropKind;

    use super::*;

    fn issues_of(config: &GameConfig) -> Vec<String> {
        match config.validate() {
            Err(ConfigError::Invalid { issues }) => issues,
            other => panic!("expected validation issues, got {other:?}"),
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.progression.starting_coins, 100);
        assert_eq!(config.farm.starting_width, 4);
        assert_eq!(config.timing.auto_save_interval_secs, 30);
        assert_eq!(config.timing.offline_reward_multiplier, 0.7);
        assert_eq!(config.crops.len(), 6);
        assert!(config.validate().unwrap().is_empty());
    }

    #[test]
    fn empty_document_is_the_stock_game() {
        let config = GameConfig::parse("").unwrap();
        assert_eq!(config.crops, stock_specs());
        assert_eq!(config.into_rules().unwrap(), GameRules::stock());
    }

    #[test]
    fn shipped_config_matches_stock_rules() {
        let yaml = include_str!("../../../homestead-config.yaml");
        let shipped = GameConfig::parse(yaml).unwrap().into_rules().unwrap();
        let stock = GameRules::stock();
        assert_eq!(shipped.catalog, stock.catalog);
        assert_eq!(shipped.progression, stock.progression);
        assert_eq!(shipped.timing, stock.timing);
        assert_eq!(shipped.farm, stock.farm);
        for stage in homestead_types::GrowthStage::ALL {
            assert_eq!(shipped.glyphs.glyph(stage), stock.glyphs.glyph(stage));
        }
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
progression:
  starting_coins: 250
  starting_unlocked_crops: [BEAN]
  xp_per_level: 50
  xp_per_harvest: 5

farm:
  starting_width: 6
  starting_height: 3

timing:
  auto_save_interval_secs: 10
  growth_update_interval_secs: 2
  offline_reward_multiplier: 0.5
  max_offline_secs: 3600
  min_offline_secs_to_process: 30

crops:
  - kind: BEAN
    name: Bean
    glyph: "b"
    growth_time_secs: 20
    seed_cost: 5
    sell_price: 9
    unlock_level: 1

display:
  stage_glyphs:
    READY: "*"

save:
  path: /tmp/homestead-test/save.json

logging:
  level: debug
  json: true
"#;
        let config = GameConfig::parse(yaml).unwrap();
        assert_eq!(config.progression.starting_coins, 250);
        assert_eq!(config.progression.xp_per_harvest, 5);
        assert_eq!(config.farm.starting_width, 6);
        assert_eq!(config.timing.offline_reward_multiplier, 0.5);
        assert_eq!(config.crops.len(), 1);
        assert!(config.logging.json);

        let rules = config.into_rules().unwrap();
        assert!(rules.catalog.contains(&CropKind::from("BEAN")));
        assert_eq!(rules.glyphs.glyph(homestead_types::GrowthStage::Ready), "*");
        assert_eq!(rules.timing.auto_save_interval(), Duration::from_secs(10));
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = GameConfig::parse("timing:\n  max_offline_secs: 60\n").unwrap();
        assert_eq!(config.timing.max_offline_secs, 60);
        assert_eq!(config.timing.min_offline_secs_to_process, 10);
        assert_eq!(config.crops.len(), 6);
    }

    #[test]
    fn every_issue_is_reported_at_once() {
        let mut config = GameConfig::default();
        config.timing.offline_reward_multiplier = 1.5;
        config.progression.xp_per_level = 0;
        config.farm.starting_width = 0;
        if let Some(first) = config.crops.first_mut() {
            first.growth_time_secs = 0;
            first.unlock_level = 0;
        }
        assert_eq!(issues_of(&config).len(), 5);
    }

    #[test]
    fn nan_multiplier_is_rejected() {
        let mut config = GameConfig::default();
        config.timing.offline_reward_multiplier = f64::NAN;
        assert_eq!(issues_of(&config).len(), 1);
    }

    #[test]
    fn duplicate_and_missing_crops_are_rejected() {
        let mut config = GameConfig::default();
        config.crops.retain(|s| s.kind.as_str() != "CARROT");
        let radish = config.crops.first().cloned().unwrap();
        config.crops.push(radish);
        let issues = issues_of(&config);
        assert!(issues.iter().any(|i| i.contains("more than once")));
        assert!(issues.iter().any(|i| i.contains("starting crop CARROT")));
    }

    #[test]
    fn zero_intervals_and_inverted_offline_window_are_rejected() {
        let mut config = GameConfig::default();
        config.timing.auto_save_interval_secs = 0;
        config.timing.growth_update_interval_secs = 0;
        config.timing.min_offline_secs_to_process = 100;
        config.timing.max_offline_secs = 50;
        assert_eq!(issues_of(&config).len(), 3);
    }

    #[test]
    fn unprofitable_crop_is_only_a_warning() {
        let mut config = GameConfig::default();
        if let Some(first) = config.crops.first_mut() {
            first.sell_price = 1;
        }
        let warnings = config.validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(config.into_rules().is_ok());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::from_file(&dir.path().join("absent.yaml"));
        assert!(matches!(err, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        assert!(matches!(
            GameConfig::parse("timing: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn explicit_save_path_wins_over_default() {
        let save = SaveConfig {
            path: Some(PathBuf::from("/srv/farm.json")),
        };
        assert_eq!(save.resolved_path(), PathBuf::from("/srv/farm.json"));
        assert!(SaveConfig::default().resolved_path().ends_with(".farmgame/savegame.json"));
    }
}
