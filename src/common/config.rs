use std::path::Path;

use anyhow::bail;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub strategy: StrategySettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Gap between neighbouring cells, in logical units.
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "yes")]
    pub animations_enabled: bool,
    #[serde(default = "default_minimum_rows")]
    pub minimum_rows: usize,
    #[serde(default = "default_maximum_rows")]
    pub maximum_rows: usize,
    /// Extra width granted to an expanded entry.
    #[serde(default = "default_expanded_width")]
    pub expanded_width: f64,
    /// Cell width as a multiple of cell height.
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,
    /// How long a full collapse-to-expand transition takes, in milliseconds.
    #[serde(default = "default_expand_duration")]
    pub expand_duration: u32,
}

#[derive(
    Serialize,
    Deserialize,
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrategyKind {
    ByShape,
    MaxSqueeze,
    FixedItemCount,
    FixedSize,
    #[default]
    LimitSqueeze,
}

/// Parameters for all packing strategies. Only the ones belonging to the
/// selected `kind` are read; the rest are kept so switching strategy does
/// not lose tuning.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct StrategySettings {
    #[serde(default)]
    pub kind: StrategyKind,
    /// Minimum acceptable compression before limit-squeeze adds a row.
    #[serde(default = "default_squeeze_ratio")]
    pub squeeze_ratio: f64,
    /// Bias limit-squeeze toward keeping the current row count and
    /// requesting grouping instead.
    #[serde(default)]
    pub prefer_grouping: bool,
    #[serde(default = "default_items_per_row")]
    pub items_per_row: usize,
    /// Cell height cap for the fixed-size strategy.
    #[serde(default = "default_fixed_cell_height")]
    pub fixed_cell_height: f64,
    /// Target width/height ratio of the whole taskbar block for the
    /// shape-driven strategy.
    #[serde(default = "default_row_aspect_ratio")]
    pub row_aspect_ratio: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spacing: default_spacing(),
            fps: default_fps(),
            animations_enabled: true,
            minimum_rows: default_minimum_rows(),
            maximum_rows: default_maximum_rows(),
            expanded_width: default_expanded_width(),
            aspect_ratio: default_aspect_ratio(),
            expand_duration: default_expand_duration(),
        }
    }
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            kind: StrategyKind::default(),
            squeeze_ratio: default_squeeze_ratio(),
            prefer_grouping: false,
            items_per_row: default_items_per_row(),
            fixed_cell_height: default_fixed_cell_height(),
            row_aspect_ratio: default_row_aspect_ratio(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.spacing < 0.0 {
            issues.push(format!("spacing must be non-negative, got {}", self.spacing));
        }
        if self.fps == 0 {
            issues.push("fps must be positive".to_string());
        }
        if self.minimum_rows == 0 {
            issues.push("minimum_rows must be at least 1".to_string());
        }
        if self.maximum_rows == 0 {
            issues.push("maximum_rows must be at least 1".to_string());
        }
        if self.minimum_rows > self.maximum_rows {
            issues.push(format!(
                "minimum_rows ({}) must not exceed maximum_rows ({})",
                self.minimum_rows, self.maximum_rows
            ));
        }
        if self.expanded_width < 0.0 {
            issues.push(format!(
                "expanded_width must be non-negative, got {}",
                self.expanded_width
            ));
        }
        if self.aspect_ratio <= 0.0 {
            issues.push(format!("aspect_ratio must be positive, got {}", self.aspect_ratio));
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.spacing < 0.0 {
            self.spacing = default_spacing();
            fixes += 1;
        }
        if self.fps == 0 {
            self.fps = default_fps();
            fixes += 1;
        }
        if self.minimum_rows == 0 {
            self.minimum_rows = default_minimum_rows();
            fixes += 1;
        }
        if self.maximum_rows == 0 {
            self.maximum_rows = default_maximum_rows();
            fixes += 1;
        }
        if self.minimum_rows > self.maximum_rows {
            self.maximum_rows = self.minimum_rows;
            fixes += 1;
        }
        if self.expanded_width < 0.0 {
            self.expanded_width = default_expanded_width();
            fixes += 1;
        }
        if self.aspect_ratio <= 0.0 {
            self.aspect_ratio = default_aspect_ratio();
            fixes += 1;
        }

        fixes
    }
}

impl StrategySettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.squeeze_ratio <= 0.0 || self.squeeze_ratio > 1.0 {
            issues.push(format!(
                "squeeze_ratio must be in (0, 1], got {}",
                self.squeeze_ratio
            ));
        }
        if self.items_per_row == 0 {
            issues.push("items_per_row must be at least 1".to_string());
        }
        if self.fixed_cell_height < 1.0 {
            issues.push(format!(
                "fixed_cell_height must be at least 1, got {}",
                self.fixed_cell_height
            ));
        }
        if self.row_aspect_ratio <= 0.0 {
            issues.push(format!(
                "row_aspect_ratio must be positive, got {}",
                self.row_aspect_ratio
            ));
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.squeeze_ratio <= 0.0 || self.squeeze_ratio > 1.0 {
            self.squeeze_ratio = default_squeeze_ratio();
            fixes += 1;
        }
        if self.items_per_row == 0 {
            self.items_per_row = default_items_per_row();
            fixes += 1;
        }
        if self.fixed_cell_height < 1.0 {
            self.fixed_cell_height = default_fixed_cell_height();
            fixes += 1;
        }
        if self.row_aspect_ratio <= 0.0 {
            self.row_aspect_ratio = default_row_aspect_ratio();
            fixes += 1;
        }

        fixes
    }
}

fn yes() -> bool { true }

fn default_spacing() -> f64 { 5.0 }

fn default_fps() -> u32 { 35 }

fn default_minimum_rows() -> usize { 1 }

fn default_maximum_rows() -> usize { 6 }

fn default_expanded_width() -> f64 { 175.0 }

fn default_aspect_ratio() -> f64 { 1.0 }

fn default_expand_duration() -> u32 { 160 }

fn default_squeeze_ratio() -> f64 { 0.6 }

fn default_items_per_row() -> usize { 14 }

fn default_fixed_cell_height() -> f64 { 40.0 }

fn default_row_aspect_ratio() -> f64 { 1.5 }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        let config: Config = toml::from_str(buf)?;

        let issues = config.validate();
        if !issues.is_empty() {
            bail!("invalid configuration: {}", issues.join("; "));
        }

        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        issues.extend(self.settings.validate());
        issues.extend(self.strategy.validate());

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        self.settings.auto_fix_values() + self.strategy.auto_fix_values()
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::parse(include_str!("../../smooth-tasks.default.toml")).unwrap()
    }
}
