use chargeslip_domain::value_objects::commodity::Commodity;
use chargeslip_domain::value_objects::instrument::InstrumentCategory;
use chargeslip_domain::value_objects::venue::Venue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// 12,34,567.89
    #[default]
    Indian,
    /// 1,234,567.89
    Western,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commodities: Vec<CommodityLotConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub venue: Venue,
    #[serde(default)]
    pub commodity: Commodity,
    #[serde(default)]
    pub category: InstrumentCategory,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub grouping: Grouping,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            grouping: Grouping::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PersistenceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub state_path: Option<String>,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            state_path: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CommodityLotConfig {
    pub commodity: Commodity,
    pub lot_multiplier: u32,
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// Commodity lot multipliers after config overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LotTable {
    overrides: BTreeMap<Commodity, u32>,
}

impl LotTable {
    pub fn lot_multiplier(&self, commodity: Commodity) -> u32 {
        self.overrides
            .get(&commodity)
            .copied()
            .unwrap_or_else(|| commodity.lot_multiplier())
    }
}

impl Config {
    pub fn lot_table(&self) -> LotTable {
        LotTable {
            overrides: self
                .commodities
                .iter()
                .map(|c| (c.commodity, c.lot_multiplier))
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.display.currency_symbol.trim().is_empty() {
            return Err("display.currency_symbol cannot be empty".to_string());
        }
        for entry in &self.commodities {
            if entry.lot_multiplier == 0 {
                return Err(format!(
                    "commodities: lot_multiplier for {} must be > 0",
                    entry.commodity
                ));
            }
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let (config, _source) = load_config_with_source(path)?;
    Ok(config)
}

pub fn load_config_with_source(path: &Path) -> Result<(Config, String), String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    config
        .validate()
        .map_err(|err| format!("invalid config {}: {err}", path.display()))?;
    Ok((config, contents))
}

pub fn to_toml_pretty(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}
