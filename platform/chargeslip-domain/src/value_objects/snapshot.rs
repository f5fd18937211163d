use crate::value_objects::commodity::Commodity;
use crate::value_objects::instrument::InstrumentCategory;
use crate::value_objects::venue::Venue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Quantity,
    Amount,
}

impl InputMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Quantity => Self::Amount,
            Self::Amount => Self::Quantity,
        }
    }
}

/// Raw text of one category's form, exactly as typed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormFields {
    pub buy_price: String,
    pub sell_price: String,
    pub quantity: String,
    pub amount: String,
    pub strike_price: String,
    pub input_mode: InputMode,
    pub venue: Venue,
    pub commodity: Commodity,
}

/// Everything the UI restores on the next start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub version: u32,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub active_category: InstrumentCategory,
    #[serde(default)]
    pub forms: BTreeMap<InstrumentCategory, FormFields>,
}

impl Default for FormSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: None,
            theme: Theme::default(),
            active_category: InstrumentCategory::default(),
            forms: BTreeMap::new(),
        }
    }
}

impl FormSnapshot {
    pub fn form(&self, category: InstrumentCategory) -> FormFields {
        self.forms.get(&category).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{FormFields, FormSnapshot, InputMode, Theme};
    use crate::value_objects::instrument::InstrumentCategory;
    use crate::value_objects::venue::Venue;

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let snapshot: FormSnapshot =
            serde_json::from_str(r#"{"version":1,"forms":{"delivery_equity":{"buy_price":"10"}}}"#)
                .expect("parse");
        assert_eq!(snapshot.theme, Theme::Dark);
        assert_eq!(snapshot.active_category, InstrumentCategory::IntradayEquity);
        let form = snapshot.form(InstrumentCategory::DeliveryEquity);
        assert_eq!(form.buy_price, "10");
        assert_eq!(form.input_mode, InputMode::Quantity);
        assert_eq!(form.venue, Venue::Nse);
        assert_eq!(snapshot.form(InstrumentCategory::EquityOptions), FormFields::default());
    }
}
